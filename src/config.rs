use serde::Deserialize;
use serde_json::from_reader;
use std::fs::File;
use std::io::{BufReader, Error as IoError};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matrix::DEFAULT_DECIMAL_PLACES;

// f64 carries about 15-17 significant digits; anything beyond is noise
const MAX_DECIMAL_PLACES: usize = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,

    // EnvFilter directive, RUST_LOG wins when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub trace_elimination: bool,
}

// Default function for Serde (to ensure it's always present)
fn default_decimal_places() -> usize {
    DEFAULT_DECIMAL_PLACES
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            log_filter: default_log_filter(),
            trace_elimination: false,
        }
    }
}

impl Config {
    // get config from the json file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let config: Config = from_reader(reader).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Invalid(format!(
                "decimal_places must be at most {}, got {}",
                MAX_DECIMAL_PLACES, self.decimal_places
            )));
        }
        Ok(())
    }
}
