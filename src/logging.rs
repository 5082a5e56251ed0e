//! Global `tracing` subscriber setup for the command-line front end.

use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging has already been initialised")]
    AlreadyInitialised,

    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to install the log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `default_filter`.
///
/// A failed call leaves nothing installed, so it can be retried with another filter.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Err(LoggingError::AlreadyInitialised);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| LoggingError::Filter {
            filter: default_filter.to_string(),
            source,
        })?,
    };

    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).try_init()?;
    INITIALISED
        .set(())
        .map_err(|_| LoggingError::AlreadyInitialised)
}
