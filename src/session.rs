// session.rs

//! # Session Module
//!
//! The state a front end keeps between user actions: two matrix slots, `A` and `B`, each
//! loaded independently, and operations dispatched by name against them.
//!
//! The kernel in `operations` is stateless; everything mutable lives here.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::determinant::{NoopObserver, TracingObserver};
use crate::error::{MatrixError, ParseError};
use crate::matrix::Matrix;
use crate::matrix_io;
use crate::operations::{self, Operation};

type BinaryKernel = fn(&Matrix, &Matrix) -> Result<Matrix, MatrixError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("matrix {0} has not been loaded")]
    NotLoaded(Slot),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("could not load matrix {slot}: {source}")]
    Load {
        slot: Slot,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl FromStr for Operation {
    type Err = SessionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sum" | "add" => Ok(Operation::Sum),
            "subtract" | "sub" => Ok(Operation::Subtract),
            "multiply" | "mul" => Ok(Operation::Multiply),
            "determinant" | "det" => Ok(Operation::Determinant),
            _ => Err(SessionError::UnknownOperation(name.to_string())),
        }
    }
}

/// What an operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Matrix(Matrix),
    Scalar(f64),
}

impl Outcome {
    pub fn render(&self, decimal_places: usize) -> String {
        match self {
            Outcome::Matrix(matrix) => format!("{:.*}", decimal_places, matrix),
            Outcome::Scalar(value) => format!("{:.*}", decimal_places, value),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    a: Option<Matrix>,
    b: Option<Matrix>,
    trace_elimination: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports determinant elimination steps through `tracing`.
    pub fn with_elimination_tracing(mut self, enabled: bool) -> Self {
        self.trace_elimination = enabled;
        self
    }

    /// Loads `slot` from a text file. On failure the slot keeps its previous matrix.
    pub fn load<P: AsRef<Path>>(&mut self, slot: Slot, path: P) -> Result<&Matrix, SessionError> {
        let matrix = matrix_io::read_matrix_from_file(path).map_err(|source| {
            warn!(%slot, %source, "load failed");
            SessionError::Load { slot, source }
        })?;
        info!(%slot, dims = %matrix.dims(), "slot loaded");
        Ok(self.set(slot, matrix))
    }

    pub fn set(&mut self, slot: Slot, matrix: Matrix) -> &Matrix {
        let target = match slot {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        };
        target.insert(matrix)
    }

    pub fn get(&self, slot: Slot) -> Result<&Matrix, SessionError> {
        match slot {
            Slot::A => self.a.as_ref(),
            Slot::B => self.b.as_ref(),
        }
        .ok_or(SessionError::NotLoaded(slot))
    }

    /// Summary shown after a successful load.
    pub fn describe(&self, slot: Slot, decimal_places: usize) -> Result<String, SessionError> {
        let matrix = self.get(slot)?;
        Ok(format!(
            "{} loaded ({}):\n\n{:.*}",
            slot,
            matrix.dims(),
            decimal_places,
            matrix
        ))
    }

    /// Runs `op` on the loaded slots. Binary operations use `A` and `B` in that order;
    /// the determinant is taken of `A`.
    pub fn run(&self, op: Operation) -> Result<Outcome, SessionError> {
        match op {
            Operation::Sum => self.binary(operations::sum),
            Operation::Subtract => self.binary(operations::subtract),
            Operation::Multiply => self.binary(operations::multiply),
            Operation::Determinant => self.determinant(Slot::A),
        }
    }

    fn binary(&self, kernel: BinaryKernel) -> Result<Outcome, SessionError> {
        let (a, b) = (self.get(Slot::A)?, self.get(Slot::B)?);
        Ok(Outcome::Matrix(kernel(a, b)?))
    }

    pub fn run_named(&self, name: &str) -> Result<Outcome, SessionError> {
        self.run(name.parse()?)
    }

    pub fn determinant(&self, slot: Slot) -> Result<Outcome, SessionError> {
        let matrix = self.get(slot)?;
        let value = if self.trace_elimination {
            operations::determinant_with(matrix, &mut TracingObserver)?
        } else {
            operations::determinant_with(matrix, &mut NoopObserver)?
        };
        Ok(Outcome::Scalar(value))
    }
}
