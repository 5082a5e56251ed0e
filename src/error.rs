// error.rs

//! # Error Module
//!
//! Typed failure conditions for the matrix kernel and the text codec:
//! - `ShapeError`: a grid that cannot become a `Matrix`
//! - `MatrixError`: operands that do not fit the requested operation
//! - `ParseError`: text that does not describe a rectangular grid of numbers
//!
//! Messages are meant to be shown to the user as-is.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::matrix::Dims;
use crate::operations::Operation;

/// Raised while building a `Matrix` from raw data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("matrix must have at least one row and one column")]
    Empty,

    #[error("matrix is not rectangular: row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("data length {len} does not match a {rows}x{cols} matrix")]
    DataLength { rows: usize, cols: usize, len: usize },

    #[error("a {rows}x{cols} matrix has more elements than can be addressed")]
    TooLarge { rows: usize, cols: usize },
}

/// Raised by the kernel operations. Always returned before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("{op} requires {}, got {left} and {right}", .op.shape_rule())]
    ShapeMismatch {
        op: Operation,
        left: Dims,
        right: Dims,
    },

    #[error("determinant requires a square matrix, got {0}")]
    NotSquare(Dims),

    #[error("index ({row}, {col}) is out of bounds for a {dims} matrix")]
    IndexOutOfBounds { row: usize, col: usize, dims: Dims },
}

/// Raised by the text codec in `matrix_io`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: '{token}' is not a number")]
    NumberFormat { line: usize, token: String },

    #[error("line {line}: expected {expected} values, found {found}")]
    Rectangularity {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("no matrix rows found")]
    EmptyContent,

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
