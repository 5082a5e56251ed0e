// operations.rs

//! # Operations Module
//!
//! Shape-checked arithmetic over `Matrix` values:
//! - `sum`, `subtract`: element-wise, operands must have identical dimensions
//! - `multiply`: matrix product, `a.cols()` must equal `b.rows()`
//! - `determinant`: square matrices only, see `determinant.rs` for the algorithm
//!
//! Every function validates its operands before touching any element and never mutates them.
//! The `Dot` trait and the `Add`/`Sub` impls on `&Matrix` are thin wrappers over these functions.

use std::fmt;
use std::ops::{Add, Sub};

use tracing::{debug, info};

use crate::determinant::{self, EliminationObserver, NoopObserver};
use crate::error::MatrixError;
use crate::matrix::Matrix;

/// The operations the kernel knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Sum,
    Subtract,
    Multiply,
    Determinant,
}

impl Operation {
    // Human-readable precondition, used in shape mismatch messages
    pub fn shape_rule(&self) -> &'static str {
        match self {
            Operation::Sum | Operation::Subtract => "operands of the same size",
            Operation::Multiply => "the column count of the left operand to equal the row count of the right",
            Operation::Determinant => "a square matrix",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Sum => write!(f, "sum"),
            Operation::Subtract => write!(f, "subtract"),
            Operation::Multiply => write!(f, "multiply"),
            Operation::Determinant => write!(f, "determinant"),
        }
    }
}

pub trait Dot<Rhs = Self> {
    type Output;

    fn dot(&self, rhs: &Rhs) -> Self::Output;
}

fn ensure_same_dims(op: Operation, a: &Matrix, b: &Matrix) -> Result<(), MatrixError> {
    if a.dims() != b.dims() {
        return Err(MatrixError::ShapeMismatch {
            op,
            left: a.dims(),
            right: b.dims(),
        });
    }
    Ok(())
}

/// Element-wise `a + b`.
pub fn sum(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    debug!(left = %a.dims(), right = %b.dims(), "sum started");
    ensure_same_dims(Operation::Sum, a, b)?;

    let result = Matrix::from_fn(a.rows(), a.cols(), |i, j| a.at(i, j) + b.at(i, j));
    info!(dims = %result.dims(), "sum finished");
    Ok(result)
}

/// Element-wise `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    debug!(left = %a.dims(), right = %b.dims(), "subtract started");
    ensure_same_dims(Operation::Subtract, a, b)?;

    let result = Matrix::from_fn(a.rows(), a.cols(), |i, j| a.at(i, j) - b.at(i, j));
    info!(dims = %result.dims(), "subtract finished");
    Ok(result)
}

/// Matrix product `a * b`, with dimensions `a.rows() x b.cols()`.
///
/// Each cell accumulates `a[i][k] * b[k][j]` for increasing `k`, so results are
/// reproducible for a given input but only equal to other summation orders up to rounding.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    debug!(left = %a.dims(), right = %b.dims(), "multiply started");
    if a.cols() != b.rows() {
        return Err(MatrixError::ShapeMismatch {
            op: Operation::Multiply,
            left: a.dims(),
            right: b.dims(),
        });
    }

    let shared = a.cols();
    let result = Matrix::from_fn(a.rows(), b.cols(), |i, j| {
        let mut sum = 0.0;
        for k in 0..shared {
            sum += a.at(i, k) * b.at(k, j);
        }
        sum
    });
    info!(dims = %result.dims(), "multiply finished");
    Ok(result)
}

/// Determinant of a square matrix.
pub fn determinant(m: &Matrix) -> Result<f64, MatrixError> {
    determinant_with(m, &mut NoopObserver)
}

/// Determinant of a square matrix, reporting elimination steps to `observer`.
pub fn determinant_with<O>(m: &Matrix, observer: &mut O) -> Result<f64, MatrixError>
where
    O: EliminationObserver + ?Sized,
{
    debug!(dims = %m.dims(), "determinant started");
    if !m.is_square() {
        return Err(MatrixError::NotSquare(m.dims()));
    }

    let result = determinant::gaussian_elimination(m, observer);
    info!(determinant = result, "determinant finished");
    Ok(result)
}

impl Dot for Matrix {
    type Output = Result<Matrix, MatrixError>;

    fn dot(&self, other: &Matrix) -> Self::Output {
        multiply(self, other)
    }
}

impl Add for &Matrix {
    type Output = Result<Matrix, MatrixError>;

    fn add(self, rhs: Self) -> Self::Output {
        sum(self, rhs)
    }
}

impl Sub for &Matrix {
    type Output = Result<Matrix, MatrixError>;

    fn sub(self, rhs: Self) -> Self::Output {
        subtract(self, rhs)
    }
}
