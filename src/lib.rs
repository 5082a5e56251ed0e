//! Shape-checked matrix arithmetic and determinants over plain-text matrices.
//!
//! ```rust
//! use matrix_calculator::{matrix_io, operations};
//!
//! let a = matrix_io::parse_str("4 6\n3 8").unwrap();
//! assert!((operations::determinant(&a).unwrap() - 14.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod determinant;
pub mod error;
pub mod logging;
pub mod matrix;
pub mod matrix_io;
pub mod operations;
pub mod session;

pub use error::{MatrixError, ParseError, ShapeError};
pub use matrix::{Dims, Matrix};
pub use operations::{determinant, multiply, subtract, sum, Dot, Operation};
