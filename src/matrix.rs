// matrix.rs

//! # Matrix Module
//!
//! This module provides the `Matrix` value type: a rectangular, immutable grid of `f64`
//! stored row-major in one flat vector.
//!
//! A `Matrix` is always at least 1x1. Every constructor copies its input, and nothing
//! hands out mutable access, so a matrix can be shared freely between threads.
//!
//! ## Usage:
//! ```rust
//! use matrix_calculator::matrix::Matrix;
//!
//! let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! assert_eq!(m.at(1, 0), 3.0);
//! ```

use std::fmt;
use std::ops::Index;

use approx::AbsDiffEq;
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::error::{MatrixError, ShapeError};

/// Default absolute tolerance for comparing matrices.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Decimal places used by `Display` when no precision is requested.
pub const DEFAULT_DECIMAL_PLACES: usize = 2;

/// Row and column counts of a matrix, rendered as `RxC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

// Number of cells in a rows x cols grid, rejecting empty and unaddressable shapes
fn element_count(rows: usize, cols: usize) -> Result<usize, ShapeError> {
    if rows == 0 || cols == 0 {
        return Err(ShapeError::Empty);
    }
    rows.checked_mul(cols).ok_or(ShapeError::TooLarge { rows, cols })
}

//Matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // Flat vector for matrix elements
}

impl Matrix {
    /// Builds a matrix from a flat row-major vector.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ShapeError> {
        if element_count(rows, cols)? != data.len() {
            return Err(ShapeError::DataLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        debug!(rows, cols, "matrix created");
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from a grid of rows, copying every element.
    ///
    /// The first row fixes the column count; any other row of a different length
    /// fails with `ShapeError::Ragged`.
    pub fn from_rows<R: AsRef<[f64]>>(grid: &[R]) -> Result<Self, ShapeError> {
        let cols = match grid.first() {
            Some(first) if !first.as_ref().is_empty() => first.as_ref().len(),
            _ => return Err(ShapeError::Empty),
        };

        let mut data = Vec::with_capacity(grid.len() * cols);
        for (row, values) in grid.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(ShapeError::Ragged {
                    row,
                    found: values.len(),
                    expected: cols,
                });
            }
            data.extend_from_slice(values);
        }

        Self::new(grid.len(), cols, data)
    }

    // Internal constructor for results whose shape is already known to be valid
    pub(crate) fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        debug_assert!(rows > 0 && cols > 0);
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// The `n`x`n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, ShapeError> {
        element_count(n, n)?;
        Ok(Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 }))
    }

    /// Random matrix with standard-normal entries. A seed makes the output reproducible.
    pub fn random(rows: usize, cols: usize, seed: Option<u64>) -> Result<Self, ShapeError> {
        let len = element_count(rows, cols)?;

        let data: Vec<f64> = match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..len).map(|_| StandardNormal.sample(&mut rng)).collect()
            }
            None => {
                let mut rng = thread_rng();
                (0..len).map(|_| StandardNormal.sample(&mut rng)).collect()
            }
        };

        Self::new(rows, cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> Dims {
        Dims {
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                dims: self.dims(),
            });
        }
        Ok(self.data[row * self.cols + col])
    }

    // Immutable access to matrix elements
    pub fn at(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows || col >= self.cols {
            panic!(
                "Index ({}, {}) out of bounds for a {} matrix",
                row,
                col,
                self.dims()
            );
        }
        self.data[row * self.cols + col]
    }

    // Returns a slice for the row specified by row_index
    pub fn row(&self, row_index: usize) -> Result<&[f64], MatrixError> {
        if row_index >= self.rows {
            return Err(MatrixError::IndexOutOfBounds {
                row: row_index,
                col: 0,
                dims: self.dims(),
            });
        }

        let start = row_index * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Deep copy of the grid. Mutating the result never affects `self`.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows_iter().map(<[f64]>::to_vec).collect()
    }

    /// Element-wise comparison within an absolute tolerance. Shapes must match exactly.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.dims() == other.dims()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        if row >= self.rows || col >= self.cols {
            panic!(
                "Index ({}, {}) out of bounds for a {} matrix",
                row,
                col,
                self.dims()
            );
        }
        &self.data[row * self.cols + col]
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        DEFAULT_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.approx_eq(other, epsilon)
    }
}

// Tab-separated grid, every cell followed by a tab. `{:.N}` overrides the default precision.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_DECIMAL_PLACES);
        for row in self.rows_iter() {
            for value in row {
                write!(f, "{:.*}\t", precision, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_copies_the_grid() {
        let mut grid = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = Matrix::from_rows(&grid).unwrap();
        grid[0][0] = 99.0;

        assert_eq!(m.at(0, 0), 1.0);
        assert_eq!(m.dims(), Dims { rows: 2, cols: 2 });
    }

    #[test]
    fn snapshot_is_independent() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let mut snapshot = m.to_rows();
        snapshot[1][1] = -1.0;

        assert_eq!(m.at(1, 1), 4.0);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn empty_grids_are_rejected() {
        let no_rows: Vec<Vec<f64>> = vec![];
        assert_eq!(Matrix::from_rows(&no_rows), Err(ShapeError::Empty));

        let empty_first_row: Vec<Vec<f64>> = vec![vec![], vec![1.0]];
        assert_eq!(Matrix::from_rows(&empty_first_row), Err(ShapeError::Empty));

        assert_eq!(Matrix::new(0, 3, vec![]), Err(ShapeError::Empty));
        assert_eq!(Matrix::identity(0), Err(ShapeError::Empty));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let grid = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
        assert_eq!(
            Matrix::from_rows(&grid),
            Err(ShapeError::Ragged {
                row: 1,
                found: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn flat_data_must_match_dimensions() {
        assert_eq!(
            Matrix::new(2, 2, vec![1.0, 2.0, 3.0]),
            Err(ShapeError::DataLength {
                rows: 2,
                cols: 2,
                len: 3
            })
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let (rows, cols) = (1usize << 33, 1usize << 31);
        let too_large = Err(ShapeError::TooLarge { rows, cols });

        assert_eq!(Matrix::new(rows, cols, vec![]), too_large);
        assert_eq!(Matrix::random(rows, cols, Some(1)), too_large);
        assert_eq!(
            Matrix::identity(usize::MAX),
            Err(ShapeError::TooLarge {
                rows: usize::MAX,
                cols: usize::MAX
            })
        );
    }

    #[test]
    fn checked_access_reports_out_of_bounds() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(m.get(0, 2), Ok(3.0));
        assert_eq!(
            m.get(1, 0),
            Err(MatrixError::IndexOutOfBounds {
                row: 1,
                col: 0,
                dims: m.dims()
            })
        );
        assert!(m.row(1).is_err());
        assert_eq!(m.row(0).unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_panics_out_of_bounds() {
        let m = Matrix::identity(2).unwrap();
        let _ = m[(2, 0)];
    }

    #[test]
    fn approx_eq_uses_tolerance_and_shape() {
        let a = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(&[[1.0 + 1e-12, 2.0]]).unwrap();
        let c = Matrix::from_rows(&[[1.0], [2.0]]).unwrap();

        assert!(a.approx_eq(&b, DEFAULT_TOLERANCE));
        assert!(!a.approx_eq(&c, DEFAULT_TOLERANCE));
        approx::assert_abs_diff_eq!(a, b);
    }

    #[test]
    fn display_uses_two_decimals_by_default() {
        let m = Matrix::from_rows(&[[1.0, 2.5], [-3.126, 4.0]]).unwrap();
        assert_eq!(m.to_string(), "1.00\t2.50\t\n-3.13\t4.00\t\n");
        assert_eq!(format!("{:.1}", m), "1.0\t2.5\t\n-3.1\t4.0\t\n");
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let a = Matrix::random(3, 4, Some(7)).unwrap();
        let b = Matrix::random(3, 4, Some(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dims(), Dims { rows: 3, cols: 4 });
    }
}
