// determinant.rs

//! # Determinant Module
//!
//! Determinant by Gaussian elimination with partial pivoting.
//!
//! For each pivot column `k` the row (at or below `k`) with the largest absolute value in
//! that column is swapped into place, earlier rows winning ties. A pivot whose magnitude is
//! below `SINGULARITY_EPSILON` ends the computation with exactly `0.0`. Otherwise the rows
//! below are eliminated, and the result is the product of the diagonal, negated when an odd
//! number of row swaps took place.
//!
//! The threshold is absolute: matrices whose entries are all very small may be reported as
//! singular, and matrices with very large entries may slip past it. It is not rescaled.
//!
//! Intermediate steps are reported through an `EliminationObserver`, so callers decide
//! whether they are logged, recorded, or ignored.

use tracing::{debug, trace};

use crate::matrix::Matrix;

/// Pivots with an absolute value below this are treated as zero.
pub const SINGULARITY_EPSILON: f64 = 1e-9;

/// A single step of the elimination, as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EliminationEvent {
    /// `row` holds the largest magnitude in `column` (before any swap).
    PivotSelected { column: usize, row: usize, value: f64 },
    /// Rows were exchanged; `swaps` is the running total.
    RowsSwapped { first: usize, second: usize, swaps: usize },
    /// The pivot for `column` fell below the threshold; the determinant is `0.0`.
    Singular { column: usize, pivot: f64 },
    /// Elimination ran to completion.
    Finished { determinant: f64, swaps: usize },
}

pub trait EliminationObserver {
    fn observe(&mut self, event: EliminationEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EliminationObserver for NoopObserver {
    fn observe(&mut self, _event: EliminationEvent) {}
}

/// Forwards events to `tracing`: pivots at trace level, everything else at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EliminationObserver for TracingObserver {
    fn observe(&mut self, event: EliminationEvent) {
        match event {
            EliminationEvent::PivotSelected { column, row, value } => {
                trace!(column, row, value, "pivot selected")
            }
            EliminationEvent::RowsSwapped { first, second, swaps } => {
                debug!(first, second, swaps, "rows swapped")
            }
            EliminationEvent::Singular { column, pivot } => {
                debug!(column, pivot, "pivot below threshold, determinant is zero")
            }
            EliminationEvent::Finished { determinant, swaps } => {
                debug!(determinant, swaps, "elimination finished")
            }
        }
    }
}

// Records every event in order
impl EliminationObserver for Vec<EliminationEvent> {
    fn observe(&mut self, event: EliminationEvent) {
        self.push(event);
    }
}

/// Runs the elimination on a working copy of `matrix`. The caller guarantees it is square.
pub(crate) fn gaussian_elimination<O>(matrix: &Matrix, observer: &mut O) -> f64
where
    O: EliminationObserver + ?Sized,
{
    debug_assert!(matrix.is_square());

    let n = matrix.rows();
    let mut a = matrix.to_rows();
    let mut swaps = 0usize;

    for k in 0..n {
        // strict comparison keeps the earliest row on ties
        let mut pivot_row = k;
        for i in (k + 1)..n {
            if a[i][k].abs() > a[pivot_row][k].abs() {
                pivot_row = i;
            }
        }
        observer.observe(EliminationEvent::PivotSelected {
            column: k,
            row: pivot_row,
            value: a[pivot_row][k],
        });

        if pivot_row != k {
            a.swap(k, pivot_row);
            swaps += 1;
            observer.observe(EliminationEvent::RowsSwapped {
                first: k,
                second: pivot_row,
                swaps,
            });
        }

        let pivot = a[k][k];
        if pivot.abs() < SINGULARITY_EPSILON {
            observer.observe(EliminationEvent::Singular { column: k, pivot });
            return 0.0;
        }

        let (upper, lower) = a.split_at_mut(k + 1);
        let pivot_values = &upper[k];
        for row in lower.iter_mut() {
            let factor = row[k] / pivot;
            for j in k..n {
                row[j] -= factor * pivot_values[j];
            }
        }
    }

    let mut determinant: f64 = (0..n).map(|i| a[i][i]).product();
    if swaps % 2 != 0 {
        determinant = -determinant;
    }

    observer.observe(EliminationEvent::Finished { determinant, swaps });
    determinant
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(grid: &[&[f64]]) -> Matrix {
        Matrix::from_rows(grid).unwrap()
    }

    fn det(grid: &[&[f64]]) -> f64 {
        gaussian_elimination(&m(grid), &mut NoopObserver)
    }

    #[test]
    fn single_element_is_its_own_determinant() {
        assert_eq!(det(&[&[-7.5]]), -7.5);
    }

    #[test]
    fn tiny_single_element_is_zero() {
        assert_eq!(det(&[&[1e-10]]), 0.0);
    }

    #[test]
    fn threshold_is_absolute() {
        // true determinant is 1.0, but the first pivot is below the threshold
        assert_eq!(det(&[&[1e-10, 0.0], &[0.0, 1e10]]), 0.0);
        assert_eq!(SINGULARITY_EPSILON, 1e-9);
    }

    #[test]
    fn ties_keep_the_earlier_row() {
        let mut events: Vec<EliminationEvent> = Vec::new();
        let result = gaussian_elimination(&m(&[&[1.0, 2.0], &[-1.0, 3.0]]), &mut events);

        assert!((result - 5.0).abs() < 1e-12);
        assert_eq!(
            events[0],
            EliminationEvent::PivotSelected {
                column: 0,
                row: 0,
                value: 1.0
            }
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, EliminationEvent::RowsSwapped { .. })));
    }

    #[test]
    fn odd_swap_count_flips_the_sign() {
        let mut events: Vec<EliminationEvent> = Vec::new();
        let result = gaussian_elimination(&m(&[&[0.0, 1.0], &[1.0, 0.0]]), &mut events);

        assert_eq!(result, -1.0);
        assert_eq!(
            events,
            vec![
                EliminationEvent::PivotSelected {
                    column: 0,
                    row: 1,
                    value: 1.0
                },
                EliminationEvent::RowsSwapped {
                    first: 0,
                    second: 1,
                    swaps: 1
                },
                EliminationEvent::PivotSelected {
                    column: 1,
                    row: 1,
                    value: 1.0
                },
                EliminationEvent::Finished {
                    determinant: -1.0,
                    swaps: 1
                },
            ]
        );
    }

    #[test]
    fn singular_matrix_short_circuits() {
        let mut events: Vec<EliminationEvent> = Vec::new();
        let result = gaussian_elimination(&m(&[&[1.0, 2.0], &[2.0, 4.0]]), &mut events);

        assert_eq!(result, 0.0);
        assert_eq!(
            events.last(),
            Some(&EliminationEvent::Singular {
                column: 1,
                pivot: 0.0
            })
        );
    }

    #[test]
    fn zero_column_stops_before_later_pivots() {
        let mut events: Vec<EliminationEvent> = Vec::new();
        let result = gaussian_elimination(
            &m(&[&[0.0, 1.0, 2.0], &[0.0, 3.0, 4.0], &[0.0, 5.0, 6.0]]),
            &mut events,
        );

        assert_eq!(result, 0.0);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            EliminationEvent::Singular {
                column: 0,
                pivot: 0.0
            }
        );
    }

    #[test]
    fn input_matrix_is_not_modified() {
        let input = m(&[&[2.0, 1.0], &[4.0, 3.0]]);
        let before = input.clone();

        let result = gaussian_elimination(&input, &mut TracingObserver);

        assert!((result - 2.0).abs() < 1e-12);
        assert_eq!(input, before);
    }

    #[test]
    fn upper_triangular_is_product_of_diagonal() {
        let result = det(&[&[2.0, 5.0, 1.0], &[0.0, 3.0, 7.0], &[0.0, 0.0, -4.0]]);
        assert!((result + 24.0).abs() < 1e-12);
    }
}
