// matrix_io.rs

//! # Matrix I/O Module
//!
//! Reads and writes matrices as plain text grids: one row per line, values separated by
//! whitespace. Blank lines are ignored and a comma is accepted as the decimal separator,
//! so `1,5 2` parses as `[1.5, 2.0]`.
//!
//! The first non-blank line decides how many columns the matrix has.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error, info};

use crate::error::ParseError;
use crate::matrix::Matrix;

/// Parses a matrix from text lines.
pub fn parse_lines<I, S>(lines: I) -> Result<Matrix, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut raw_data_values = Vec::new();
    let mut num_cols: Option<usize> = None;
    let mut row_count = 0;

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_row(line, line_number)?;

        match num_cols {
            None => {
                debug!(cols = row.len(), "column count set by first row");
                num_cols = Some(row.len());
            }
            Some(expected) if expected != row.len() => {
                error!(line = line_number, expected, found = row.len(), "row length differs");
                return Err(ParseError::Rectangularity {
                    line: line_number,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }

        raw_data_values.extend(row);
        row_count += 1;
    }

    let cols = num_cols.ok_or(ParseError::EmptyContent)?;
    Ok(Matrix::new(row_count, cols, raw_data_values)?)
}

/// Parses a matrix from a block of text.
pub fn parse_str(text: &str) -> Result<Matrix, ParseError> {
    parse_lines(text.lines())
}

/// Loads a matrix from a text file.
pub fn read_matrix_from_file<P: AsRef<Path>>(path: P) -> Result<Matrix, ParseError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading matrix");

    let io_error = |source: io::Error| {
        error!(path = %path.display(), %source, "could not read matrix file");
        ParseError::Io {
            path: path.to_path_buf(),
            source,
        }
    };

    let file = File::open(path).map_err(io_error)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;

    let matrix = parse_lines(lines)?;
    info!(dims = %matrix.dims(), "matrix loaded");
    Ok(matrix)
}

/// Text form that `parse_str` reads back to the same values.
pub fn encode(matrix: &Matrix) -> String {
    let mut text = String::new();
    for row in matrix.rows_iter() {
        let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        text.push_str(&cells.join(" "));
        text.push('\n');
    }
    text
}

pub fn write_matrix_to_file<P: AsRef<Path>>(path: P, matrix: &Matrix) -> io::Result<()> {
    fs::write(path, encode(matrix))
}

fn parse_row(line: &str, line_number: usize) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            token.replace(',', ".").parse::<f64>().map_err(|_| {
                error!(line = line_number, token, "invalid number");
                ParseError::NumberFormat {
                    line: line_number,
                    token: token.to_string(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_grid() {
        let m = parse_str("1 2\n3 4").unwrap();
        assert_eq!(m, Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap());
    }

    #[test]
    fn tolerates_runs_of_whitespace_and_tabs() {
        let m = parse_str("1.5 2.0 3.14\n4.5   5.5\t6.0").unwrap();
        assert_eq!(
            m,
            Matrix::from_rows(&[[1.5, 2.0, 3.14], [4.5, 5.5, 6.0]]).unwrap()
        );
    }

    #[test]
    fn skips_blank_lines_and_accepts_commas() {
        let m = parse_lines([" 1,1 2,2 ", "", "   ", " 3.3 4.4 "]).unwrap();
        assert_eq!(m, Matrix::from_rows(&[[1.1, 2.2], [3.3, 4.4]]).unwrap());
    }

    #[test]
    fn rejects_ragged_rows() {
        match parse_str("1 2 3\n4 5") {
            Err(ParseError::Rectangularity {
                line,
                expected,
                found,
            }) => {
                assert_eq!((line, expected, found), (2, 3, 2));
            }
            other => panic!("expected a rectangularity error, got {:?}", other),
        }
    }

    #[test]
    fn line_numbers_count_blank_lines() {
        let err = parse_str("1 2\n\n3").unwrap_err();
        assert!(matches!(err, ParseError::Rectangularity { line: 3, .. }));
    }

    #[test]
    fn names_the_bad_token() {
        let err = parse_str("1 2\n3 X").unwrap_err();
        assert!(matches!(
            &err,
            ParseError::NumberFormat { line: 2, token } if token == "X"
        ));
        assert_eq!(err.to_string(), "line 2: 'X' is not a number");
    }

    #[test]
    fn blank_input_is_empty_content() {
        assert!(matches!(parse_str(""), Err(ParseError::EmptyContent)));
        assert!(matches!(
            parse_lines(["", "   ", "\t"]),
            Err(ParseError::EmptyContent)
        ));
    }

    #[test]
    fn single_row_is_valid() {
        let m = parse_str("1.0 2.0 3.0").unwrap();
        assert_eq!((m.rows(), m.cols()), (1, 3));
    }

    #[test]
    fn encode_is_read_back_exactly() {
        let m = Matrix::from_rows(&[[0.1, -2.0, 1e-12], [3.5, 1e20, 7.0]]).unwrap();
        assert_eq!(parse_str(&encode(&m)).unwrap(), m);
    }
}
