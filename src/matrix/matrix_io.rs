use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix2D;
use itertools::Itertools;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

const FIELD_WIDTH: usize = 10;
const PRECISION: usize = 2;

// Text format: the size N first, then N * N whitespace separated values, row-major.
pub fn parse_matrix(input: &str) -> Result<Matrix2D> {
    let mut tokens = input.split_whitespace();

    let size_token = tokens
        .next()
        .ok_or_else(|| MatrixError::Parse("empty input, expected the matrix size".into()))?;
    let size: usize = size_token
        .parse()
        .map_err(|_| MatrixError::Parse(format!("invalid matrix size `{size_token}`")))?;
    if size == 0 {
        return Err(MatrixError::Parse("matrix size must be at least 1".into()));
    }

    let values = tokens
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| MatrixError::Parse(format!("invalid value `{token}`")))
        })
        .collect::<Result<Vec<f64>>>()?;

    let expected = size
        .checked_mul(size)
        .ok_or_else(|| MatrixError::Parse(format!("matrix size {size} is too large")))?;
    if values.len() != expected {
        return Err(MatrixError::NonSquare {
            size,
            values: values.len(),
        });
    }

    Matrix2D::from_vec(size, size, values)
}

pub fn read_matrix(mut reader: impl Read) -> Result<Matrix2D> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_matrix(&input)
}

pub fn read_matrix_from_file(path: impl AsRef<Path>) -> Result<Matrix2D> {
    let input = fs::read_to_string(path)?;
    parse_matrix(&input)
}

pub fn format_matrix(matrix: &Matrix2D) -> String {
    let mut output = matrix
        .row_iter()
        .map(|row| {
            row.iter()
                .map(|x| format!("{:>width$.prec$}", x, width = FIELD_WIDTH, prec = PRECISION))
                .join("")
        })
        .join("\n");
    if matrix.rows() > 0 {
        output.push('\n');
    }
    output.push('\n');
    output
}

// One line per row, fixed-width fields, blank line after the matrix.
pub fn write_matrix(matrix: &Matrix2D, mut writer: impl Write) -> Result<()> {
    writer.write_all(format_matrix(matrix).as_bytes())?;
    writer.flush()?;
    Ok(())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
