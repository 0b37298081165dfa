use crate::error::{MatrixError, Result};
use std::ops;

// Dense row-major matrix of f64. Every row has `cols` cells, `cells.len() == rows * cols`
// is kept by every constructor and mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix2D {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Matrix2D {
    // Panics like `Vec` does when `rows * cols` cells cannot be allocated.
    pub fn new(rows: usize, cols: usize) -> Matrix2D {
        let len = rows.checked_mul(cols).unwrap_or(usize::MAX);
        Matrix2D {
            rows,
            cols,
            cells: vec![0.0; len],
        }
    }

    pub fn square(size: usize) -> Matrix2D {
        Matrix2D::new(size, size)
    }

    pub fn from_vec(rows: usize, cols: usize, cells: Vec<f64>) -> Result<Matrix2D> {
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(MatrixError::DimensionMismatch {
                left: (rows, cols),
                right: (cells.len(), 1),
            });
        }
        Ok(Matrix2D { rows, cols, cells })
    }

    pub fn from_list(lines: Vec<Vec<f64>>) -> Result<Matrix2D> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);

        if let Some(bad) = lines.iter().position(|l| l.len() != cols) {
            return Err(MatrixError::DimensionMismatch {
                left: (rows, cols),
                right: (bad, lines[bad].len()),
            });
        }

        Ok(Matrix2D {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.row_iter().map(|row| row.to_vec()).collect()
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    // number of elements
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    fn check(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let index = self.check(row, col)?;
        Ok(self.cells[index])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f64> {
        let index = self.check(row, col)?;
        Ok(&mut self.cells[index])
    }

    pub fn row(&self, row: usize) -> Result<&[f64]> {
        self.check(row, 0)?;
        Ok(&self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn row_mut(&mut self, row: usize) -> Result<&mut [f64]> {
        self.check(row, 0)?;
        Ok(&mut self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |r| &self.cells[r * self.cols..(r + 1) * self.cols])
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) -> Result<()> {
        self.check(first, 0)?;
        self.check(second, 0)?;
        if first == second {
            return Ok(());
        }

        let (low, high) = (first.min(second), first.max(second));
        let (head, tail) = self.cells.split_at_mut(high * self.cols);
        head[low * self.cols..(low + 1) * self.cols].swap_with_slice(&mut tail[..self.cols]);
        Ok(())
    }

    // Append every column of `other` to the rows of `self`, row by row.
    pub fn augment(&mut self, other: &Matrix2D) -> Result<()> {
        if self.rows != other.rows {
            return Err(MatrixError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }

        let cols = self.cols + other.cols;
        let cells = (0..self.rows)
            .flat_map(|r| {
                let left = &self.cells[r * self.cols..(r + 1) * self.cols];
                let right = &other.cells[r * other.cols..(r + 1) * other.cols];
                left.iter().chain(right.iter()).copied()
            })
            .collect();

        self.cols = cols;
        self.cells = cells;
        Ok(())
    }

    // Columns `start..end` of every row, as a new matrix.
    pub fn columns(&self, start: usize, end: usize) -> Result<Matrix2D> {
        if start > end || end > self.cols {
            return Err(MatrixError::OutOfBounds {
                row: 0,
                col: end,
                rows: self.rows,
                cols: self.cols,
            });
        }

        Ok(Matrix2D {
            rows: self.rows,
            cols: end - start,
            cells: self
                .row_iter()
                .flat_map(|row| row[start..end].iter().copied())
                .collect(),
        })
    }

    pub fn right_block(&self) -> Result<Matrix2D> {
        self.columns(self.cols.saturating_sub(self.rows), self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    // Row-major copy of all cells.
    pub fn flatten(&self) -> Vec<f64> {
        self.cells.clone()
    }

    // Overwrite all cells from a row-major buffer of the same size.
    pub fn replace_from_slice(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.cells.len() {
            return Err(MatrixError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (values.len(), 1),
            });
        }
        self.cells.copy_from_slice(values);
        Ok(())
    }
}

impl ops::Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.cells[row * self.cols + col]
    }
}

impl ops::IndexMut<(usize, usize)> for Matrix2D {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.cells[row * self.cols + col]
    }
}

impl ops::Mul<&Matrix2D> for &Matrix2D {
    type Output = Result<Matrix2D>;

    fn mul(self, rhs: &Matrix2D) -> Result<Matrix2D> {
        if self.cols != rhs.rows {
            return Err(MatrixError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (rhs.rows, rhs.cols),
            });
        }

        Ok(Matrix2D {
            rows: self.rows,
            cols: rhs.cols,
            cells: (0..self.rows)
                .flat_map(|i| {
                    (0..rhs.cols)
                        .map(move |j| (0..self.cols).map(|k| self[(i, k)] * rhs[(k, j)]).sum())
                })
                .collect(),
        })
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
