use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix2D;
use std::ops::Range;
use tracing::{debug, warn};

pub fn check_shape(matrix: &Matrix2D) -> Result<()> {
    if matrix.rows() == 0 || matrix.cols() < matrix.rows() {
        return Err(MatrixError::InvalidShape {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }
    Ok(())
}

pub fn check_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(MatrixError::InvalidWorkers(workers));
    }
    Ok(())
}

// A negative or NaN tolerance would make every pivot pass the singularity check.
pub fn check_tolerance(tolerance: f64) -> Result<()> {
    if !(tolerance >= 0.0) || !tolerance.is_finite() {
        return Err(MatrixError::InvalidTolerance(tolerance));
    }
    Ok(())
}

// Row in `diagonal..rows` with the largest magnitude in column `diagonal`.
// Strict `>` so the first row wins ties.
pub fn select_pivot(matrix: &Matrix2D, diagonal: usize) -> usize {
    let mut pivot_row = diagonal;
    let mut pivot_abs = matrix[(diagonal, diagonal)].abs();

    for row in diagonal + 1..matrix.rows() {
        let candidate = matrix[(row, diagonal)].abs();
        if candidate > pivot_abs {
            pivot_row = row;
            pivot_abs = candidate;
        }
    }
    pivot_row
}

// Pivot search, singularity check, swap and normalization for one diagonal.
// Returns a copy of the normalized pivot row, which every reduction step reads.
pub fn prepare_diagonal(matrix: &mut Matrix2D, diagonal: usize, tolerance: f64) -> Result<Vec<f64>> {
    let pivot_row = select_pivot(matrix, diagonal);
    let pivot_value = matrix[(pivot_row, diagonal)];

    if pivot_value.is_nan() || pivot_value.abs() <= tolerance {
        warn!(diagonal, pivot_value, "matrix is singular");
        return Err(MatrixError::Singular { diagonal });
    }

    if pivot_row != diagonal {
        debug!(diagonal, pivot_row, "swapping rows");
        matrix.swap_rows(diagonal, pivot_row)?;
    }

    let row = matrix.row_mut(diagonal)?;
    // columns left of the diagonal are already zero
    for value in &mut row[diagonal..] {
        *value /= pivot_value;
    }
    debug!(diagonal, pivot_value, "normalized pivot row");

    Ok(row.to_vec())
}

// Zero column `diagonal` in every row of a contiguous row-major block, except the pivot row.
// `first_row` is the global index of the block's first row.
pub fn reduce_block(block: &mut [f64], cols: usize, first_row: usize, diagonal: usize, pivot: &[f64]) {
    if cols == 0 {
        return;
    }

    for (local, row) in block.chunks_exact_mut(cols).enumerate() {
        if first_row + local == diagonal {
            continue;
        }

        let ratio = row[diagonal];
        for (value, pivot_value) in row[diagonal..].iter_mut().zip(&pivot[diagonal..]) {
            *value -= pivot_value * ratio;
        }
    }
}

// Split `rows` into `parts` contiguous ranges. The first `rows % parts` ranges get one
// extra row; ranges are empty when there are more parts than rows.
pub fn partition_rows(rows: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return vec![];
    }

    let base = rows / parts;
    let extra = rows % parts;
    let mut start = 0;

    (0..parts)
        .map(|part| {
            let len = base + usize::from(part < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

// Disjoint mutable row blocks of a row-major buffer, one per range.
// Ranges must be sorted and contiguous from row 0, as `partition_rows` builds them.
pub fn split_blocks<'a>(
    mut cells: &'a mut [f64],
    cols: usize,
    ranges: &[Range<usize>],
) -> Vec<&'a mut [f64]> {
    let mut blocks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (block, rest) = std::mem::take(&mut cells).split_at_mut(range.len() * cols);
        blocks.push(block);
        cells = rest;
    }
    blocks
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_pivot() {
        let m = Matrix2D::from_list(vec![
            vec![1.0, 0.0],
            vec![-3.0, 0.0],
            vec![3.0, 0.0],
        ])
        .unwrap();
        // magnitudes compared, earlier row wins the tie
        assert_eq!(select_pivot(&m, 0), 1);

        let m = Matrix2D::from_list(vec![vec![2.0, 1.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(select_pivot(&m, 0), 0);
    }

    #[test]
    fn test_prepare_diagonal() {
        let mut m = Matrix2D::from_list(vec![
            vec![2.0, 6.0, 1.0, 0.0],
            vec![4.0, 7.0, 0.0, 1.0],
        ])
        .unwrap();
        let pivot = prepare_diagonal(&mut m, 0, 0.0).unwrap();

        assert_eq!(pivot, vec![1.0, 1.75, 0.0, 0.25]);
        assert_eq!(m.row(0).unwrap(), pivot.as_slice());
        assert_eq!(m.row(1).unwrap(), &[2.0, 6.0, 1.0, 0.0]);
    }

    #[test]
    fn test_prepare_diagonal_singular() {
        let mut m = Matrix2D::from_list(vec![
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0],
        ])
        .unwrap();
        assert!(matches!(
            prepare_diagonal(&mut m, 0, 0.0),
            Err(MatrixError::Singular { diagonal: 0 })
        ));

        let mut m = Matrix2D::from_list(vec![vec![1e-12, 1.0]]).unwrap();
        assert!(prepare_diagonal(&mut m.clone(), 0, 0.0).is_ok());
        assert!(prepare_diagonal(&mut m, 0, 1e-9).is_err());
    }

    #[test]
    fn test_reduce_block() {
        let pivot = vec![1.0, 1.75, 0.0, 0.25];
        let mut block = vec![1.0, 1.75, 0.0, 0.25, 2.0, 6.0, 1.0, 0.0];
        reduce_block(&mut block, 4, 0, 0, &pivot);
        assert_eq!(block, vec![1.0, 1.75, 0.0, 0.25, 0.0, 2.5, 1.0, -0.5]);

        // a block that does not hold the pivot row reduces every row
        let mut block = vec![2.0, 6.0, 1.0, 0.0];
        reduce_block(&mut block, 4, 1, 0, &pivot);
        assert_eq!(block, vec![0.0, 2.5, 1.0, -0.5]);
    }

    #[test]
    fn test_partition_rows() {
        assert_eq!(partition_rows(4, 2), vec![0..2, 2..4]);
        assert_eq!(partition_rows(5, 2), vec![0..3, 3..5]);
        assert_eq!(partition_rows(7, 3), vec![0..3, 3..5, 5..7]);
        assert_eq!(partition_rows(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert!(partition_rows(3, 0).is_empty());
    }

    #[test]
    fn test_split_blocks() {
        let mut cells: Vec<f64> = (0..10).map(|x| x as f64).collect();
        let ranges = partition_rows(5, 3);
        let blocks = split_blocks(&mut cells, 2, &ranges);

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(blocks[1], &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(blocks[2], &[8.0, 9.0]);
    }

    #[test]
    fn test_checks() {
        assert!(check_shape(&Matrix2D::new(2, 4)).is_ok());
        assert!(matches!(
            check_shape(&Matrix2D::new(3, 2)),
            Err(MatrixError::InvalidShape { rows: 3, cols: 2 })
        ));
        assert!(check_shape(&Matrix2D::new(0, 0)).is_err());
        assert!(matches!(check_workers(0), Err(MatrixError::InvalidWorkers(0))));
        assert!(check_workers(1).is_ok());

        assert!(check_tolerance(0.0).is_ok());
        assert!(check_tolerance(1e-9).is_ok());
        for bad in [-1.0, -0.5e-300, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(check_tolerance(bad), Err(MatrixError::InvalidTolerance(_))));
        }
    }
}
