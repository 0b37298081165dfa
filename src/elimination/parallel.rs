use crate::elimination::kernel::{
    check_shape, check_tolerance, check_workers, partition_rows, prepare_diagonal, reduce_block,
    split_blocks,
};
use crate::error::Result;
use crate::matrix::matrix::Matrix2D;
use crate::utils::show_progression;
use std::thread;
use std::time::Instant;
use tracing::trace;

// Gauss-Jordan elimination, forking `workers` threads for the reduction of every diagonal.
// Each thread owns a disjoint row block; joining the scope is the barrier between diagonals.
pub fn parallel_elimination(matrix: &mut Matrix2D, workers: usize, tolerance: f64) -> Result<()> {
    check_shape(matrix)?;
    check_workers(workers)?;
    check_tolerance(tolerance)?;

    let rows = matrix.rows();
    let cols = matrix.cols();
    let ranges = partition_rows(rows, workers);
    let now = Instant::now();

    for diagonal in 0..rows {
        show_progression(diagonal, rows, now);

        let pivot = prepare_diagonal(matrix, diagonal, tolerance)?;
        let pivot = pivot.as_slice();
        let blocks = split_blocks(matrix.as_mut_slice(), cols, &ranges);

        thread::scope(|scope| {
            for (range, block) in ranges.iter().zip(blocks) {
                if range.is_empty() {
                    continue;
                }
                let first_row = range.start;
                trace!(diagonal, ?range, "spawning reduction worker");
                scope.spawn(move || reduce_block(block, cols, first_row, diagonal, pivot));
            }
        });
    }

    Ok(())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elimination::sequential::sequential_elimination;
    use crate::error::MatrixError;
    use crate::matrix::matrix_gen::identity;

    fn augmented(lines: Vec<Vec<f64>>) -> Matrix2D {
        let mut m = Matrix2D::from_list(lines).unwrap();
        m.augment(&identity(m.rows())).unwrap();
        m
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lines = vec![
            vec![2.0, -1.0, 0.0, 3.0, 1.0],
            vec![-1.0, 2.0, -1.0, 0.0, 4.0],
            vec![0.0, -1.0, 2.0, 5.0, 2.0],
            vec![1.0, 0.0, 3.0, 2.0, 1.0],
            vec![7.0, 1.0, 1.0, 0.0, 2.0],
        ];
        let mut expected = augmented(lines.clone());
        sequential_elimination(&mut expected, 0.0).unwrap();

        // uneven splits and more workers than rows
        for workers in [1, 2, 3, 4, 8] {
            let mut m = augmented(lines.clone());
            parallel_elimination(&mut m, workers, 0.0).unwrap();
            assert_eq!(m, expected, "workers = {workers}");
        }
    }

    #[test]
    fn test_parallel_singular() {
        let mut m = augmented(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert!(matches!(
            parallel_elimination(&mut m, 2, 0.0),
            Err(MatrixError::Singular { diagonal: 1 })
        ));
    }

    #[test]
    fn test_parallel_zero_workers() {
        let mut m = augmented(vec![vec![1.0]]);
        assert!(matches!(
            parallel_elimination(&mut m, 0, 0.0),
            Err(MatrixError::InvalidWorkers(0))
        ));
    }
}
