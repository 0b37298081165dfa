use crate::elimination::kernel::{
    check_shape, check_tolerance, check_workers, partition_rows, prepare_diagonal, reduce_block,
    split_blocks,
};
use crate::error::Result;
use crate::matrix::matrix::Matrix2D;
use crate::utils::show_progression;
use std::time::Instant;
use tracing::{debug, trace};

// Same partitioning as `parallel_elimination`, but the worker threads live for the whole
// elimination: one pool is built up front and every diagonal hands it one task per block.
// `ThreadPool::scope` only returns once all tasks of the diagonal are done.
pub fn pooled_elimination(matrix: &mut Matrix2D, workers: usize, tolerance: f64) -> Result<()> {
    check_shape(matrix)?;
    check_workers(workers)?;
    check_tolerance(tolerance)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("gauss-worker-{i}"))
        .build()?;
    debug!(workers = pool.current_num_threads(), "worker pool ready");

    let rows = matrix.rows();
    let cols = matrix.cols();
    let ranges = partition_rows(rows, workers);
    let now = Instant::now();

    for diagonal in 0..rows {
        show_progression(diagonal, rows, now);

        let pivot = prepare_diagonal(matrix, diagonal, tolerance)?;
        let pivot = pivot.as_slice();
        let blocks = split_blocks(matrix.as_mut_slice(), cols, &ranges);

        pool.scope(|scope| {
            for (range, block) in ranges.iter().zip(blocks) {
                if range.is_empty() {
                    continue;
                }
                let first_row = range.start;
                trace!(diagonal, ?range, "queueing reduction task");
                scope.spawn(move |_| reduce_block(block, cols, first_row, diagonal, pivot));
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
    use crate::elimination::parallel::parallel_elimination;
    use crate::error::MatrixError;
    use crate::matrix::matrix_gen::{generate_matrix, identity, MatrixKind};

    #[test]
    fn test_pooled_matches_parallel() {
        let mut base = generate_matrix(MatrixKind::Random, 12);
        // diagonally dominant, so always invertible
        for i in 0..12 {
            base[(i, i)] += 2000.0;
        }
        base.augment(&identity(12)).unwrap();

        for workers in [1, 2, 4, 5] {
            let mut expected = base.clone();
            parallel_elimination(&mut expected, workers, 0.0).unwrap();

            let mut m = base.clone();
            pooled_elimination(&mut m, workers, 0.0).unwrap();
            assert_eq!(m, expected, "workers = {workers}");
        }
    }

    #[test]
    fn test_pooled_singular() {
        let mut m = Matrix2D::from_list(vec![
            vec![0.0, 0.0, 1.0, 0.0],
            vec![3.0, 1.0, 0.0, 1.0],
        ])
        .unwrap();
        // column 0 still has a usable pivot in row 1, column 1 does not
        assert!(matches!(
            pooled_elimination(&mut m, 2, 0.0),
            Err(MatrixError::Singular { diagonal: 1 })
        ));
    }

    #[test]
    fn test_pooled_zero_workers() {
        let mut m = Matrix2D::from_list(vec![vec![2.0, 1.0]]).unwrap();
        assert!(matches!(
            pooled_elimination(&mut m, 0, 0.0),
            Err(MatrixError::InvalidWorkers(0))
        ));
    }
}
