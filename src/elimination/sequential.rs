use crate::elimination::kernel::{check_shape, check_tolerance, prepare_diagonal, reduce_block};
use crate::error::Result;
use crate::matrix::matrix::Matrix2D;
use crate::utils::show_progression;
use std::time::Instant;

// Gauss-Jordan elimination on one thread
pub fn sequential_elimination(matrix: &mut Matrix2D, tolerance: f64) -> Result<()> {
    check_shape(matrix)?;
    check_tolerance(tolerance)?;

    let rows = matrix.rows();
    let cols = matrix.cols();
    let now = Instant::now();

    for diagonal in 0..rows {
        show_progression(diagonal, rows, now);

        let pivot = prepare_diagonal(matrix, diagonal, tolerance)?;
        reduce_block(matrix.as_mut_slice(), cols, 0, diagonal, &pivot);
    }

    Ok(())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sequential_2x2() {
        let mut m = Matrix2D::from_list(vec![
            vec![4.0, 7.0, 1.0, 0.0],
            vec![2.0, 6.0, 0.0, 1.0],
        ])
        .unwrap();
        sequential_elimination(&mut m, 0.0).unwrap();

        let expected = [1.0, 0.0, 0.6, -0.7, 0.0, 1.0, -0.2, 0.4];
        for (value, expected) in m.as_slice().iter().zip(expected) {
            assert_abs_diff_eq!(*value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sequential_needs_swap() {
        let mut m = Matrix2D::from_list(vec![
            vec![0.0, 1.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        sequential_elimination(&mut m, 0.0).unwrap();
        assert_eq!(
            m.to_list(),
            vec![vec![1.0, 0.0, 0.0, 1.0], vec![0.0, 1.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_sequential_singular() {
        let mut m = Matrix2D::from_list(vec![
            vec![1.0, 2.0, 1.0, 0.0],
            vec![2.0, 4.0, 0.0, 1.0],
        ])
        .unwrap();
        assert!(matches!(
            sequential_elimination(&mut m, 0.0),
            Err(MatrixError::Singular { diagonal: 1 })
        ));
    }

    #[test]
    fn test_sequential_invalid_shape() {
        let mut m = Matrix2D::new(3, 2);
        assert!(matches!(
            sequential_elimination(&mut m, 0.0),
            Err(MatrixError::InvalidShape { .. })
        ));
    }
}
