use crate::error::MatrixError;
use crate::matrix::matrix::Matrix2D;
use rand::Rng;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Random,
    Identity,
}

impl FromStr for MatrixKind {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(MatrixKind::Random),
            "identity" => Ok(MatrixKind::Identity),
            other => Err(MatrixError::Parse(format!("unknown matrix kind `{other}`"))),
        }
    }
}

pub fn generate_matrix(kind: MatrixKind, size: usize) -> Matrix2D {
    match kind {
        MatrixKind::Random => random(size),
        MatrixKind::Identity => identity(size),
    }
}

pub fn identity(size: usize) -> Matrix2D {
    let mut m = Matrix2D::square(size);
    for i in 0..size {
        m[(i, i)] = 1.0;
    }
    m
}

// Integers drawn uniformly from 0..=100, seeded from the OS. Demo data, not reproducible.
pub fn random(size: usize) -> Matrix2D {
    let mut rng = rand::thread_rng();
    let mut m = Matrix2D::square(size);
    for i in 0..size {
        for j in 0..size {
            m[(i, j)] = rng.gen_range(0..=100) as f64;
        }
    }
    m
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        for size in 1..6 {
            let m = generate_matrix(MatrixKind::Identity, size);
            assert_eq!(m.rows(), size);
            assert_eq!(m.cols(), size);
            for i in 0..size {
                for j in 0..size {
                    assert_eq!(m[(i, j)], if i == j { 1.0 } else { 0.0 });
                }
            }
        }
    }

    #[test]
    fn test_random_range() {
        let m = generate_matrix(MatrixKind::Random, 8);
        assert_eq!(m.size(), 64);
        assert!(m
            .as_slice()
            .iter()
            .all(|x| (0.0..=100.0).contains(x) && x.fract() == 0.0));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("identity".parse::<MatrixKind>().unwrap(), MatrixKind::Identity);
        assert_eq!("Random".parse::<MatrixKind>().unwrap(), MatrixKind::Random);
        assert!("zeros".parse::<MatrixKind>().is_err());
    }
}
