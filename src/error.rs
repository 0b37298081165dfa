use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("provided matrix isn't square and cannot be inverted: size {size} declared, {values} values found")]
    NonSquare { size: usize, values: usize },

    #[error("provided matrix cannot be inverted: no usable pivot in column {diagonal}")]
    Singular { diagonal: usize },

    #[error("dimensions not compatible: {left:?} and {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) out of bounds for a {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("cannot eliminate a {rows}x{cols} matrix, expected at least one row and cols >= rows")]
    InvalidShape { rows: usize, cols: usize },

    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkers(usize),

    #[error("pivot tolerance must be finite and at least 0, got {0}")]
    InvalidTolerance(f64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("transport error: {0}")]
    Transport(String),
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
