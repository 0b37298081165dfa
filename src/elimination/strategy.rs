use crate::elimination::distributed::distributed_elimination;
use crate::elimination::parallel::parallel_elimination;
use crate::elimination::pooled::pooled_elimination;
use crate::elimination::sequential::sequential_elimination;
use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix2D;
use crate::matrix::matrix_gen::identity;
use crate::utils::{millis, timed};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    Parallel { workers: usize },
    Pooled { workers: usize },
    Distributed { participants: usize },
}

impl Strategy {
    pub const NAMES: [&'static str; 4] = ["sequential", "parallel", "pooled", "distributed"];

    // `workers` is ignored by the sequential strategy
    pub fn from_name(name: &str, workers: usize) -> Result<Strategy> {
        match name.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel { workers }),
            "pooled" => Ok(Strategy::Pooled { workers }),
            "distributed" => Ok(Strategy::Distributed {
                participants: workers,
            }),
            other => Err(MatrixError::Parse(format!(
                "unknown strategy `{other}`, expected one of {}",
                Strategy::NAMES.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel { .. } => "parallel",
            Strategy::Pooled { .. } => "pooled",
            Strategy::Distributed { .. } => "distributed",
        }
    }

    pub fn workers(&self) -> usize {
        match *self {
            Strategy::Sequential => 1,
            Strategy::Parallel { workers } | Strategy::Pooled { workers } => workers,
            Strategy::Distributed { participants } => participants,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Distributed { participants } => {
                write!(f, "distributed ({participants} ranks)")
            }
            other => write!(f, "{} ({} workers)", other.name(), other.workers()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EliminationConfig {
    // a pivot with `|value| <= pivot_tolerance` means the matrix is singular
    pub pivot_tolerance: f64,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        EliminationConfig {
            pivot_tolerance: 0.0,
        }
    }
}

// Reduce an augmented [A|B] matrix in place to [I|A^-1 B].
// On error the matrix is left partially eliminated and must be discarded.
pub fn eliminate(matrix: &mut Matrix2D, strategy: Strategy, config: &EliminationConfig) -> Result<()> {
    info!(
        %strategy,
        rows = matrix.rows(),
        cols = matrix.cols(),
        "starting elimination"
    );

    let tolerance = config.pivot_tolerance;
    let (result, elapsed) = timed(|| match strategy {
        Strategy::Sequential => sequential_elimination(matrix, tolerance),
        Strategy::Parallel { workers } => parallel_elimination(matrix, workers, tolerance),
        Strategy::Pooled { workers } => pooled_elimination(matrix, workers, tolerance),
        Strategy::Distributed { participants } => {
            distributed_elimination(matrix, participants, tolerance)
        }
    });

    match &result {
        Ok(()) => info!(%strategy, elapsed_ms = millis(elapsed), "elimination done"),
        Err(error) => info!(%strategy, %error, "elimination failed"),
    }
    result
}

// Inverse of a square matrix, computed on [A|I].
pub fn invert(matrix: &Matrix2D, strategy: Strategy, config: &EliminationConfig) -> Result<Matrix2D> {
    if !matrix.is_square() {
        return Err(MatrixError::NonSquare {
            size: matrix.rows(),
            values: matrix.size(),
        });
    }

    let mut augmented = matrix.clone();
    augmented.augment(&identity(matrix.rows()))?;
    eliminate(&mut augmented, strategy, config)?;
    augmented.right_block()
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
