pub mod elimination {
    pub mod distributed;
    pub mod kernel;
    pub mod parallel;
    pub mod pooled;
    pub mod sequential;
    pub mod strategy;
}
pub mod matrix {
    pub mod matrix;
    pub mod matrix_gen;
    pub mod matrix_io;
}

pub mod error;
pub mod utils;

#[cfg(feature = "python")]
pub mod python;

mod proptests;

pub use elimination::strategy::{eliminate, invert, EliminationConfig, Strategy};
pub use error::{MatrixError, Result};
pub use matrix::matrix::Matrix2D;
