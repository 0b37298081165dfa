use crate::elimination::strategy::{self, EliminationConfig, Strategy};
use crate::error::MatrixError;
use crate::matrix::matrix::Matrix2D;
use crate::matrix::matrix_gen::{self, MatrixKind};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<MatrixError> for PyErr {
    fn from(error: MatrixError) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

#[pyfunction]
#[pyo3(signature = (rows, strategy="sequential", workers=4, tolerance=0.0))]
pub fn invert(
    py: Python,
    rows: Vec<Vec<f64>>,
    strategy: &str,
    workers: usize,
    tolerance: f64,
) -> PyResult<Vec<Vec<f64>>> {
    let matrix = Matrix2D::from_list(rows)?;
    let strategy = Strategy::from_name(strategy, workers)?;
    let config = EliminationConfig {
        pivot_tolerance: tolerance,
    };

    // the strategies spawn their own threads, no need to hold the GIL meanwhile
    let inverse = py.allow_threads(|| strategy::invert(&matrix, strategy, &config))?;
    Ok(inverse.to_list())
}

#[pyfunction]
pub fn generate_matrix(kind: &str, size: usize) -> PyResult<Vec<Vec<f64>>> {
    let kind: MatrixKind = kind.parse()?;
    Ok(matrix_gen::generate_matrix(kind, size).to_list())
}

/// A Python module implemented in Rust.
#[pymodule]
fn gauss_jordan(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(invert, m)?)?;
    m.add_function(wrap_pyfunction!(generate_matrix, m)?)?;
    Ok(())
}
