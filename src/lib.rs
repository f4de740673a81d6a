//! kalman_rt — effective reproduction number estimation from growth-rate
//! series with a Kalman-smoothed local-level model.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing the estimator and the batch driver
//! through the `_kalman_rt` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `optimization` (generic L-BFGS maximum
//!   likelihood), `state_space` (local-level model, Kalman filter/smoother,
//!   `estimate_r`) and `batch` (per-country runs over CSV datasets).
//! - Define the `#[pyfunction]`s, the result `#[pyclass]` and the
//!   `#[pymodule]` initializer when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the binding layer only
//!   converts inputs, validates signs of integer arguments, and maps errors.
//!
//! Conventions
//! -----------
//! - Errors are rich Rust enums internally and become `PyErr` at the PyO3
//!   boundary (`ValueError`, or `OSError` for file-system failures).
//! - `NaN` entries in a series are missing observations.
//!
//! Downstream usage
//! ----------------
//! - Rust code calls [`state_space::estimate_r`] for one series or
//!   [`batch::parametrized_estimation`] for a full run.
//! - The `estimate-r` binary wraps the batch driver for the command line.

pub mod batch;
pub mod optimization;
pub mod state_space;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use std::path::PathBuf;

#[cfg(feature = "python-bindings")]
use crate::{
    batch::{BatchConfig, Method, ParameterTable, RunRequest, Variation},
    state_space::{EstimationResult, EstimatorOptions},
};

/// Python-facing snapshot of an [`EstimationResult`].
///
/// Arrays are copied into plain lists; all fields are read-only properties.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "kalman_rt", name = "Estimation", get_all, frozen)]
pub struct PyEstimation {
    pub r: Vec<f64>,
    pub se: Vec<f64>,
    pub flag: i32,
    pub sigma2_irregular: f64,
    pub sigma2_level: f64,
    pub signal_to_noise: f64,
    pub loglik: f64,
    pub iterations: usize,
    pub status: String,
}

#[cfg(feature = "python-bindings")]
impl From<EstimationResult> for PyEstimation {
    fn from(res: EstimationResult) -> Self {
        PyEstimation {
            r: res.r.to_vec(),
            se: res.se.to_vec(),
            flag: res.flag,
            sigma2_irregular: res.sigma2_irregular,
            sigma2_level: res.sigma2_level,
            signal_to_noise: res.signal_to_noise,
            loglik: res.loglik,
            iterations: res.iterations,
            status: res.status,
        }
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyEstimation {
    fn __repr__(&self) -> String {
        format!(
            "Estimation(n={}, flag={}, sigma2_irregular={:.6e}, sigma2_level={:.6e})",
            self.r.len(),
            self.flag,
            self.sigma2_irregular,
            self.sigma2_level
        )
    }
}

/// Estimate `R(t)` for one growth-rate series.
///
/// Parameters
/// ----------
/// - `series`: growth rates, `NaN` for missing days.
/// - `gamma`: recovery rate, `1 / infectious period`.
/// - `grid_size`: `0` for a single start, `g > 0` for a `g × g` grid.
/// - `max_iterations`: L-BFGS iteration cap, `> 0`.
///
/// Errors
/// ------
/// `ValueError` for negative integer arguments and any estimation error.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "estimate_r", signature = (series, gamma, grid_size = 0, max_iterations = 200))]
fn py_estimate_r(
    series: Vec<f64>, gamma: f64, grid_size: i64, max_iterations: i64,
) -> PyResult<PyEstimation> {
    let grid_size = non_negative("grid_size", grid_size)?;
    let max_iterations = non_negative("max_iterations", max_iterations)?;
    let options = EstimatorOptions::new(grid_size, max_iterations)?;
    let series = Array1::from(series);
    let result = state_space::estimate_r(series.view(), gamma, &options)?;
    Ok(result.into())
}

/// Run the batch driver and write both output tables.
///
/// Returns `(n_countries, n_rows)` of the written estimate table.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "parametrized_estimation",
    signature = (method, input_folder, output_folder, variation = "", data_source = "", grid_size = 0)
)]
fn py_parametrized_estimation(
    method: &str, input_folder: PathBuf, output_folder: PathBuf, variation: &str,
    data_source: &str, grid_size: i64,
) -> PyResult<(usize, usize)> {
    let method: Method = method.parse()?;
    let variation: Variation = variation.parse()?;
    let estimator = EstimatorOptions::new(non_negative("grid_size", grid_size)?, 200)?;
    let config = BatchConfig { estimator, ..BatchConfig::default() };
    let request = RunRequest::new(method, variation, data_source, input_folder, output_folder);
    let output =
        batch::parametrized_estimation(&request, &ParameterTable::standard(), &config)?;
    Ok((output.diagnostics.len(), output.estimates.len()))
}

#[cfg(feature = "python-bindings")]
fn non_negative(name: &str, value: i64) -> PyResult<usize> {
    usize::try_from(value)
        .map_err(|_| PyValueError::new_err(format!("{name} must be non-negative, got {value}")))
}

/// Python module initializer for `_kalman_rt`.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _kalman_rt<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyEstimation>()?;
    m.add_function(wrap_pyfunction!(py_estimate_r, m)?)?;
    m.add_function(wrap_pyfunction!(py_parametrized_estimation, m)?)?;
    Ok(())
}
