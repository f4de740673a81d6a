//! Errors for the local-level state-space estimator (input validation,
//! options checks, filter invariants, and optimizer failures).
//!
//! [`StateSpaceError`] is shared by the Kalman filter, the start-value
//! heuristics, the likelihood and the estimator entry point. It implements
//! `Display`/`Error` and, with the `python-bindings` feature, converts to
//! `PyErr`.
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - `NaN` observations are missing values, never errors; only `±inf` is
//!   rejected as data.
//! - Optimizer/backend errors that are not model-specific are normalized to
//!   [`StateSpaceError::OptimizationFailed`] with a human-readable status.
//! - [`StateSpaceError::is_precondition`] separates argument errors (fatal to
//!   a batch run) from numerical ones (recorded per country).
use crate::optimization::errors::OptError;

/// Result alias for state-space operations that may produce [`StateSpaceError`].
pub type StateSpaceResult<T> = Result<T, StateSpaceError>;

/// Unified error type for local-level estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateSpaceError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// A data point is ±inf.
    InfiniteData { index: usize, value: f64 },

    /// Too few non-missing observations to identify two variances.
    InsufficientObservations { found: usize, required: usize },

    // ---- Options validation ----
    /// Recovery rate must be finite and > 0.
    InvalidGamma { value: f64 },

    /// Iteration cap must be > 0.
    InvalidMaxIterations { value: usize },

    /// Gradient or cost tolerance must be finite and > 0.
    InvalidTolerance { name: &'static str, value: f64 },

    // ---- Model / filter invariants ----
    /// Non-missing observations have zero sample variance.
    DegenerateSeries { variance: f64 },

    /// Unconstrained parameter vector has the wrong length.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained parameter vector contains a non-finite value.
    InvalidThetaInput { index: usize, value: f64 },

    /// Prediction-error variance `f_t` collapsed to a non-positive value.
    NonPositiveInnovationVariance { t: usize, value: f64 },

    /// Hodrick–Prescott start-value solve failed.
    StartValuesFailed { reason: &'static str },

    // ---- Estimation / optimizer ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },
}

impl StateSpaceError {
    /// `true` for errors caused by invalid arguments rather than by the data
    /// or the optimizer.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            StateSpaceError::EmptySeries
                | StateSpaceError::InfiniteData { .. }
                | StateSpaceError::InsufficientObservations { .. }
                | StateSpaceError::InvalidGamma { .. }
                | StateSpaceError::InvalidMaxIterations { .. }
                | StateSpaceError::InvalidTolerance { .. }
        )
    }
}

impl std::error::Error for StateSpaceError {}

impl std::fmt::Display for StateSpaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            StateSpaceError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            StateSpaceError::InfiniteData { index, value } => {
                write!(f, "Data point at index {index} is infinite: {value}")
            }
            StateSpaceError::InsufficientObservations { found, required } => {
                write!(
                    f,
                    "Series has {found} non-missing observations; at least {required} are required."
                )
            }
            // ---- Options validation ----
            StateSpaceError::InvalidGamma { value } => {
                write!(f, "gamma must be finite and > 0; got: {value}")
            }
            StateSpaceError::InvalidMaxIterations { value } => {
                write!(f, "max_iterations must be > 0; got: {value}")
            }
            StateSpaceError::InvalidTolerance { name, value } => {
                write!(f, "{name} must be finite and > 0; got: {value}")
            }
            // ---- Model / filter invariants ----
            StateSpaceError::DegenerateSeries { variance } => {
                write!(f, "Non-missing observations have zero variance ({variance}).")
            }
            StateSpaceError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            StateSpaceError::InvalidThetaInput { index, value } => {
                write!(f, "Theta at index {index} is non-finite: {value}")
            }
            StateSpaceError::NonPositiveInnovationVariance { t, value } => {
                write!(f, "Prediction-error variance at t = {t} is {value}, must be > 0")
            }
            StateSpaceError::StartValuesFailed { reason } => {
                write!(f, "Could not compute default start values: {reason}")
            }
            // ---- Estimation / optimizer ----
            StateSpaceError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
        }
    }
}

impl From<OptError> for StateSpaceError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                StateSpaceError::ThetaLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                StateSpaceError::InvalidThetaInput { index, value }
            }
            OptError::NonPositiveInnovationVariance { t, value } => {
                StateSpaceError::NonPositiveInnovationVariance { t, value }
            }
            other => StateSpaceError::OptimizationFailed { status: other.to_string() },
        }
    }
}

/// Convert a [`StateSpaceError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<StateSpaceError> for pyo3::PyErr {
    fn from(err: StateSpaceError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Argument errors are classified as preconditions; data and optimizer
    // failures are not.
    //
    // Given
    // -----
    // - One error from each family.
    //
    // Expect
    // ------
    // - `is_precondition` is true only for the argument errors.
    fn precondition_classification_separates_argument_errors() {
        assert!(StateSpaceError::EmptySeries.is_precondition());
        assert!(StateSpaceError::InvalidGamma { value: 0.0 }.is_precondition());
        assert!(StateSpaceError::InvalidMaxIterations { value: 0 }.is_precondition());
        assert!(!StateSpaceError::DegenerateSeries { variance: 0.0 }.is_precondition());
        assert!(
            StateSpaceError::InsufficientObservations { found: 1, required: 2 }.is_precondition()
        );
        assert!(
            !StateSpaceError::OptimizationFailed { status: "line search".into() }.is_precondition()
        );
    }

    #[test]
    // Purpose
    // -------
    // Structured optimizer variants survive the `OptError` round trip; other
    // optimizer errors collapse into `OptimizationFailed`.
    //
    // Given
    // -----
    // - `OptError::NonPositiveInnovationVariance` and `OptError::NonFiniteCost`.
    //
    // Expect
    // ------
    // - The first maps back to the structured variant, the second carries the
    //   `OptError` message as its status.
    fn opt_error_conversion_keeps_structured_variants() {
        // Act
        let structured = StateSpaceError::from(OptError::NonPositiveInnovationVariance {
            t: 4,
            value: -1.0,
        });
        let generic = StateSpaceError::from(OptError::NonFiniteCost { value: f64::NAN });

        // Assert
        assert_eq!(structured, StateSpaceError::NonPositiveInnovationVariance { t: 4, value: -1.0 });
        match generic {
            StateSpaceError::OptimizationFailed { status } => {
                assert!(status.contains("Non-finite cost"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
