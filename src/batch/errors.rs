//! Errors for the batch driver (I/O, CSV schema, parameter lookup, and
//! structural estimation failures).
//!
//! [`BatchError`] aborts a whole run. Per-country numerical failures never
//! reach this type: the driver records them as flag 2 and carries on.
use crate::state_space::errors::StateSpaceError;
use statrs::distribution::NormalError;

/// Result alias for batch operations that may produce [`BatchError`].
pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Debug)]
pub enum BatchError {
    // ---- I/O ----
    /// Filesystem error with the offending path.
    Io { path: String, source: std::io::Error },

    /// CSV reader/writer error.
    Csv(csv::Error),

    // ---- Input schema ----
    /// A required column is absent from the header row.
    MissingColumn { column: String },

    /// A `Date` cell matched none of the accepted formats.
    InvalidDate { row: usize, value: String },

    /// A growth-rate cell is neither a number nor a missing-value marker.
    InvalidNumber { row: usize, column: String, value: String },

    // ---- Parameters / configuration ----
    /// Method key not in the parameter table.
    UnknownMethod { name: String },

    /// Variation key not one of `""`, `_delays`, `_GTD`, `_window`.
    UnknownVariation { name: String },

    /// Invalid batch configuration.
    InvalidConfig { field: &'static str, reason: &'static str },

    /// Shifting a date by the reporting delay left the calendar range.
    DateOutOfRange { row: usize },

    // ---- Estimation ----
    /// Structural estimator error (argument-level), fatal for the run.
    Estimation { country: String, source: StateSpaceError },

    /// Normal quantile could not be built.
    Quantile(NormalError),
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io { source, .. } => Some(source),
            BatchError::Csv(err) => Some(err),
            BatchError::Estimation { source, .. } => Some(source),
            BatchError::Quantile(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- I/O ----
            BatchError::Io { path, source } => {
                write!(f, "I/O error on '{path}': {source}")
            }
            BatchError::Csv(err) => {
                write!(f, "CSV error: {err}")
            }
            // ---- Input schema ----
            BatchError::MissingColumn { column } => {
                write!(f, "Required column '{column}' is missing from the input header.")
            }
            BatchError::InvalidDate { row, value } => {
                write!(f, "Row {row}: could not parse date '{value}'.")
            }
            BatchError::InvalidNumber { row, column, value } => {
                write!(f, "Row {row}: column '{column}' has non-numeric value '{value}'.")
            }
            // ---- Parameters / configuration ----
            BatchError::UnknownMethod { name } => {
                write!(f, "Unknown method '{name}'.")
            }
            BatchError::UnknownVariation { name } => {
                write!(
                    f,
                    "Unknown variation '{name}'; expected '', '_delays', '_GTD' or '_window'."
                )
            }
            BatchError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration for {field}: {reason}")
            }
            BatchError::DateOutOfRange { row } => {
                write!(f, "Row {row}: shifted date is out of range.")
            }
            // ---- Estimation ----
            BatchError::Estimation { country, source } => {
                write!(f, "Estimation for '{country}' failed: {source}")
            }
            BatchError::Quantile(err) => {
                write!(f, "Normal quantile error: {err}")
            }
        }
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::Csv(err)
    }
}

impl From<NormalError> for BatchError {
    fn from(err: NormalError) -> Self {
        BatchError::Quantile(err)
    }
}

/// Convert a [`BatchError`] into a Python `ValueError` (`OSError` for I/O).
#[cfg(feature = "python-bindings")]
impl std::convert::From<BatchError> for pyo3::PyErr {
    fn from(err: BatchError) -> pyo3::PyErr {
        match err {
            BatchError::Io { .. } => pyo3::exceptions::PyOSError::new_err(err.to_string()),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        }
    }
}
