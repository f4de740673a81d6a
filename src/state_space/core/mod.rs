//! Core building blocks of the local-level estimator: validated data,
//! parameters, options, start values and the Kalman recursions.
pub mod data;
pub mod kalman;
pub mod options;
pub mod params;
pub mod start_params;
