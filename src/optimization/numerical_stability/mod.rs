//! numerical_stability — parameter transforms between optimizer and model space.
//!
//! Purpose
//! -------
//! Keep the mapping between the unconstrained optimizer vector `θ` and the
//! non-negative variances of the local-level model in one place, together
//! with the small tolerance used to floor start values.
//!
//! Key behaviors
//! -------------
//! - [`variance_from_theta`] squares a real coordinate into a variance, so
//!   every point of `ℝ²` is a valid parameter pair.
//! - [`theta_from_variance`] maps a variance back into `θ`-space for start
//!   values; negative inputs are clamped to zero first.
//! - [`floor_variance`] replaces zero, negative and non-finite start
//!   variances by [`VARIANCE_FLOOR`].
//!
//! Conventions
//! -----------
//! - Pure scalar helpers; no logging, no allocation, no I/O.
//! - Model-space variances are always reported after the square transform,
//!   never as raw `θ`.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check the inverse relationship on a
//!   small grid and the flooring rules.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    VARIANCE_FLOOR, floor_variance, theta_from_variance, variance_from_theta,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use kalman_rt::optimization::numerical_stability::prelude::*;
//
// to import the transforms in a single line.

pub mod prelude {
    pub use super::transformations::{
        VARIANCE_FLOOR, floor_variance, theta_from_variance, variance_from_theta,
    };
}
