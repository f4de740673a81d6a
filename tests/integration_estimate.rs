//! Integration tests for single-series R estimation.
//!
//! Purpose
//! -------
//! - Validate `estimate_r` end to end on a synthetic series with a known
//!   reproduction-number path: start values, L-BFGS fit, Kalman smoothing and
//!   the conversion to `R` with standard errors.
//!
//! Coverage
//! --------
//! - `state_space::estimate_r`:
//!   - Output lengths with and without missing observations.
//!   - Invariance of the fit to `gamma` (`(R - 1)·γ` is the smoothed level).
//!   - Multi-start search never worse than the single start.
//!   - Recovery of the generating `R` path with flag 0.
//!   - Recovery of the generating variance ratio on a random walk plus noise.
//!   - The `tracing` convergence warning when the iteration cap is hit.
//!
//! Exclusions
//! ----------
//! - Filter/smoother recursions and start-value heuristics in isolation;
//!   those are covered by unit tests in `state_space::core`.
use kalman_rt::state_space::{EstimatorOptions, estimate_r};
use ndarray::{Array1, array};
use std::{
    io,
    sync::{Arc, Mutex},
};
use tracing_subscriber::fmt::MakeWriter;

const GAMMA: f64 = 0.25;

/// Purpose
/// -------
/// Provide a 25-day growth-rate series generated from a linear `R` path with
/// small deterministic noise.
///
/// Returns
/// -------
/// - `(y, r_true)` where `r_true[t] = 2.0 - 1.2·t/24` and
///   `y[t] ≈ γ·(r_true[t] - 1) + e_t` with `|e_t| ≤ 0.012`, `γ = 1/4`.
fn synthetic_series() -> (Array1<f64>, Array1<f64>) {
    let y = array![
        0.262, 0.2295, 0.23, 0.2015, 0.209, 0.1835, 0.185, 0.1505, 0.153, 0.1305, 0.136,
        0.1035, 0.106, 0.0775, 0.083, 0.0595, 0.062, 0.0315, 0.029, 0.0015, 0.007, -0.0175,
        -0.016, -0.0455, -0.048
    ];
    let r_true = Array1::from_iter((0..25).map(|t| 2.0 - 1.2 * t as f64 / 24.0));
    (y, r_true)
}

/// Purpose
/// -------
/// Provide 25 draws of a random walk plus noise with known variances.
///
/// Returns
/// -------
/// - `y[t] = μ_t + ε_t`, `μ_t = μ_{t-1} + η_t`, `μ_0 = 0.2`, with
///   `σ²_η = 0.0016` and `σ²_ε = 0.0004` (ratio 4). Drawn from a Gaussian
///   generator seeded with 6 and rounded to 4 decimals.
fn random_walk_plus_noise() -> Array1<f64> {
    array![
        0.21, 0.1129, 0.1608, 0.0983, 0.1201, 0.188, 0.2618, 0.194, 0.2178, 0.2618, 0.237,
        0.1796, 0.1694, 0.1864, 0.1493, 0.142, 0.1535, 0.1209, 0.138, 0.2594, 0.1942, 0.1832,
        0.0802, 0.0546, 0.0406
    ]
}

/// In-memory sink for `tracing` output.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("capture lock")).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("capture lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
// Purpose
// -------
// `R` and `se` always match the input length, missing days included.
//
// Given
// -----
// - The synthetic series with two days blanked out.
//
// Expect
// ------
// - Length 25 outputs, finite everywhere, non-negative `se`.
fn outputs_match_input_length_with_missing_days() {
    // Arrange
    let (mut y, _) = synthetic_series();
    y[4] = f64::NAN;
    y[17] = f64::NAN;

    // Act
    let result = estimate_r(y.view(), GAMMA, &EstimatorOptions::default())
        .expect("estimation should succeed");

    // Assert
    assert_eq!(result.r.len(), y.len());
    assert_eq!(result.se.len(), y.len());
    assert!(result.r.iter().all(|v| v.is_finite()));
    assert!(result.se.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
// Purpose
// -------
// The fitted variances do not depend on `gamma`, so `(R - 1)·γ` and `se·γ`
// are identical across two values of `gamma`.
//
// Given
// -----
// - The synthetic series estimated with `γ = 1/4` and `γ = 1/5`.
//
// Expect
// ------
// - Same variances; `(R₁ - 1)/5 = (R₂ - 1)/4`-style scaling element-wise.
fn reproduction_scales_with_inverse_gamma() {
    // Arrange
    let (y, _) = synthetic_series();
    let opts = EstimatorOptions::default();

    // Act
    let a = estimate_r(y.view(), 0.25, &opts).expect("gamma = 1/4 fit");
    let b = estimate_r(y.view(), 0.2, &opts).expect("gamma = 1/5 fit");

    // Assert
    assert_eq!(a.sigma2_irregular, b.sigma2_irregular);
    assert_eq!(a.sigma2_level, b.sigma2_level);
    for t in 0..y.len() {
        approx::assert_relative_eq!(
            (a.r[t] - 1.0) * 0.25,
            (b.r[t] - 1.0) * 0.2,
            epsilon = 1e-12,
            max_relative = 1e-9
        );
        approx::assert_relative_eq!(
            a.se[t] * 0.25,
            b.se[t] * 0.2,
            epsilon = 1e-12,
            max_relative = 1e-9
        );
    }
}

#[test]
// Purpose
// -------
// A multi-start search never ends at a worse objective than the single
// default start.
//
// Given
// -----
// - The synthetic series, single start vs a 3 × 3 grid.
//
// Expect
// ------
// - `grid.objective ≤ single.objective + 1e-6`, nine ranked candidates.
fn grid_search_is_never_worse_than_single_start() {
    // Arrange
    let (y, _) = synthetic_series();
    let grid_opts = EstimatorOptions::new(3, 200).expect("valid options");

    // Act
    let single = estimate_r(y.view(), GAMMA, &EstimatorOptions::default()).expect("single fit");
    let grid = estimate_r(y.view(), GAMMA, &grid_opts).expect("grid fit");

    // Assert
    assert_eq!(grid.grid.len(), 9);
    assert!(
        grid.objective <= single.objective + 1e-6,
        "grid objective {} worse than single {}",
        grid.objective,
        single.objective
    );
}

#[test]
// Purpose
// -------
// End-to-end recovery of a known reproduction-number path.
//
// Given
// -----
// - The synthetic series generated with `γ = 1/4` from a linear `R` path.
//
// Expect
// ------
// - Flag 0, a level-dominated fit (signal-to-noise > 1), and
//   `|R̂(t) - R(t)| < 0.15` for every day.
fn synthetic_series_recovers_generating_path() {
    // Arrange
    let (y, r_true) = synthetic_series();

    // Act
    let result = estimate_r(y.view(), GAMMA, &EstimatorOptions::default())
        .expect("estimation should succeed");

    // Assert
    assert_eq!(result.flag, 0, "status: {}", result.status);
    assert!(result.signal_to_noise > 1.0, "snr = {}", result.signal_to_noise);
    for (t, (est, truth)) in result.r.iter().zip(r_true.iter()).enumerate() {
        assert!((est - truth).abs() < 0.15, "t = {t}: estimated {est}, generating {truth}");
    }
}

#[test]
// Purpose
// -------
// The fitted signal-to-noise ratio recovers the generating variance ratio.
//
// Given
// -----
// - A random walk plus noise with `σ²_η / σ²_ε = 4`; its exact maximum
//   likelihood ratio is about 3.87.
//
// Expect
// ------
// - Flag 0, both variances strictly positive, and `signal_to_noise` within a
//   factor of 2 of 4.
fn random_walk_plus_noise_recovers_variance_ratio() {
    // Arrange
    let y = random_walk_plus_noise();
    let ratio = 0.0016 / 0.0004;

    // Act
    let result = estimate_r(y.view(), GAMMA, &EstimatorOptions::default())
        .expect("estimation should succeed");

    // Assert
    assert_eq!(result.flag, 0, "status: {}", result.status);
    assert!(result.sigma2_irregular > 0.0 && result.sigma2_level > 0.0);
    assert!(
        result.signal_to_noise > ratio / 2.0 && result.signal_to_noise < ratio * 2.0,
        "snr = {}, generating ratio = {ratio}",
        result.signal_to_noise
    );
}

#[test]
// Purpose
// -------
// Hitting the iteration cap emits the convergence warning and flag 1, but
// still returns a full result.
//
// Given
// -----
// - `max_iterations = 1` and a `tracing` subscriber writing to memory.
//
// Expect
// ------
// - `flag == 1`; captured output contains the warning and `flag=1`.
fn iteration_cap_emits_convergence_warning() {
    // Arrange
    let (y, _) = synthetic_series();
    let opts = EstimatorOptions::new(0, 1).expect("valid options");
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    // Act
    let result = tracing::subscriber::with_default(subscriber, || {
        estimate_r(y.view(), GAMMA, &opts).expect("capped fit still returns")
    });
    let logs = capture.contents();

    // Assert
    assert_eq!(result.flag, 1);
    assert_eq!(result.r.len(), y.len());
    assert!(logs.contains("ConvergenceWarning"), "captured: {logs}");
    assert!(logs.contains("flag=1"), "captured: {logs}");
}
