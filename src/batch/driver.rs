//! Batch driver: per-country estimation over a dataset and persistence of the
//! result tables.
//!
//! Purpose
//! -------
//! Run [`estimate_r`] once per eligible country, gate the fits on their
//! diagnostics, attach confidence intervals, and write the estimate and
//! diagnostics tables.
//!
//! Key behaviors
//! -------------
//! - Countries with fewer than `min_obs` non-missing growth rates are skipped
//!   before estimation.
//! - Countries are estimated in order of first appearance on their own rows in
//!   file order, missing growth rates included.
//! - A failure tied to one country's data (numerical trouble, infinite
//!   growth rates) is logged and recorded as flag 2 with `NaN` variances.
//!   Only invalid run-wide arguments (`gamma`, estimator options) abort with
//!   `BatchError::Estimation`.
//! - Fits with `flag != 0` or an implausible signal-to-noise ratio are dropped
//!   from both tables.
//! - Estimate rows keep the input file's row order, so date-interleaved
//!   inputs stay interleaved. The diagnostics table is sorted by country name.
//!
//! Downstream usage
//! ----------------
//! - [`estimate_dataset`] is the in-memory core, used by tests and bindings.
//! - [`parametrized_estimation`] adds parameter lookup, date shifting and file
//!   I/O, and backs the `estimate-r` binary.
use crate::{
    batch::{
        config::{BatchConfig, RunRequest},
        dataset::Dataset,
        errors::{BatchError, BatchResult},
        intervals::CriticalValues,
        output::{DiagnosticsRow, EstimateRow, write_diagnostics, write_estimates},
        params::ParameterTable,
    },
    state_space::{EstimationResult, StateSpaceError, estimate_r},
};
use ndarray::Array1;
use tracing::{debug, info, warn};

/// Both result tables of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutput {
    pub estimates: Vec<EstimateRow>,
    pub diagnostics: Vec<DiagnosticsRow>,
}

/// Fit of one country, before filtering.
struct CountryFit {
    country: String,
    rows: Vec<usize>,
    r: Array1<f64>,
    se: Array1<f64>,
    diagnostics: DiagnosticsRow,
}

/// Estimate every eligible country of `dataset` with decay rate `gamma`.
///
/// # Errors
/// - `BatchError::InvalidConfig` if `config` is invalid.
/// - `BatchError::Estimation` when a run-wide argument is invalid (a
///   non-positive `gamma`, bad estimator options).
/// - `BatchError::Quantile` if the normal quantiles cannot be built.
pub fn estimate_dataset(
    dataset: &Dataset, gamma: f64, config: &BatchConfig,
) -> BatchResult<BatchOutput> {
    config.validate()?;
    let critical = CriticalValues::new()?;

    let mut fits = Vec::new();
    for (country, n_obs) in dataset.observation_counts() {
        if n_obs < config.min_obs {
            debug!(country = %country, n_obs, min_obs = config.min_obs, "skipping short series");
            continue;
        }
        fits.push(fit_country(dataset, country, gamma, config)?);
    }

    let mut kept = Vec::with_capacity(fits.len());
    for fit in fits {
        let diag = &fit.diagnostics;
        if diag.flag != 0 {
            debug!(country = %fit.country, flag = diag.flag, "dropping unconverged fit");
            continue;
        }
        if config.implausible_signal_to_noise(diag.signal_to_noise) {
            debug!(
                country = %fit.country,
                signal_to_noise = diag.signal_to_noise,
                "dropping fit with implausible signal-to-noise ratio"
            );
            continue;
        }
        kept.push(fit);
    }

    // (fit, position within fit) for every dataset row of a kept country.
    let mut slots: Vec<Option<(usize, usize)>> = vec![None; dataset.rows.len()];
    for (i, fit) in kept.iter().enumerate() {
        for (k, &row) in fit.rows.iter().enumerate() {
            slots[row] = Some((i, k));
        }
    }

    let mut output = BatchOutput::default();
    for (row, slot) in slots.into_iter().enumerate() {
        let Some((i, k)) = slot else { continue };
        let fit = &kept[i];
        let (r, se) = (fit.r[k], fit.se[k]);
        let (ci95, ci50) = critical.intervals(r, se);
        output.estimates.push(EstimateRow {
            country: fit.country.clone(),
            date: dataset.rows[row].date,
            r,
            se_r: se,
            days_infectious: config.days_infectious,
            ci_95_u: ci95.upper,
            ci_95_l: ci95.lower,
            ci_50_u: ci50.upper,
            ci_50_l: ci50.lower,
        });
    }
    output.diagnostics = kept.into_iter().map(|fit| fit.diagnostics).collect();
    output.diagnostics.sort_by(|a, b| a.country.cmp(&b.country));

    info!(
        countries = output.diagnostics.len(),
        rows = output.estimates.len(),
        "batch estimation finished"
    );
    Ok(output)
}

/// Full run: look up parameters, load and shift the dataset, estimate, and
/// write both tables under `request.output_folder`.
///
/// # Errors
/// Any [`BatchError`] from loading, estimation or writing.
pub fn parametrized_estimation(
    request: &RunRequest, table: &ParameterTable, config: &BatchConfig,
) -> BatchResult<BatchOutput> {
    info!("{}", request.describe());
    let gamma = table.gamma_for(request.method, request.variation);
    let delay = table.delay_for(request.method, request.variation);

    let mut dataset = Dataset::from_path(&request.input_path(), &config.growth_rate_column())?;
    dataset.shift_dates(delay)?;
    debug!(gamma, delay, rows = dataset.rows.len(), "dataset loaded");

    let output = estimate_dataset(&dataset, gamma, config)?;

    std::fs::create_dir_all(&request.output_folder).map_err(|source| BatchError::Io {
        path: request.output_folder.display().to_string(),
        source,
    })?;
    write_diagnostics(&request.diagnostics_path(), &output.diagnostics)?;
    write_estimates(&request.estimates_path(), &output.estimates)?;
    Ok(output)
}

// ---- Helper Methods ----

fn fit_country(
    dataset: &Dataset, country: String, gamma: f64, config: &BatchConfig,
) -> BatchResult<CountryFit> {
    let (rows, series) = dataset.series_for(&country);
    match estimate_r(series.view(), gamma, &config.estimator) {
        Ok(result) => Ok(converged_fit(country, rows, result)),
        Err(err) if is_run_fatal(&err) => Err(BatchError::Estimation { country, source: err }),
        Err(err) => Ok(failed_fit(country, rows, &err)),
    }
}

/// Errors caused by run-wide arguments rather than one country's data.
fn is_run_fatal(err: &StateSpaceError) -> bool {
    matches!(
        err,
        StateSpaceError::InvalidGamma { .. }
            | StateSpaceError::InvalidMaxIterations { .. }
            | StateSpaceError::InvalidTolerance { .. }
    )
}

fn converged_fit(country: String, rows: Vec<usize>, result: EstimationResult) -> CountryFit {
    let diagnostics = DiagnosticsRow {
        country: country.clone(),
        flag: result.flag,
        sigma2_irregular: result.sigma2_irregular,
        sigma2_level: result.sigma2_level,
        signal_to_noise: result.signal_to_noise,
    };
    CountryFit { country, rows, r: result.r, se: result.se, diagnostics }
}

fn failed_fit(country: String, rows: Vec<usize>, err: &StateSpaceError) -> CountryFit {
    warn!(country = %country, error = %err, "estimation failed; recording flag 2");
    let n = rows.len();
    let diagnostics = DiagnosticsRow {
        country: country.clone(),
        flag: 2,
        sigma2_irregular: f64::NAN,
        sigma2_level: f64::NAN,
        signal_to_noise: f64::NAN,
    };
    CountryFit {
        country,
        rows,
        r: Array1::from_elem(n, f64::NAN),
        se: Array1::from_elem(n, f64::NAN),
        diagnostics,
    }
}
