//! Batch configuration and run requests.
//!
//! Purpose
//! -------
//! Hold the thresholds of a batch run ([`BatchConfig`]) and the identity of
//! one run ([`RunRequest`]: method, variation, data source, folders), and
//! derive the input and output file paths from the latter.
//!
//! Key behaviors
//! -------------
//! - [`BatchConfig::default`] uses `min_obs = 20`, signal-to-noise bounds
//!   `(1e-3, 1e15)`, a 4-day infectious period for the growth-rate column,
//!   and default estimator options.
//! - [`BatchConfig::new`] rejects thresholds that would make every fit
//!   invalid or let the estimator see fewer than two observations.
//! - File names follow `dataset{ds}.csv` (`dataset{ds}_preprocessed.csv` for
//!   `_window`), `optim_res{method}{variation}{ds}.csv` and
//!   `estimated_R{method}{variation}_data_from{ds}.csv`.
use crate::{
    batch::{
        errors::{BatchError, BatchResult},
        params::{Method, Variation},
    },
    state_space::{core::data::MIN_OBSERVED, core::options::EstimatorOptions},
};
use std::path::{Path, PathBuf};

/// Default minimum number of non-missing observations per country.
pub const DEFAULT_MIN_OBS: usize = 20;

/// Default lower signal-to-noise bound (exclusive).
pub const DEFAULT_MIN_SIGNAL_TO_NOISE: f64 = 1e-3;

/// Default upper signal-to-noise bound (exclusive).
pub const DEFAULT_MAX_SIGNAL_TO_NOISE: f64 = 1e15;

/// Default infectious period behind the growth-rate column.
pub const DEFAULT_DAYS_INFECTIOUS: u32 = 4;

/// Thresholds and estimator options of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Countries with fewer non-missing growth rates are skipped.
    pub min_obs: usize,
    /// Fits with `signal_to_noise <= min_signal_to_noise` are dropped.
    pub min_signal_to_noise: f64,
    /// Fits with `signal_to_noise >= max_signal_to_noise` are dropped.
    pub max_signal_to_noise: f64,
    /// Selects the `gr_infected_<days>` column and fills `days_infectious`.
    pub days_infectious: u32,
    pub estimator: EstimatorOptions,
}

impl BatchConfig {
    /// # Errors
    /// `BatchError::InvalidConfig` when `min_obs < 2`, the SNR bounds are not
    /// finite and increasing, or `days_infectious == 0`.
    pub fn new(
        min_obs: usize, min_signal_to_noise: f64, max_signal_to_noise: f64, days_infectious: u32,
        estimator: EstimatorOptions,
    ) -> BatchResult<Self> {
        let config = BatchConfig {
            min_obs,
            min_signal_to_noise,
            max_signal_to_noise,
            days_infectious,
            estimator,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BatchResult<()> {
        if self.min_obs < MIN_OBSERVED {
            return Err(BatchError::InvalidConfig {
                field: "min_obs",
                reason: "must be at least 2",
            });
        }
        if !self.min_signal_to_noise.is_finite()
            || !self.max_signal_to_noise.is_finite()
            || self.min_signal_to_noise >= self.max_signal_to_noise
        {
            return Err(BatchError::InvalidConfig {
                field: "signal_to_noise bounds",
                reason: "must be finite with min < max",
            });
        }
        if self.days_infectious == 0 {
            return Err(BatchError::InvalidConfig {
                field: "days_infectious",
                reason: "must be > 0",
            });
        }
        Ok(())
    }

    /// Name of the growth-rate column, e.g. `gr_infected_4`.
    pub fn growth_rate_column(&self) -> String {
        format!("gr_infected_{}", self.days_infectious)
    }

    /// `true` when a fit's signal-to-noise ratio is implausible.
    ///
    /// `NaN` compares false on both sides and is therefore kept.
    pub fn implausible_signal_to_noise(&self, snr: f64) -> bool {
        snr <= self.min_signal_to_noise || snr >= self.max_signal_to_noise
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            min_obs: DEFAULT_MIN_OBS,
            min_signal_to_noise: DEFAULT_MIN_SIGNAL_TO_NOISE,
            max_signal_to_noise: DEFAULT_MAX_SIGNAL_TO_NOISE,
            days_infectious: DEFAULT_DAYS_INFECTIOUS,
            estimator: EstimatorOptions::default(),
        }
    }
}

/// Identity of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub method: Method,
    pub variation: Variation,
    /// Data-source suffix, e.g. `""` or `"_RKI"`.
    pub data_source: String,
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
}

impl RunRequest {
    pub fn new(
        method: Method, variation: Variation, data_source: impl Into<String>,
        input_folder: impl AsRef<Path>, output_folder: impl AsRef<Path>,
    ) -> Self {
        RunRequest {
            method,
            variation,
            data_source: data_source.into(),
            input_folder: input_folder.as_ref().to_path_buf(),
            output_folder: output_folder.as_ref().to_path_buf(),
        }
    }

    /// Input CSV for this run.
    pub fn input_path(&self) -> PathBuf {
        let name = match self.variation {
            Variation::Window => format!("dataset{}_preprocessed.csv", self.data_source),
            _ => format!("dataset{}.csv", self.data_source),
        };
        self.input_folder.join(name)
    }

    /// Diagnostics CSV for this run.
    pub fn diagnostics_path(&self) -> PathBuf {
        self.output_folder.join(format!(
            "optim_res{}{}{}.csv",
            self.method, self.variation, self.data_source
        ))
    }

    /// Estimates CSV for this run.
    pub fn estimates_path(&self) -> PathBuf {
        self.output_folder.join(format!(
            "estimated_R{}{}_data_from{}.csv",
            self.method, self.variation, self.data_source
        ))
    }

    /// One-line description used as the run banner.
    pub fn describe(&self) -> String {
        let source = match self.data_source.strip_prefix('_') {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if self.data_source.is_empty() => "original method".to_string(),
            _ => self.data_source.clone(),
        };
        format!(
            "globalrt estimation with {} from {} and data used by {}",
            self.variation.label(),
            &self.method.tag()[1..],
            source
        )
    }
}
