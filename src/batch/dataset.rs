//! Per-country growth-rate dataset loaded from CSV.
//!
//! Purpose
//! -------
//! Read the batch input table (`Country/Region`, `Date`,
//! `gr_infected_<days>`), shift dates by a reporting delay, and hand the
//! estimator one series per country.
//!
//! Key behaviors
//! -------------
//! - Accepted date formats: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`,
//!   `YYYY-MM-DDTHH:MM:SS` and `MM/DD/YYYY`.
//! - Empty, `nan`, `NaN`, `NA` and `N/A` growth-rate cells are missing values.
//! - Extra columns are ignored; required ones must be present in the header.
//! - Countries are reported in order of first appearance.
//!
//! Conventions
//! -----------
//! - Row numbers in errors are 1-based file lines (the header is line 1).
use crate::batch::errors::{BatchError, BatchResult};
use chrono::{Days, NaiveDate, NaiveDateTime};
use ndarray::Array1;
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::Read,
    path::Path,
};

pub const COUNTRY_COLUMN: &str = "Country/Region";
pub const DATE_COLUMN: &str = "Date";

/// One input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub date: NaiveDate,
    /// `NaN` when missing.
    pub growth_rate: f64,
}

/// Input rows in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub rows: Vec<Observation>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    /// `BatchError::Io` if the file cannot be opened; otherwise see
    /// [`Dataset::from_reader`].
    pub fn from_path(path: &Path, growth_rate_column: &str) -> BatchResult<Self> {
        let file = File::open(path)
            .map_err(|source| BatchError::Io { path: path.display().to_string(), source })?;
        Self::from_reader(file, growth_rate_column)
    }

    /// Load a dataset from any CSV source with a header row.
    ///
    /// # Errors
    /// `MissingColumn`, `InvalidDate`, `InvalidNumber`, or `Csv` for
    /// malformed records.
    pub fn from_reader<R: Read>(reader: R, growth_rate_column: &str) -> BatchResult<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| BatchError::MissingColumn { column: name.to_string() })
        };
        let country_idx = column(COUNTRY_COLUMN)?;
        let date_idx = column(DATE_COLUMN)?;
        let growth_idx = column(growth_rate_column)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let row = i + 2;
            let country = record.get(country_idx).unwrap_or("").trim().to_string();
            let date_str = record.get(date_idx).unwrap_or("");
            let date = parse_date(date_str)
                .ok_or_else(|| BatchError::InvalidDate { row, value: date_str.to_string() })?;
            let growth_str = record.get(growth_idx).unwrap_or("");
            let growth_rate =
                parse_growth_rate(growth_str).ok_or_else(|| BatchError::InvalidNumber {
                    row,
                    column: growth_rate_column.to_string(),
                    value: growth_str.to_string(),
                })?;
            rows.push(Observation { country, date, growth_rate });
        }
        Ok(Dataset { rows })
    }

    /// Move every date `days` days into the past.
    ///
    /// # Errors
    /// `BatchError::DateOutOfRange` if a shifted date leaves chrono's range.
    pub fn shift_dates(&mut self, days: i64) -> BatchResult<()> {
        let delta = Days::new(days.unsigned_abs());
        for (i, obs) in self.rows.iter_mut().enumerate() {
            let shifted = if days >= 0 {
                obs.date.checked_sub_days(delta)
            } else {
                obs.date.checked_add_days(delta)
            };
            obs.date = shifted.ok_or(BatchError::DateOutOfRange { row: i + 2 })?;
        }
        Ok(())
    }

    /// Countries in order of first appearance.
    pub fn countries(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for obs in &self.rows {
            if seen.insert(obs.country.as_str()) {
                order.push(obs.country.clone());
            }
        }
        order
    }

    /// Non-missing growth rates per country, in order of first appearance.
    pub fn observation_counts(&self) -> Vec<(String, usize)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for obs in &self.rows {
            let slot = *index.entry(obs.country.as_str()).or_insert_with(|| {
                counts.push((obs.country.clone(), 0));
                counts.len() - 1
            });
            if !obs.growth_rate.is_nan() {
                counts[slot].1 += 1;
            }
        }
        counts
    }

    /// Row indices and growth rates of one country, in file order.
    pub fn series_for(&self, country: &str) -> (Vec<usize>, Array1<f64>) {
        let (idx, values): (Vec<usize>, Vec<f64>) = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, obs)| obs.country == country)
            .map(|(i, obs)| (i, obs.growth_rate))
            .unzip();
        (idx, Array1::from(values))
    }
}

/// Parse a date in one of the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

/// Parse a growth-rate cell; missing-value markers map to `NaN`.
pub fn parse_growth_rate(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || ["nan", "na", "n/a"].iter().any(|m| s.eq_ignore_ascii_case(m)) {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}
