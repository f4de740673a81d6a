//! Typed output tables and their CSV encoding.
//!
//! Purpose
//! -------
//! Define the two result tables of a batch run and read/write them with
//! `csv` + `serde`.
//!
//! Key behaviors
//! -------------
//! - [`EstimateRow`]: `Country/Region, Date, R, se_R, days_infectious,
//!   ci_95_u, ci_95_l, ci_50_u, ci_50_l`, dates as `YYYY-MM-DD`.
//! - [`DiagnosticsRow`]: `Country/Region, flag, sigma2_irregular,
//!   sigma2_level, signal_to_noise`.
//! - The header row is always written, even for an empty table.
use crate::batch::errors::{BatchError, BatchResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fs::File, path::Path};

/// One per-country, per-date estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRow {
    #[serde(rename = "Country/Region")]
    pub country: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "se_R")]
    pub se_r: f64,
    pub days_infectious: u32,
    pub ci_95_u: f64,
    pub ci_95_l: f64,
    pub ci_50_u: f64,
    pub ci_50_l: f64,
}

impl EstimateRow {
    pub const HEADER: [&'static str; 9] = [
        "Country/Region",
        "Date",
        "R",
        "se_R",
        "days_infectious",
        "ci_95_u",
        "ci_95_l",
        "ci_50_u",
        "ci_50_l",
    ];
}

/// Optimization diagnostics of one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsRow {
    #[serde(rename = "Country/Region")]
    pub country: String,
    pub flag: i32,
    pub sigma2_irregular: f64,
    pub sigma2_level: f64,
    pub signal_to_noise: f64,
}

impl DiagnosticsRow {
    pub const HEADER: [&'static str; 5] =
        ["Country/Region", "flag", "sigma2_irregular", "sigma2_level", "signal_to_noise"];
}

/// Write `rows` under `header` to `path`, replacing any existing file.
///
/// # Errors
/// `BatchError::Io` if the file cannot be created; `BatchError::Csv` on
/// serialization failures.
pub fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> BatchResult<()> {
    let file = File::create(path)
        .map_err(|source| BatchError::Io { path: path.display().to_string(), source })?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|source| BatchError::Io { path: path.display().to_string(), source })?;
    Ok(())
}

/// Read a table written by [`write_table`]: header names and typed rows.
///
/// # Errors
/// `BatchError::Io` if the file cannot be opened; `BatchError::Csv` on
/// malformed records.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> BatchResult<(Vec<String>, Vec<T>)> {
    let file = File::open(path)
        .map_err(|source| BatchError::Io { path: path.display().to_string(), source })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok((header, rows))
}

pub fn write_estimates(path: &Path, rows: &[EstimateRow]) -> BatchResult<()> {
    write_table(path, &EstimateRow::HEADER, rows)
}

pub fn write_diagnostics(path: &Path, rows: &[DiagnosticsRow]) -> BatchResult<()> {
    write_table(path, &DiagnosticsRow::HEADER, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<EstimateRow> {
        let date = NaiveDate::from_ymd_opt(2020, 4, 1).expect("valid date");
        vec![
            EstimateRow {
                country: "Alpha".to_string(),
                date,
                r: 1.25,
                se_r: 0.1,
                days_infectious: 4,
                ci_95_u: 1.45,
                ci_95_l: 1.05,
                ci_50_u: 1.3,
                ci_50_l: 1.2,
            },
            EstimateRow { country: "Beta".to_string(), r: 0.9, ..sample_one(date) },
        ]
    }

    fn sample_one(date: NaiveDate) -> EstimateRow {
        EstimateRow {
            country: String::new(),
            date,
            r: 1.0,
            se_r: 0.0,
            days_infectious: 4,
            ci_95_u: 1.0,
            ci_95_l: 1.0,
            ci_50_u: 1.0,
            ci_50_l: 1.0,
        }
    }

    #[test]
    // Purpose
    // -------
    // Writing then reading the estimate table keeps column names and rows.
    //
    // Given
    // -----
    // - Two estimate rows written to a temporary file.
    //
    // Expect
    // ------
    // - Header equals `EstimateRow::HEADER`, dates are ISO formatted, rows
    //   are identical.
    fn estimates_table_round_trips() {
        // Arrange
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("estimates.csv");
        let rows = sample_rows();

        // Act
        write_estimates(&path, &rows).expect("write should succeed");
        let (header, back): (Vec<String>, Vec<EstimateRow>) =
            read_table(&path).expect("read should succeed");
        let text = std::fs::read_to_string(&path).expect("file readable");

        // Assert
        assert_eq!(header, EstimateRow::HEADER.to_vec());
        assert_eq!(back, rows);
        assert!(text.contains("Alpha,2020-04-01,1.25,0.1,4,"));
    }

    #[test]
    // Purpose
    // -------
    // An empty table still carries its header.
    //
    // Given
    // -----
    // - No diagnostics rows.
    //
    // Expect
    // ------
    // - The file holds exactly the header line.
    fn empty_table_keeps_header() {
        // Arrange
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("optim.csv");

        // Act
        write_diagnostics(&path, &[]).expect("write should succeed");
        let text = std::fs::read_to_string(&path).expect("file readable");

        // Assert
        assert_eq!(text.trim_end(), "Country/Region,flag,sigma2_irregular,sigma2_level,signal_to_noise");
    }
}
