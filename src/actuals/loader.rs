//! Load actuals from CSV uploads
//!
//! Expected columns: `period,category,amount`. Extra columns are ignored.

use super::mapping::CategoryMapping;
use super::{ActualRecord, RawActual};
use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 3] = ["period", "category", "amount"];

/// Raw CSV row matching the actuals upload template
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    period: String,
    category: String,
    amount: f64,
}

impl CsvRow {
    fn to_raw(self) -> Result<RawActual> {
        let period = parse_period(&self.period)?;
        Ok(RawActual {
            period,
            category: self.category,
            amount: self.amount,
        })
    }
}

/// Parse an ISO `YYYY-MM-DD` period
pub fn parse_period(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| EngineError::InvalidPeriod {
        value: value.to_string(),
    })
}

/// Load un-normalized actuals from any reader (e.g., upload body, string buffer)
pub fn load_raw_actuals_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<RawActual>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?;
    if !REQUIRED_COLUMNS.iter().all(|col| headers.iter().any(|h| h == *col)) {
        return Err(EngineError::MissingColumns("period, category, amount"));
    }

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row.to_raw()?);
    }

    log::debug!("loaded {} raw actuals rows", rows.len());
    Ok(rows)
}

/// Load un-normalized actuals from a CSV file
pub fn load_raw_actuals<P: AsRef<Path>>(path: P) -> Result<Vec<RawActual>> {
    let file = File::open(path)?;
    load_raw_actuals_from_reader(file)
}

/// Load actuals from a reader and translate every row into the canonical set
pub fn load_actuals_from_reader<R: std::io::Read>(
    reader: R,
    mapping: &CategoryMapping,
) -> Result<Vec<ActualRecord>> {
    let raw = load_raw_actuals_from_reader(reader)?;
    mapping.normalize(&raw)
}

/// Load actuals from a CSV file and translate every row into the canonical set
pub fn load_actuals<P: AsRef<Path>>(path: P, mapping: &CategoryMapping) -> Result<Vec<ActualRecord>> {
    let raw = load_raw_actuals(path)?;
    mapping.normalize(&raw)
}
