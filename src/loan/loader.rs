//! Load rate changes and prepayments from CSV files
//!
//! Rate change files use the columns `EffectiveDate,AnnualRate`; prepayment
//! files use `Kind,Amount,EffectiveDate,Strategy`. Dates are ISO `YYYY-MM-DD`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::warn;

use super::{Prepayment, PrepaymentKind, PrepaymentStrategy, RateChange};
use crate::error::{LoanError, Result};

/// Date format accepted in input files and on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO date, reporting which field was malformed
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        LoanError::invalid_input(field, format!("'{}' is not a valid YYYY-MM-DD date ({})", value, e))
    })
}

/// Parse an amount, treating blank or non-numeric values as zero
fn parse_amount(field: &str, value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!("{}: '{}' is not a number, using 0", field, value);
            0.0
        }
    }
}

/// Raw CSV row for a rate change
#[derive(Debug, serde::Deserialize)]
struct RateChangeRow {
    #[serde(rename = "EffectiveDate")]
    effective_date: String,
    #[serde(rename = "AnnualRate")]
    annual_rate: String,
}

impl RateChangeRow {
    fn to_rate_change(self) -> Result<RateChange> {
        Ok(RateChange {
            effective_date: parse_date("EffectiveDate", &self.effective_date)?,
            annual_rate: parse_amount("AnnualRate", &self.annual_rate),
        })
    }
}

/// Raw CSV row for a prepayment
#[derive(Debug, serde::Deserialize)]
struct PrepaymentRow {
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Amount", default)]
    amount: String,
    #[serde(rename = "EffectiveDate")]
    effective_date: String,
    #[serde(rename = "Strategy")]
    strategy: String,
}

impl PrepaymentRow {
    fn to_prepayment(self) -> Result<Prepayment> {
        Ok(Prepayment {
            kind: PrepaymentKind::parse(&self.kind)?,
            amount: parse_amount("Amount", &self.amount),
            effective_date: parse_date("EffectiveDate", &self.effective_date)?,
            strategy: PrepaymentStrategy::parse(&self.strategy)?,
        })
    }
}

/// Load rate changes from a CSV file
pub fn load_rate_changes<P: AsRef<Path>>(path: P) -> Result<Vec<RateChange>> {
    let file = File::open(path)?;
    load_rate_changes_from_reader(file)
}

/// Load rate changes from any reader (e.g., string buffer, request body)
pub fn load_rate_changes_from_reader<R: Read>(reader: R) -> Result<Vec<RateChange>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut changes = Vec::new();

    for result in csv_reader.deserialize() {
        let row: RateChangeRow = result?;
        changes.push(row.to_rate_change()?);
    }

    Ok(changes)
}

/// Load prepayments from a CSV file
pub fn load_prepayments<P: AsRef<Path>>(path: P) -> Result<Vec<Prepayment>> {
    let file = File::open(path)?;
    load_prepayments_from_reader(file)
}

/// Load prepayments from any reader
pub fn load_prepayments_from_reader<R: Read>(reader: R) -> Result<Vec<Prepayment>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut prepayments = Vec::new();

    for result in csv_reader.deserialize() {
        let row: PrepaymentRow = result?;
        prepayments.push(row.to_prepayment()?);
    }

    Ok(prepayments)
}
