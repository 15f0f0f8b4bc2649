//! A single calculation request: loan terms plus rate changes and prepayments
//!
//! This is also the shape persisted for session restore. Only raw inputs are
//! saved; schedules are always rebuilt from them.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use super::{LoanTerms, Prepayment, RateChange};
use crate::error::{LoanError, Result};

fn default_total_months() -> i32 {
    240
}

/// Everything needed to build a schedule and its attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(default)]
    pub principal: f64,

    /// Annual rate in percent
    #[serde(default)]
    pub annual_rate: f64,

    #[serde(default = "default_total_months")]
    pub total_months: i32,

    pub start_date: NaiveDate,

    #[serde(default)]
    pub rate_changes: Vec<RateChange>,

    #[serde(default)]
    pub prepayments: Vec<Prepayment>,
}

impl LoanRequest {
    pub fn new(terms: LoanTerms) -> Self {
        Self {
            principal: terms.principal,
            annual_rate: terms.annual_rate,
            total_months: terms.total_months,
            start_date: terms.start_date,
            rate_changes: Vec::new(),
            prepayments: Vec::new(),
        }
    }

    pub fn with_rate_changes(mut self, rate_changes: Vec<RateChange>) -> Self {
        self.rate_changes = rate_changes;
        self
    }

    pub fn with_prepayments(mut self, prepayments: Vec<Prepayment>) -> Self {
        self.prepayments = prepayments;
        self
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.principal, self.annual_rate, self.total_months, self.start_date)
    }

    /// Parse a request from JSON.
    ///
    /// Malformed values (unparseable dates, unknown tags) surface as
    /// `InvalidInput` rather than a generic JSON error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => LoanError::invalid_input("request", e.to_string()),
            _ => LoanError::Json(e),
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Persist raw inputs so a later session can restore them
    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
