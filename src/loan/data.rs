//! Loan terms, rate changes and prepayment rules

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};

/// How often a prepayment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepaymentKind {
    /// Paid once, in the calendar month of the effective date
    OneTime,
    /// Paid every month from the effective date onwards
    Recurring,
}

impl PrepaymentKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "one-time" => Ok(PrepaymentKind::OneTime),
            "recurring" => Ok(PrepaymentKind::Recurring),
            other => Err(LoanError::invalid_input(
                "kind",
                format!("unknown prepayment kind '{}'", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrepaymentKind::OneTime => "one-time",
            PrepaymentKind::Recurring => "recurring",
        }
    }
}

/// What the borrower gets back from a prepayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepaymentStrategy {
    /// Keep the EMI, finish earlier
    ReduceTenure,
    /// Keep the original end date, lower the EMI
    ReduceEmi,
}

impl PrepaymentStrategy {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "reduce-tenure" => Ok(PrepaymentStrategy::ReduceTenure),
            "reduce-emi" => Ok(PrepaymentStrategy::ReduceEmi),
            other => Err(LoanError::invalid_input(
                "strategy",
                format!("unknown prepayment strategy '{}'", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrepaymentStrategy::ReduceTenure => "reduce-tenure",
            PrepaymentStrategy::ReduceEmi => "reduce-emi",
        }
    }
}

/// Terms fixed at loan origination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Initial annual interest rate in percent (8.5 = 8.5% p.a.)
    pub annual_rate: f64,

    /// Original tenure in months; zero or negative yields a degenerate schedule
    pub total_months: i32,

    /// Date of the first EMI
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, total_months: i32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            total_months,
            start_date,
        }
    }
}

/// A change of the annual rate from a given date onwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChange {
    /// First date on which the new rate applies
    pub effective_date: NaiveDate,

    /// New annual rate in percent
    pub annual_rate: f64,
}

impl RateChange {
    pub fn new(effective_date: NaiveDate, annual_rate: f64) -> Self {
        Self {
            effective_date,
            annual_rate,
        }
    }
}

/// A prepayment rule supplied by the borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prepayment {
    pub kind: PrepaymentKind,

    /// Requested amount; missing amounts deserialize as zero
    #[serde(default)]
    pub amount: f64,

    pub effective_date: NaiveDate,

    pub strategy: PrepaymentStrategy,
}

impl Prepayment {
    pub fn new(
        kind: PrepaymentKind,
        amount: f64,
        effective_date: NaiveDate,
        strategy: PrepaymentStrategy,
    ) -> Self {
        Self {
            kind,
            amount,
            effective_date,
            strategy,
        }
    }

    /// One-time prepayment in the month of `effective_date`
    pub fn one_time(amount: f64, effective_date: NaiveDate, strategy: PrepaymentStrategy) -> Self {
        Self::new(PrepaymentKind::OneTime, amount, effective_date, strategy)
    }

    /// Monthly prepayment starting from `effective_date`
    pub fn recurring(amount: f64, effective_date: NaiveDate, strategy: PrepaymentStrategy) -> Self {
        Self::new(PrepaymentKind::Recurring, amount, effective_date, strategy)
    }

    /// Whether this prepayment is due alongside the EMI paid on `payment_date`
    ///
    /// One-time prepayments match on calendar month and year only; recurring
    /// ones apply to every payment on or after the effective date.
    pub fn applies_on(&self, payment_date: NaiveDate) -> bool {
        match self.kind {
            PrepaymentKind::OneTime => {
                self.effective_date.year() == payment_date.year()
                    && self.effective_date.month() == payment_date.month()
            }
            PrepaymentKind::Recurring => self.effective_date <= payment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(PrepaymentKind::parse("one-time").unwrap(), PrepaymentKind::OneTime);
        assert_eq!(PrepaymentKind::parse(" recurring ").unwrap(), PrepaymentKind::Recurring);
        assert_eq!(
            PrepaymentStrategy::parse("reduce-emi").unwrap(),
            PrepaymentStrategy::ReduceEmi
        );
        assert!(PrepaymentKind::parse("weekly").is_err());
        assert!(PrepaymentStrategy::parse("reduce-rate").is_err());
    }

    #[test]
    fn test_serde_tags() {
        let p = Prepayment::one_time(1000.0, date(2024, 5, 1), PrepaymentStrategy::ReduceTenure);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"one-time\""));
        assert!(json.contains("\"reduce-tenure\""));
        assert!(json.contains("\"2024-05-01\""));

        let back: Prepayment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let json = r#"{"kind":"recurring","effective_date":"2024-01-01","strategy":"reduce-emi"}"#;
        let p: Prepayment = serde_json::from_str(json).unwrap();
        assert_eq!(p.amount, 0.0);
    }

    #[test]
    fn test_one_time_matches_calendar_month() {
        let p = Prepayment::one_time(5000.0, date(2024, 12, 28), PrepaymentStrategy::ReduceTenure);

        // Same month, earlier day still counts
        assert!(p.applies_on(date(2024, 12, 15)));
        assert!(p.applies_on(date(2024, 12, 31)));
        assert!(!p.applies_on(date(2025, 1, 15)));
        assert!(!p.applies_on(date(2023, 12, 15)));
    }

    #[test]
    fn test_recurring_applies_from_effective_date() {
        let p = Prepayment::recurring(500.0, date(2024, 3, 10), PrepaymentStrategy::ReduceTenure);

        assert!(!p.applies_on(date(2024, 3, 5)));
        assert!(p.applies_on(date(2024, 3, 10)));
        assert!(p.applies_on(date(2030, 1, 5)));
    }
}
