//! Loan calculator: runs the baseline, live and attribution builds for a request
//!
//! A calculation always rebuilds from the raw request. The baseline and the
//! with-prepayment schedules are independent builds over separate argument
//! lists, never one schedule patched into the other.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attribution::{PrepaymentAttributor, PrepaymentSaving};
use crate::error::Result;
use crate::loan::LoanRequest;
use crate::schedule::{Schedule, ScheduleBuilder, ScheduleConfig, ScheduleSummary};

/// Baseline against with-prepayment outcome for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanComparison {
    /// Schedule with rate changes but no prepayments
    pub baseline: ScheduleSummary,

    /// Schedule with the full prepayment set
    pub with_prepayments: ScheduleSummary,

    pub interest_saved: f64,
    pub months_saved: i64,
}

impl LoanComparison {
    pub fn from_schedules(baseline: &Schedule, with_prepayments: &Schedule) -> Self {
        let baseline = baseline.summary();
        let with_prepayments = with_prepayments.summary();
        Self {
            interest_saved: baseline.total_interest - with_prepayments.total_interest,
            months_saved: i64::from(baseline.months_taken) - i64::from(with_prepayments.months_taken),
            baseline,
            with_prepayments,
        }
    }
}

/// Everything a presentation layer shows for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanReport {
    pub comparison: LoanComparison,
    pub schedule: Schedule,
    pub savings: Vec<PrepaymentSaving>,
}

/// Calculator for loan requests
///
/// # Example
/// ```ignore
/// let calculator = LoanCalculator::new();
/// let request = LoanRequest::from_json_file("loan.json")?;
///
/// let schedule = calculator.schedule(&request)?;
/// let savings = calculator.attribute(&request)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoanCalculator {
    builder: ScheduleBuilder,
    attributor: PrepaymentAttributor,
}

impl LoanCalculator {
    /// Calculator with the default schedule configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScheduleConfig) -> Self {
        Self {
            builder: ScheduleBuilder::new(config.clone()),
            attributor: PrepaymentAttributor::new(config),
        }
    }

    /// Schedule without any prepayments
    pub fn baseline(&self, request: &LoanRequest) -> Result<Schedule> {
        self.builder.build(&request.terms(), &[], &request.rate_changes)
    }

    /// Schedule with the request's prepayments
    pub fn schedule(&self, request: &LoanRequest) -> Result<Schedule> {
        self.builder
            .build(&request.terms(), &request.prepayments, &request.rate_changes)
    }

    /// Per-prepayment savings breakdown
    pub fn attribute(&self, request: &LoanRequest) -> Result<Vec<PrepaymentSaving>> {
        self.attributor
            .attribute(&request.terms(), &request.prepayments, &request.rate_changes)
    }

    pub fn compare(&self, request: &LoanRequest) -> Result<LoanComparison> {
        let baseline = self.baseline(request)?;
        let schedule = self.schedule(request)?;
        Ok(LoanComparison::from_schedules(&baseline, &schedule))
    }

    /// Full report: comparison, live schedule and attribution
    pub fn report(&self, request: &LoanRequest) -> Result<LoanReport> {
        let baseline = self.baseline(request)?;
        let schedule = self.schedule(request)?;
        let savings = self.attribute(request)?;

        Ok(LoanReport {
            comparison: LoanComparison::from_schedules(&baseline, &schedule),
            schedule,
            savings,
        })
    }

    /// Compare many requests in parallel; results follow input order
    pub fn compare_batch(&self, requests: &[LoanRequest]) -> Vec<Result<LoanComparison>> {
        requests.par_iter().map(|request| self.compare(request)).collect()
    }
}
