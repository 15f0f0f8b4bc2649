//! Resolution of the annual rate in effect on a payment date

use chrono::NaiveDate;
use log::warn;

use crate::loan::RateChange;

/// Initial rate plus rate changes sorted by effective date
#[derive(Debug, Clone)]
pub struct RateSchedule {
    initial_rate: f64,
    /// Sorted ascending by date; same-date entries keep input order
    changes: Vec<RateChange>,
}

impl RateSchedule {
    pub fn new(initial_rate: f64, changes: &[RateChange]) -> Self {
        let mut changes: Vec<RateChange> = changes
            .iter()
            .map(|c| RateChange::new(c.effective_date, sanitize_rate(c.annual_rate)))
            .collect();
        changes.sort_by_key(|c| c.effective_date);

        Self {
            initial_rate: sanitize_rate(initial_rate),
            changes,
        }
    }

    /// Annual rate (percent) applying to a payment on `date`.
    ///
    /// The latest change dated on or before `date` wins; if several share
    /// that date the one supplied last wins. Without any, the initial rate.
    pub fn rate_on(&self, date: NaiveDate) -> f64 {
        let idx = self.changes.partition_point(|c| c.effective_date <= date);
        if idx == 0 {
            self.initial_rate
        } else {
            self.changes[idx - 1].annual_rate
        }
    }

    pub fn initial_rate(&self) -> f64 {
        self.initial_rate
    }
}

/// Negative or non-finite rates are treated as zero
fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate >= 0.0 {
        rate
    } else {
        warn!("annual rate {} is not usable, treating as 0%", rate);
        0.0
    }
}
