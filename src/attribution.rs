//! Marginal savings attributed to each prepayment
//!
//! Prepayments are credited in date order: each one is measured against a
//! schedule that already contains every earlier prepayment, not against the
//! bare loan. Reduce-EMI and reduce-tenure prepayments interact, so this
//! differs from measuring each in isolation, and the credits always add up
//! to the total saving of the full set.

use chrono::NaiveDate;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loan::{LoanTerms, Prepayment, RateChange};
use crate::schedule::{ScheduleBuilder, ScheduleConfig};

/// Savings credited to one prepayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentSaving {
    pub prepayment: Prepayment,

    /// Interest saved relative to the schedule built without it
    pub interest_saved: f64,

    /// Months saved relative to the schedule built without it; negative when
    /// a reduce-EMI prepayment stretches a tenure shortened by earlier ones
    pub months_saved: i64,
}

/// Attributes savings to prepayments by incremental schedule rebuilds
#[derive(Debug, Clone, Default)]
pub struct PrepaymentAttributor {
    builder: ScheduleBuilder,
}

impl PrepaymentAttributor {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            builder: ScheduleBuilder::new(config),
        }
    }

    /// Savings per prepayment, in chronological order.
    ///
    /// Builds N + 1 schedules (none, first one, first two, ...). The builds
    /// are independent and run on the rayon pool; results are differenced in
    /// order afterwards.
    pub fn attribute(
        &self,
        terms: &LoanTerms,
        prepayments: &[Prepayment],
        rate_changes: &[RateChange],
    ) -> Result<Vec<PrepaymentSaving>> {
        let mut sorted = prepayments.to_vec();
        // Stable: same-date prepayments keep input order
        sorted.sort_by_key(|p| p.effective_date);

        let totals: Vec<(f64, u32)> = (0..=sorted.len())
            .into_par_iter()
            .map(|count| {
                self.builder
                    .build(terms, &sorted[..count], rate_changes)
                    .map(|schedule| (schedule.total_interest(), schedule.months_taken))
            })
            .collect::<Result<Vec<_>>>()?;

        let savings: Vec<PrepaymentSaving> = sorted
            .into_iter()
            .zip(totals.windows(2))
            .map(|(prepayment, pair)| {
                let (prev_interest, prev_months) = pair[0];
                let (interest, months) = pair[1];
                PrepaymentSaving {
                    prepayment,
                    interest_saved: prev_interest - interest,
                    months_saved: i64::from(prev_months) - i64::from(months),
                }
            })
            .collect();

        debug!(
            "attributed {} prepayments, total interest saved {:.2}",
            savings.len(),
            total_interest_saved(&savings)
        );

        Ok(savings)
    }
}

/// Sum of interest saved across attributed prepayments
pub fn total_interest_saved(savings: &[PrepaymentSaving]) -> f64 {
    savings.iter().map(|s| s.interest_saved).sum()
}

/// Sum of months saved across attributed prepayments
pub fn total_months_saved(savings: &[PrepaymentSaving]) -> i64 {
    savings.iter().map(|s| s.months_saved).sum()
}

/// Attribute savings with the default schedule configuration
pub fn attribute_prepayments(
    principal: f64,
    annual_rate: f64,
    total_months: i32,
    start_date: NaiveDate,
    prepayments: &[Prepayment],
    rate_changes: &[RateChange],
) -> Result<Vec<PrepaymentSaving>> {
    let terms = LoanTerms::new(principal, annual_rate, total_months, start_date);
    PrepaymentAttributor::default().attribute(&terms, prepayments, rate_changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::PrepaymentStrategy;
    use crate::schedule::build_schedule;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn start() -> NaiveDate {
        date(2024, 1, 15)
    }

    /// Given out of date order on purpose
    fn mixed_prepayments() -> Vec<Prepayment> {
        vec![
            Prepayment::recurring(5_000.0, date(2024, 6, 1), PrepaymentStrategy::ReduceTenure),
            Prepayment::one_time(100_000.0, date(2025, 3, 10), PrepaymentStrategy::ReduceEmi),
            Prepayment::one_time(50_000.0, date(2024, 2, 20), PrepaymentStrategy::ReduceTenure),
        ]
    }

    #[test]
    fn test_chronological_order() {
        let savings = attribute_prepayments(1_000_000.0, 8.8, 240, start(), &mixed_prepayments(), &[]).unwrap();

        let dates: Vec<NaiveDate> = savings.iter().map(|s| s.prepayment.effective_date).collect();
        assert_eq!(dates, vec![date(2024, 2, 20), date(2024, 6, 1), date(2025, 3, 10)]);
    }

    #[test]
    fn test_sum_law() {
        let prepayments = mixed_prepayments();
        let rate_changes = vec![RateChange::new(date(2026, 1, 15), 9.25)];

        let savings = attribute_prepayments(1_000_000.0, 8.8, 240, start(), &prepayments, &rate_changes).unwrap();
        let baseline = build_schedule(1_000_000.0, 8.8, 240, start(), &[], &rate_changes).unwrap();
        let full = build_schedule(1_000_000.0, 8.8, 240, start(), &prepayments, &rate_changes).unwrap();

        assert_abs_diff_eq!(
            total_interest_saved(&savings),
            baseline.total_interest() - full.total_interest(),
            epsilon = 1e-6
        );
        assert_eq!(
            total_months_saved(&savings),
            i64::from(baseline.months_taken) - i64::from(full.months_taken)
        );
    }

    #[test]
    fn test_marginal_values() {
        let savings = attribute_prepayments(1_000_000.0, 8.8, 240, start(), &mixed_prepayments(), &[]).unwrap();

        assert_abs_diff_eq!(savings[0].interest_saved, 206_497.34, epsilon = 0.01);
        assert_eq!(savings[0].months_saved, 28);
        assert_abs_diff_eq!(savings[1].interest_saved, 521_058.33, epsilon = 0.01);
        assert_eq!(savings[1].months_saved, 112);

        // Re-amortizing over the original tenure undoes part of the shortening
        assert!(savings[2].interest_saved > 0.0);
        assert_eq!(savings[2].months_saved, -2);
    }

    #[test]
    fn test_single_prepayment_matches_direct_comparison() {
        let prepayment = Prepayment::one_time(200_000.0, date(2024, 12, 15), PrepaymentStrategy::ReduceTenure);
        let savings = attribute_prepayments(1_000_000.0, 8.8, 240, start(), &[prepayment.clone()], &[]).unwrap();

        let baseline = build_schedule(1_000_000.0, 8.8, 240, start(), &[], &[]).unwrap();
        let with = build_schedule(1_000_000.0, 8.8, 240, start(), &[prepayment.clone()], &[]).unwrap();

        assert_eq!(savings.len(), 1);
        assert_eq!(savings[0].prepayment, prepayment);
        assert_eq!(savings[0].interest_saved, baseline.total_interest() - with.total_interest());
        assert_eq!(savings[0].months_saved, 240 - 154);
    }

    #[test]
    fn test_no_prepayments() {
        let savings = attribute_prepayments(500_000.0, 7.0, 120, start(), &[], &[]).unwrap();
        assert!(savings.is_empty());
    }

    #[test]
    fn test_non_convergence_propagates() {
        let prepayments = vec![Prepayment::one_time(1_000.0, date(2024, 5, 1), PrepaymentStrategy::ReduceTenure)];
        let rate_changes = vec![RateChange::new(date(2024, 2, 1), 60.0)];

        let result = attribute_prepayments(100_000.0, 1.0, 120, start(), &prepayments, &rate_changes);
        assert!(result.is_err());
    }
}
