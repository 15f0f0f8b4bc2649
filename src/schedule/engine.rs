//! Core schedule builder: month-by-month amortization with rate changes and prepayments

use chrono::NaiveDate;
use log::{debug, warn};

use super::emi::{calculate_emi, monthly_rate};
use super::rates::RateSchedule;
use super::rows::{Schedule, ScheduleRow};
use super::state::AmortizationState;
use crate::error::{LoanError, Result};
use crate::loan::{LoanTerms, Prepayment, PrepaymentStrategy, RateChange};

/// Balance (currency units) at or below which a loan counts as repaid
pub const BALANCE_EPSILON: f64 = 0.005;

/// Months allowed beyond the original tenure before giving up
pub const EXTRA_ITERATIONS: u32 = 600;

/// Absolute cap on schedule length
pub const MAX_ITERATIONS: u32 = 5000;

/// EMI at or below this is treated as zero and forces re-amortization
const ZERO_EMI: f64 = 1e-9;

/// Configuration for schedule construction
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Balance treated as fully repaid
    pub balance_epsilon: f64,

    /// Months allowed past the original tenure (rate rises can stretch a loan)
    pub extra_iterations: u32,

    /// Hard ceiling on the number of rows
    pub max_iterations: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            balance_epsilon: BALANCE_EPSILON,
            extra_iterations: EXTRA_ITERATIONS,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl ScheduleConfig {
    /// Maximum number of months simulated for a given tenure
    pub fn iteration_ceiling(&self, total_months: i32) -> u32 {
        let tenure = u32::try_from(total_months.max(0)).unwrap_or(0);
        tenure.saturating_add(self.extra_iterations).min(self.max_iterations)
    }
}

/// Builds amortization schedules
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    config: ScheduleConfig,
}

impl ScheduleBuilder {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Build the schedule for a loan.
    ///
    /// Every call starts from the terms; nothing is reused between builds.
    pub fn build(
        &self,
        terms: &LoanTerms,
        prepayments: &[Prepayment],
        rate_changes: &[RateChange],
    ) -> Result<Schedule> {
        let principal = non_negative(terms.principal, "principal");
        let rates = RateSchedule::new(terms.annual_rate, rate_changes);
        let prepayments = usable_prepayments(prepayments);

        // Zero principal owes nothing, not even a nominal EMI
        if principal <= 0.0 {
            return Ok(Schedule::new(0.0));
        }

        let base_emi = calculate_emi(principal, monthly_rate(rates.initial_rate()), terms.total_months);
        let mut schedule = Schedule::new(base_emi);

        if terms.total_months <= 0 {
            debug!(
                "tenure of {} months yields an empty schedule (EMI {:.2})",
                terms.total_months, base_emi
            );
            return Ok(schedule);
        }

        let ceiling = self.config.iteration_ceiling(terms.total_months);
        let mut state = AmortizationState::new(principal, base_emi, terms.start_date);

        while state.outstanding > self.config.balance_epsilon && state.month < ceiling {
            state.advance_month()?;
            let row = self.calculate_month(terms, &rates, &prepayments, &mut state);
            schedule.add_row(row);
        }

        if state.outstanding > self.config.balance_epsilon {
            warn!(
                "schedule stopped at {} months with {:.2} outstanding",
                state.month, state.outstanding
            );
            return Err(LoanError::ScheduleDidNotConverge {
                iterations: state.month,
                outstanding: state.outstanding,
            });
        }

        debug!(
            "schedule built: {} months, base EMI {:.2}, interest {:.2}",
            schedule.months_taken,
            schedule.base_emi,
            schedule.total_interest()
        );

        Ok(schedule)
    }

    /// Calculate one month and update state for the next
    fn calculate_month(
        &self,
        terms: &LoanTerms,
        rates: &RateSchedule,
        prepayments: &[Prepayment],
        state: &mut AmortizationState,
    ) -> ScheduleRow {
        let annual_rate = rates.rate_on(state.payment_date);
        let rate = monthly_rate(annual_rate);
        let opening = state.outstanding;

        // A stale EMI after a rate drop can exceed what is owed
        let interest = opening * rate;
        let principal = (state.current_emi - interest).max(0.0).min(opening);

        let (prepaid, reduce_emi) = apply_prepayments(prepayments, state.payment_date, opening - principal);
        let closing = (opening - principal - prepaid).max(0.0);

        let row = ScheduleRow {
            month: state.month,
            payment_date: state.payment_date,
            annual_rate: rate * 1200.0,
            opening_balance: opening,
            emi_paid: principal + interest,
            interest,
            principal,
            prepayment: prepaid,
            closing_balance: closing,
        };

        state.outstanding = closing;

        // Re-amortize over what is left of the original tenure
        let emi_exhausted = state.current_emi <= ZERO_EMI;
        if state.outstanding > self.config.balance_epsilon && (reduce_emi || emi_exhausted) {
            let remaining = state.remaining_tenure(terms.total_months);
            let new_emi = calculate_emi(state.outstanding, rate, remaining);
            debug!(
                "month {}: EMI {:.2} -> {:.2} over {} months",
                state.month, state.current_emi, new_emi, remaining
            );
            state.current_emi = new_emi;
        }

        row
    }
}

/// Apply this month's prepayments against the balance left after the EMI.
///
/// Prepayments are taken in the order given, each capped at what is still
/// owed. Returns the total applied and whether any applied prepayment asked
/// for a lower EMI.
fn apply_prepayments(prepayments: &[Prepayment], payment_date: NaiveDate, balance: f64) -> (f64, bool) {
    let mut remaining = balance.max(0.0);
    let mut applied_total = 0.0;
    let mut reduce_emi = false;

    for prepayment in prepayments.iter().filter(|p| p.applies_on(payment_date)) {
        let applied = prepayment.amount.min(remaining);
        if applied <= 0.0 {
            continue;
        }
        remaining -= applied;
        applied_total += applied;
        reduce_emi |= prepayment.strategy == PrepaymentStrategy::ReduceEmi;
    }

    (applied_total, reduce_emi)
}

/// Copy the prepayments with unusable amounts set to zero
fn usable_prepayments(prepayments: &[Prepayment]) -> Vec<Prepayment> {
    prepayments
        .iter()
        .map(|p| Prepayment {
            amount: non_negative(p.amount, "prepayment amount"),
            ..p.clone()
        })
        .collect()
}

/// Coerce NaN, infinite and negative amounts to zero
fn non_negative(value: f64, what: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("{} {} is not usable, treating as 0", what, value);
        0.0
    }
}

/// Build an amortization schedule with the default configuration
pub fn build_schedule(
    principal: f64,
    annual_rate: f64,
    total_months: i32,
    start_date: NaiveDate,
    prepayments: &[Prepayment],
    rate_changes: &[RateChange],
) -> Result<Schedule> {
    let terms = LoanTerms::new(principal, annual_rate, total_months, start_date);
    ScheduleBuilder::default().build(&terms, prepayments, rate_changes)
}
