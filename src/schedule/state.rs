//! Amortization state carried from one month to the next

use chrono::NaiveDate;

use super::calendar;
use crate::error::Result;

/// State of a loan at a point in time during schedule construction
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current schedule month (1-indexed, 0 before the first payment)
    pub month: u32,

    /// Date of the current month's EMI
    pub payment_date: NaiveDate,

    /// Balance outstanding before this month's payment
    pub outstanding: f64,

    /// EMI currently being paid; changes only on re-amortization
    pub current_emi: f64,

    /// First EMI date, used to step payment dates
    start_date: NaiveDate,
}

impl AmortizationState {
    /// Initialize state at loan origination
    pub fn new(principal: f64, base_emi: f64, start_date: NaiveDate) -> Self {
        Self {
            month: 0,
            payment_date: start_date,
            outstanding: principal,
            current_emi: base_emi,
            start_date,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) -> Result<()> {
        self.month += 1;
        self.payment_date = calendar::payment_date(self.start_date, self.month)?;
        Ok(())
    }

    /// Months of the original tenure still ahead, never less than one
    pub fn remaining_tenure(&self, total_months: i32) -> i32 {
        let elapsed = i32::try_from(self.month).unwrap_or(i32::MAX);
        total_months.saturating_sub(elapsed).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_steps_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut state = AmortizationState::new(100_000.0, 8_000.0, start);

        state.advance_month().unwrap();
        assert_eq!(state.month, 1);
        assert_eq!(state.payment_date, start);

        state.advance_month().unwrap();
        assert_eq!(state.payment_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_remaining_tenure_floor() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut state = AmortizationState::new(1.0, 1.0, start);
        state.month = 12;

        assert_eq!(state.remaining_tenure(240), 228);
        assert_eq!(state.remaining_tenure(12), 1);
        assert_eq!(state.remaining_tenure(6), 1);
    }
}
