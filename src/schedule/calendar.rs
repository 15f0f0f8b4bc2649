//! Payment date stepping

use chrono::{Months, NaiveDate};

use crate::error::{LoanError, Result};

/// Payment date of a 1-based schedule month.
///
/// Month 1 falls on `start_date`; each later month adds calendar months and
/// clamps to the end of shorter months (Jan 31 -> Feb 28/29 -> Mar 31).
pub fn payment_date(start_date: NaiveDate, month: u32) -> Result<NaiveDate> {
    let offset = month.saturating_sub(1);
    start_date
        .checked_add_months(Months::new(offset))
        .ok_or_else(|| {
            LoanError::invalid_input(
                "start_date",
                format!("{} + {} months is outside the supported date range", start_date, offset),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_month_is_start_date() {
        assert_eq!(payment_date(date(2024, 1, 15), 1).unwrap(), date(2024, 1, 15));
    }

    #[test]
    fn test_end_of_month_clamping() {
        let start = date(2024, 1, 31);
        assert_eq!(payment_date(start, 2).unwrap(), date(2024, 2, 29));
        assert_eq!(payment_date(start, 3).unwrap(), date(2024, 3, 31));
        assert_eq!(payment_date(start, 4).unwrap(), date(2024, 4, 30));
        assert_eq!(payment_date(start, 14).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn test_year_rollover() {
        assert_eq!(payment_date(date(2024, 11, 5), 3).unwrap(), date(2025, 1, 5));
        assert_eq!(payment_date(date(2024, 1, 15), 241).unwrap(), date(2044, 1, 15));
    }

    #[test]
    fn test_out_of_range() {
        assert!(payment_date(NaiveDate::MAX, 2).is_err());
    }
}
