//! Schedule output structures

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single month of the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Schedule month (1-indexed)
    pub month: u32,
    pub payment_date: NaiveDate,

    /// Rate in effect, as an annual percent
    pub annual_rate: f64,

    pub opening_balance: f64,

    /// Instalment actually paid (principal + interest)
    pub emi_paid: f64,
    pub interest: f64,
    pub principal: f64,

    /// Total prepayment applied this month, after capping
    pub prepayment: f64,
    pub closing_balance: f64,
}

/// Complete amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Monthly rows in chronological order
    pub rows: Vec<ScheduleRow>,

    /// Months needed to reach a zero balance
    pub months_taken: u32,

    /// EMI computed at origination, before any re-amortization
    pub base_emi: f64,
}

impl Schedule {
    pub fn new(base_emi: f64) -> Self {
        Self {
            rows: Vec::new(),
            months_taken: 0,
            base_emi,
        }
    }

    /// Append a row
    pub fn add_row(&mut self, row: ScheduleRow) {
        self.rows.push(row);
        self.months_taken = self.rows.len() as u32;
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total interest, summed in chronological order
    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_principal(&self) -> f64 {
        self.rows.iter().map(|r| r.principal).sum()
    }

    pub fn total_prepaid(&self) -> f64 {
        self.rows.iter().map(|r| r.prepayment).sum()
    }

    /// Everything the borrower pays: instalments plus prepayments
    pub fn total_paid(&self) -> f64 {
        self.rows.iter().map(|r| r.emi_paid + r.prepayment).sum()
    }

    /// Date of the last payment, if any
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.payment_date)
    }

    pub fn final_balance(&self) -> f64 {
        self.rows.last().map(|r| r.closing_balance).unwrap_or(0.0)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            months_taken: self.months_taken,
            base_emi: self.base_emi,
            total_interest: self.total_interest(),
            total_principal: self.total_principal(),
            total_prepaid: self.total_prepaid(),
            total_paid: self.total_paid(),
            payoff_date: self.payoff_date(),
        }
    }

    /// Aggregate rows by calendar year of the payment date
    pub fn yearly_breakdown(&self) -> Vec<YearlyBreakdown> {
        let mut years: Vec<YearlyBreakdown> = Vec::new();

        for row in &self.rows {
            let year = row.payment_date.year();
            match years.last_mut() {
                Some(current) if current.year == year => current.add(row),
                _ => {
                    let mut entry = YearlyBreakdown::new(year);
                    entry.add(row);
                    years.push(entry);
                }
            }
        }

        years
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months_taken: u32,
    pub base_emi: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_prepaid: f64,
    pub total_paid: f64,
    pub payoff_date: Option<NaiveDate>,
}

/// Totals for one calendar year of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBreakdown {
    pub year: i32,
    pub months: u32,
    pub interest: f64,
    pub principal: f64,
    pub prepayment: f64,
    /// Balance after the year's last payment
    pub closing_balance: f64,
}

impl YearlyBreakdown {
    fn new(year: i32) -> Self {
        Self {
            year,
            months: 0,
            interest: 0.0,
            principal: 0.0,
            prepayment: 0.0,
            closing_balance: 0.0,
        }
    }

    fn add(&mut self, row: &ScheduleRow) {
        self.months += 1;
        self.interest += row.interest;
        self.principal += row.principal;
        self.prepayment += row.prepayment;
        self.closing_balance = row.closing_balance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: u32, date: NaiveDate, interest: f64, principal: f64, prepayment: f64, closing: f64) -> ScheduleRow {
        ScheduleRow {
            month,
            payment_date: date,
            annual_rate: 12.0,
            opening_balance: closing + principal + prepayment,
            emi_paid: interest + principal,
            interest,
            principal,
            prepayment,
            closing_balance: closing,
        }
    }

    fn sample() -> Schedule {
        let d = |y, m| NaiveDate::from_ymd_opt(y, m, 10).unwrap();
        let mut schedule = Schedule::new(1_000.0);
        schedule.add_row(row(1, d(2024, 11), 30.0, 970.0, 0.0, 2_030.0));
        schedule.add_row(row(2, d(2024, 12), 20.3, 979.7, 500.0, 550.3));
        schedule.add_row(row(3, d(2025, 1), 5.5, 550.3, 0.0, 0.0));
        schedule
    }

    #[test]
    fn test_totals() {
        let schedule = sample();
        assert_eq!(schedule.months_taken, 3);
        assert!((schedule.total_interest() - 55.8).abs() < 1e-9);
        assert!((schedule.total_prepaid() - 500.0).abs() < 1e-9);
        assert!((schedule.total_paid() - (1_000.0 + 1_000.0 + 555.8 + 500.0)).abs() < 1e-9);
        assert_eq!(schedule.payoff_date(), NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(schedule.final_balance(), 0.0);
    }

    #[test]
    fn test_yearly_breakdown() {
        let years = sample().yearly_breakdown();

        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2024);
        assert_eq!(years[0].months, 2);
        assert!((years[0].interest - 50.3).abs() < 1e-9);
        assert!((years[0].closing_balance - 550.3).abs() < 1e-9);
        assert_eq!(years[1].year, 2025);
        assert_eq!(years[1].closing_balance, 0.0);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::new(0.0);
        let summary = schedule.summary();

        assert!(schedule.is_empty());
        assert_eq!(summary.months_taken, 0);
        assert_eq!(summary.payoff_date, None);
        assert!(schedule.yearly_breakdown().is_empty());
    }
}
