//! Loan Amortizer - amortization schedules under variable rates and prepayments
//!
//! This library provides:
//! - Month-by-month schedules with rate changes and one-time/recurring prepayments
//! - Reduce-tenure and reduce-EMI prepayment strategies
//! - Per-prepayment attribution of interest and months saved
//! - Baseline comparisons and batch calculations
//! - CSV/JSON loading of loan inputs

pub mod error;
pub mod loan;
pub mod schedule;
pub mod attribution;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use loan::{LoanRequest, LoanTerms, Prepayment, PrepaymentKind, PrepaymentStrategy, RateChange};
pub use schedule::{build_schedule, Schedule, ScheduleBuilder, ScheduleConfig, ScheduleRow};
pub use attribution::{attribute_prepayments, PrepaymentAttributor, PrepaymentSaving};
pub use scenario::{LoanCalculator, LoanComparison, LoanReport};
