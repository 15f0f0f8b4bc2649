//! Loan input data structures and loading

mod data;
mod request;
pub mod loader;

pub use data::{LoanTerms, Prepayment, PrepaymentKind, PrepaymentStrategy, RateChange};
pub use request::LoanRequest;
pub use loader::{load_prepayments, load_rate_changes, parse_date};
