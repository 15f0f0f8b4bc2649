//! Schedule builder for month-by-month amortization

mod calendar;
mod emi;
mod engine;
mod rates;
mod rows;
mod state;

pub use calendar::payment_date;
pub use emi::{calculate_emi, monthly_rate};
pub use engine::{
    build_schedule, ScheduleBuilder, ScheduleConfig, BALANCE_EPSILON, EXTRA_ITERATIONS, MAX_ITERATIONS,
};
pub use rates::RateSchedule;
pub use rows::{Schedule, ScheduleRow, ScheduleSummary, YearlyBreakdown};
pub use state::AmortizationState;
