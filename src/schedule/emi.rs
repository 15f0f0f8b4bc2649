//! Equated monthly instalment (EMI) for a reducing-balance loan

/// Convert an annual percentage rate to the monthly rate used for compounding
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 1200.0
}

/// Standard annuity instalment: `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// Degenerate tenures do not fail: `months == 0` repays everything at once
/// (EMI = principal) and negative tenures yield an EMI of zero. A zero rate
/// falls back to straight division.
pub fn calculate_emi(principal: f64, monthly_rate: f64, months: i32) -> f64 {
    if months < 0 {
        return 0.0;
    }
    if months == 0 {
        return principal;
    }

    let n = months as f64;
    if monthly_rate == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powi(months);
    principal * monthly_rate * growth / (growth - 1.0)
}
