//! Hard limits applied after every policy adjustment. No policy value can
//! move a decision past these.

/// Ceiling on `recommended_ltv`.
pub const MAX_RECOMMENDED_LTV: f64 = 0.85;
/// Floor on `adjusted_apr`.
pub const MIN_ADJUSTED_APR: f64 = 0.10;
/// `max_loan_amount` never exceeds the requested amount by more than this factor.
pub const LOAN_AMOUNT_HEADROOM: f64 = 1.1;
/// A request is approved only while its risk score stays strictly below this.
pub const APPROVAL_RISK_THRESHOLD: u32 = 75;

/// Clamp a computed LTV into `[0, MAX_RECOMMENDED_LTV]`.
///
/// Non-finite input maps to 0 so a broken calculation cannot widen terms.
pub fn clamp_ltv(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_RECOMMENDED_LTV)
}

/// Raise a computed APR to at least `MIN_ADJUSTED_APR`.
pub fn floor_apr(raw: f64) -> f64 {
    if !raw.is_finite() {
        return MIN_ADJUSTED_APR;
    }
    raw.max(MIN_ADJUSTED_APR)
}
