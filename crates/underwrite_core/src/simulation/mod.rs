//! Dry-run outcome projection.
//!
//! Output is advisory only. Nothing here authorises or moves funds, whatever
//! the Bernoulli draw says.
//!
//! The entropy source is always passed in. Production seeds a `StdRng` from
//! config or OS entropy; tests seed it, or pick success rates of exactly 0 or
//! 1, to pin either branch.

use rand::Rng;

use crate::loan::{LoanRequest, SimulatedOutcome};
use crate::policy::SimulationOutcomes;

/// Largest reduction the risk score can apply to the success rate.
pub const MAX_RISK_DISCOUNT: f64 = 0.3;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// `success_rate - (risk_score / 100) * 0.3`, with the discount capped at
/// `MAX_RISK_DISCOUNT` and the result kept in `[0, 1]`.
pub fn risk_adjusted_success_rate(outcomes: &SimulationOutcomes, risk_score: u32) -> f64 {
    let discount = (f64::from(risk_score.min(100)) / 100.0) * MAX_RISK_DISCOUNT;
    let rate = outcomes.success_rate - discount;
    if !rate.is_finite() {
        return 0.0;
    }
    rate.clamp(0.0, 1.0)
}

/// Principal plus simple (non-compounding) interest for the term.
pub fn projected_repayment(requested_amount: f64, apr: f64, duration_days: u32) -> f64 {
    requested_amount * (1.0 + apr * f64::from(duration_days) / DAYS_PER_YEAR)
}

pub fn simulate<R: Rng + ?Sized>(
    outcomes: &SimulationOutcomes,
    request: &LoanRequest,
    apr: f64,
    risk_score: u32,
    rng: &mut R,
) -> SimulatedOutcome {
    let success_rate = risk_adjusted_success_rate(outcomes, risk_score);
    let would_succeed = rng.gen_bool(success_rate);

    SimulatedOutcome {
        would_succeed,
        projected_repayment: projected_repayment(
            request.requested_amount,
            apr,
            request.duration_days,
        ),
        risk_factors: vec![
            format!("Risk score: {risk_score}/100"),
            format!("Risk-adjusted success rate: {:.1}%", success_rate * 100.0),
            format!(
                "Average repayment period: {:.0} days",
                outcomes.avg_repayment_days
            ),
        ],
    }
}

/// Emit a dry-run advisory event at the level the policy asks for.
///
/// Unrecognised levels log at `info`.
pub fn emit_dry_run_event(log_level: &str, contract_address: &str, outcome: &SimulatedOutcome) {
    let level = log_level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" => tracing::trace!(
            contract_address,
            would_succeed = outcome.would_succeed,
            projected_repayment = outcome.projected_repayment,
            "dry-run simulation"
        ),
        "debug" => tracing::debug!(
            contract_address,
            would_succeed = outcome.would_succeed,
            projected_repayment = outcome.projected_repayment,
            "dry-run simulation"
        ),
        "warn" => tracing::warn!(
            contract_address,
            would_succeed = outcome.would_succeed,
            projected_repayment = outcome.projected_repayment,
            "dry-run simulation"
        ),
        "error" => tracing::error!(
            contract_address,
            would_succeed = outcome.would_succeed,
            projected_repayment = outcome.projected_repayment,
            "dry-run simulation"
        ),
        _ => tracing::info!(
            contract_address,
            would_succeed = outcome.would_succeed,
            projected_repayment = outcome.projected_repayment,
            "dry-run simulation"
        ),
    }
}
