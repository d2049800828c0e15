//! Market regime adjustments.

use crate::policy::RiskPolicy;

/// Regime used when the caller does not select one.
pub const DEFAULT_MARKET_REGIME: &str = "neutral";

#[derive(Debug, Clone, PartialEq)]
pub struct MarketAdjustment {
    pub regime: String,
    pub ltv_delta: f64,
    pub apr_delta: f64,
    /// False when the policy has no entry for the regime; deltas are then zero.
    pub defined: bool,
}

pub fn resolve_market_adjustment(policy: &RiskPolicy, regime: &str) -> MarketAdjustment {
    match policy.market_condition(regime) {
        Some(condition) => MarketAdjustment {
            regime: regime.to_string(),
            ltv_delta: condition.ltv_delta(),
            apr_delta: condition.apr_delta(),
            defined: true,
        },
        None => MarketAdjustment {
            regime: regime.to_string(),
            ltv_delta: 0.0,
            apr_delta: 0.0,
            defined: false,
        },
    }
}
