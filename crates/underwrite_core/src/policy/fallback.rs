//! Embedded safe-default policy.
//!
//! Substituted whenever the configured policy cannot be read or fails
//! validation. It whitelists nothing, prices every loan as unknown collateral
//! and forces simulation-only behaviour.

use std::collections::BTreeMap;

use super::types::{
    BankingRule, CollectionPolicy, DryRunConfig, DryRunMode, DurationBucket, DurationPolicy,
    GlobalPolicy, MarketConditionPolicy, PolicyMetadata, RiskPolicy, SimulationOutcomes,
    TierPolicy, UNKNOWN_TIER,
};

/// Version string carried by the fallback policy.
pub const FALLBACK_POLICY_VERSION: &str = "fallback";

pub const FALLBACK_MAX_LTV: f64 = 0.50;
pub const FALLBACK_BASE_APR: f64 = 0.30;
pub const FALLBACK_MAX_LOAN_AMOUNT: f64 = 1.0;

/// Terms used for non-whitelisted collateral when a policy has no
/// `unknown`-tier class of its own.
pub fn default_unknown_terms() -> CollectionPolicy {
    CollectionPolicy {
        address: String::new(),
        tier: UNKNOWN_TIER.to_string(),
        max_ltv: FALLBACK_MAX_LTV,
        base_apr: FALLBACK_BASE_APR,
        max_loan_amount: FALLBACK_MAX_LOAN_AMOUNT,
        required_liquidity: 0.0,
    }
}

pub fn fallback_policy() -> RiskPolicy {
    let mut collections = BTreeMap::new();
    collections.insert(UNKNOWN_TIER.to_string(), default_unknown_terms());

    let mut tiers = BTreeMap::new();
    tiers.insert(
        UNKNOWN_TIER.to_string(),
        TierPolicy {
            description: "Unclassified collateral".to_string(),
            min_floor_price: 0.0,
            max_default_rate: 0.0,
            min_volume_24h: 0.0,
        },
    );

    let mut durations = BTreeMap::new();
    durations.insert(
        DurationBucket::ShortTerm,
        DurationPolicy {
            risk_multiplier: 1.0,
            apr_bonus: 0.0,
        },
    );
    durations.insert(
        DurationBucket::MediumTerm,
        DurationPolicy {
            risk_multiplier: 1.2,
            apr_bonus: 0.02,
        },
    );
    durations.insert(
        DurationBucket::LongTerm,
        DurationPolicy {
            risk_multiplier: 1.5,
            apr_bonus: 0.05,
        },
    );

    let mut market_conditions = BTreeMap::new();
    market_conditions.insert("neutral".to_string(), MarketConditionPolicy::default());

    RiskPolicy {
        metadata: PolicyMetadata {
            name: "Embedded Fallback Policy".to_string(),
            version: FALLBACK_POLICY_VERSION.to_string(),
            last_updated: String::new(),
            description: "Conservative simulation-only policy used when the configured policy \
                          cannot be loaded"
                .to_string(),
        },
        global: GlobalPolicy {
            max_exposure_percentage: 1.0,
            max_daily_volume: 0.0,
            reserve_ratio: 0.5,
            default_dry_run: true,
        },
        collections,
        tiers,
        durations,
        market_conditions,
        dry_run: DryRunConfig {
            enabled: true,
            mode: DryRunMode::Simulation,
            log_level: "warn".to_string(),
            simulation_outcomes: SimulationOutcomes {
                success_rate: 0.5,
                default_rate: 0.2,
                avg_repayment_days: 30.0,
            },
        },
        banking_rules: vec![BankingRule {
            rule: "Policy unavailable: simulate only, never lend".to_string(),
            notes: BTreeMap::new(),
        }],
    }
}
