//! Risk policy schema types and the embedded fallback.

pub mod fallback;
pub mod types;

pub use fallback::{FALLBACK_POLICY_VERSION, default_unknown_terms, fallback_policy};
pub use types::{
    BankingRule, CollectionPolicy, DryRunConfig, DryRunMode, DurationBucket, DurationPolicy,
    GlobalPolicy, MarketConditionPolicy, PolicyMetadata, RiskPolicy, SimulationOutcomes,
    TierPolicy, UNKNOWN_TIER,
};
