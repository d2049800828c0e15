//! In-memory representation of a validated risk policy.
//!
//! Values of these types are produced by the infra decoder after schema
//! validation, or by [`super::fallback_policy`]. The assessor only ever reads
//! them; a policy is replaced wholesale, never patched field by field.

use std::collections::BTreeMap;

use serde::Serialize;

/// Tier name assigned to collateral that is not on the whitelist.
pub const UNKNOWN_TIER: &str = "unknown";

/// Descriptive block at the top of the policy document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyMetadata {
    pub name: String,
    pub version: String,
    pub last_updated: String,
    pub description: String,
}

/// Portfolio-wide settings. Reported through status; the assessor only reads
/// `default_dry_run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalPolicy {
    /// Maximum share of the book a single position may take, in percent.
    pub max_exposure_percentage: f64,
    pub max_daily_volume: f64,
    /// Fraction of capital kept in reserve.
    pub reserve_ratio: f64,
    pub default_dry_run: bool,
}

/// Lending terms for one whitelisted collateral collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionPolicy {
    pub address: String,
    /// Key into [`RiskPolicy::tiers`].
    pub tier: String,
    /// Maximum loan-to-value ratio, 0..=1.
    pub max_ltv: f64,
    /// Base annual rate before duration and market adjustments, > 0.
    pub base_apr: f64,
    pub max_loan_amount: f64,
    pub required_liquidity: f64,
}

impl CollectionPolicy {
    /// Whether this entry is the default-terms class rather than a
    /// whitelisted collection.
    pub fn is_unknown_class(&self) -> bool {
        self.tier.eq_ignore_ascii_case(UNKNOWN_TIER)
    }
}

/// Risk classification metadata. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierPolicy {
    pub description: String,
    pub min_floor_price: f64,
    pub max_default_rate: f64,
    pub min_volume_24h: f64,
}

/// Loan term bucket derived from the requested duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl DurationBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            DurationBucket::ShortTerm => "short_term",
            DurationBucket::MediumTerm => "medium_term",
            DurationBucket::LongTerm => "long_term",
        }
    }

    /// Parse a document key. Only the three canonical names are accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "short_term" => Some(DurationBucket::ShortTerm),
            "medium_term" => Some(DurationBucket::MediumTerm),
            "long_term" => Some(DurationBucket::LongTerm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationPolicy {
    /// Advisory; not applied to any computed term.
    pub risk_multiplier: f64,
    /// Added to the base APR.
    pub apr_bonus: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            risk_multiplier: 1.0,
            apr_bonus: 0.0,
        }
    }
}

/// Deltas for one market regime. Absent document fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarketConditionPolicy {
    pub ltv_bonus: f64,
    pub ltv_penalty: f64,
    pub ltv_adjustment: f64,
    pub apr_discount: f64,
    pub apr_premium: f64,
    pub apr_adjustment: f64,
}

impl MarketConditionPolicy {
    /// Net change to the collection's max LTV.
    pub fn ltv_delta(&self) -> f64 {
        self.ltv_bonus - self.ltv_penalty + self.ltv_adjustment
    }

    /// Net change to the APR.
    pub fn apr_delta(&self) -> f64 {
        self.apr_premium - self.apr_discount + self.apr_adjustment
    }
}

/// Whether the document asks for dry-run on load. Once dry-run is active,
/// every assessment carries a simulated outcome regardless of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DryRunMode {
    Simulation,
    Validation,
    /// The document does not ask for dry-run.
    Disabled,
}

impl DryRunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DryRunMode::Simulation => "simulation",
            DryRunMode::Validation => "validation",
            DryRunMode::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationOutcomes {
    pub success_rate: f64,
    pub default_rate: f64,
    pub avg_repayment_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DryRunConfig {
    pub enabled: bool,
    pub mode: DryRunMode,
    /// Level for dry-run advisory events (`trace`..`error`).
    pub log_level: String,
    pub simulation_outcomes: SimulationOutcomes,
}

/// Qualitative heuristic attached to the policy. Never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankingRule {
    pub rule: String,
    /// Remaining keys of the rule entry, rendered as strings.
    pub notes: BTreeMap<String, String>,
}

/// A complete, validated risk policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPolicy {
    pub metadata: PolicyMetadata,
    pub global: GlobalPolicy,
    pub collections: BTreeMap<String, CollectionPolicy>,
    pub tiers: BTreeMap<String, TierPolicy>,
    pub durations: BTreeMap<DurationBucket, DurationPolicy>,
    pub market_conditions: BTreeMap<String, MarketConditionPolicy>,
    pub dry_run: DryRunConfig,
    pub banking_rules: Vec<BankingRule>,
}

impl RiskPolicy {
    /// Find a whitelisted collection by case-insensitive address match.
    ///
    /// Entries in the `unknown` tier are the default-terms class and never
    /// match. Iteration follows key order so the first match is stable.
    pub fn find_collection(&self, address: &str) -> Option<(&str, &CollectionPolicy)> {
        let needle = address.trim();
        self.collections
            .iter()
            .filter(|(_, c)| !c.is_unknown_class())
            .find(|(_, c)| c.address.trim().eq_ignore_ascii_case(needle))
            .map(|(key, c)| (key.as_str(), c))
    }

    /// Terms applied to collateral that is not whitelisted, if the policy
    /// defines an `unknown`-tier class.
    pub fn default_terms(&self) -> Option<&CollectionPolicy> {
        self.collections.values().find(|c| c.is_unknown_class())
    }

    /// Number of collections that can be matched by address.
    pub fn whitelisted_count(&self) -> usize {
        self.collections
            .values()
            .filter(|c| !c.is_unknown_class())
            .count()
    }

    /// Duration terms for a bucket, `1.0 / 0.0` when the bucket is absent.
    pub fn duration_terms(&self, bucket: DurationBucket) -> DurationPolicy {
        self.durations.get(&bucket).copied().unwrap_or_default()
    }

    pub fn market_condition(&self, regime: &str) -> Option<&MarketConditionPolicy> {
        self.market_conditions.get(regime)
    }

    /// Whether this document asks for dry-run on load.
    pub fn dry_run_requested(&self) -> bool {
        (self.dry_run.enabled && self.dry_run.mode != DryRunMode::Disabled)
            || self.global.default_dry_run
    }
}
