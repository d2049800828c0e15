//! Wire shape of the YAML policy document.
//!
//! These types mirror the document one-to-one and carry no semantics of their
//! own. Unknown keys are rejected (except inside `banking_wisdom` entries,
//! which are free-form), so a typo in a risk field fails loudly instead of
//! silently falling back to a default. Range checks live in [`crate::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    pub metadata: MetadataDoc,
    pub global: GlobalDoc,
    pub collections: BTreeMap<String, CollectionDoc>,
    #[serde(default)]
    pub tiers: BTreeMap<String, TierDoc>,
    #[serde(default)]
    pub durations: BTreeMap<String, DurationDoc>,
    #[serde(default)]
    pub market_conditions: BTreeMap<String, MarketConditionDoc>,
    #[serde(default)]
    pub dry_run: DryRunDoc,
    #[serde(default)]
    pub banking_wisdom: Vec<BankingRuleDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataDoc {
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub last_updated: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalDoc {
    pub max_exposure_percentage: f64,
    pub max_daily_volume: f64,
    pub reserve_ratio: f64,
    /// Omitted means dry-run.
    #[serde(default = "default_true")]
    pub default_dry_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionDoc {
    #[serde(default)]
    pub address: String,
    pub tier: String,
    pub max_ltv: f64,
    pub base_apr: f64,
    pub max_loan_amount: f64,
    #[serde(default)]
    pub required_liquidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierDoc {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub min_floor_price: f64,
    #[serde(default)]
    pub max_default_rate: f64,
    #[serde(default)]
    pub min_volume_24h: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurationDoc {
    #[serde(default = "default_multiplier")]
    pub risk_multiplier: f64,
    #[serde(default)]
    pub apr_bonus: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MarketConditionDoc {
    pub ltv_bonus: f64,
    pub ltv_penalty: f64,
    pub ltv_adjustment: f64,
    pub apr_discount: f64,
    pub apr_premium: f64,
    pub apr_adjustment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DryRunModeDoc {
    Simulation,
    Validation,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DryRunDoc {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_mode")]
    pub mode: DryRunModeDoc,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub simulation_outcomes: SimulationOutcomesDoc,
}

impl Default for DryRunDoc {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: DryRunModeDoc::Simulation,
            log_level: default_log_level(),
            simulation_outcomes: SimulationOutcomesDoc::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationOutcomesDoc {
    pub success_rate: f64,
    pub default_rate: f64,
    pub avg_repayment_days: f64,
}

impl Default for SimulationOutcomesDoc {
    fn default() -> Self {
        Self {
            success_rate: 0.5,
            default_rate: 0.2,
            avg_repayment_days: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankingRuleDoc {
    pub rule: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_mode() -> DryRunModeDoc {
    DryRunModeDoc::Simulation
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Accept a string, number or boolean and keep its textual form. Versions
/// like `2.1` and dates like `2024-06-01` arrive as either depending on
/// quoting.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    scalar_to_string(&value).ok_or_else(|| serde::de::Error::custom("expected a scalar value"))
}

/// Textual form of a YAML scalar, `None` for sequences, mappings and null.
pub fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
