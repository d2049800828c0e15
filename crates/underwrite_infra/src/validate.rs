//! Schema validation: `PolicyDocument` -> `RiskPolicy`.
//!
//! Every problem found is reported, each prefixed with its dotted document
//! path, so one pass over a broken policy yields the full list of fixes.

use std::collections::{BTreeMap, HashMap};

use underwrite_core::policy::{
    BankingRule, CollectionPolicy, DryRunConfig, DryRunMode, DurationBucket, DurationPolicy,
    GlobalPolicy, MarketConditionPolicy, PolicyMetadata, RiskPolicy, SimulationOutcomes,
    TierPolicy, UNKNOWN_TIER,
};

use crate::document::{DryRunModeDoc, PolicyDocument, scalar_to_string};
use crate::error::PolicyError;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Default)]
struct Diagnostics(Vec<String>);

impl Diagnostics {
    fn push(&mut self, path: &str, message: impl AsRef<str>) {
        self.0.push(format!("{path}: {}", message.as_ref()));
    }

    fn non_empty(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, "must not be empty");
        }
    }

    fn finite(&mut self, path: &str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            self.push(path, format!("must be a finite number, got {value}"));
            false
        }
    }

    fn in_range(&mut self, path: &str, value: f64, lo: f64, hi: f64) {
        if self.finite(path, value) && !(lo..=hi).contains(&value) {
            self.push(path, format!("must be within [{lo}, {hi}], got {value}"));
        }
    }

    fn non_negative(&mut self, path: &str, value: f64) {
        if self.finite(path, value) && value < 0.0 {
            self.push(path, format!("must not be negative, got {value}"));
        }
    }

    fn positive(&mut self, path: &str, value: f64) {
        if self.finite(path, value) && value <= 0.0 {
            self.push(path, format!("must be greater than 0, got {value}"));
        }
    }
}

/// Decode and validate a YAML policy document.
pub fn decode_policy(text: &str, origin: &str) -> Result<RiskPolicy, PolicyError> {
    let document: PolicyDocument =
        serde_yaml::from_str(text).map_err(|e| PolicyError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    validate_document(document).map_err(|diagnostics| PolicyError::Invalid {
        origin: origin.to_string(),
        diagnostics,
    })
}

pub fn validate_document(doc: PolicyDocument) -> Result<RiskPolicy, Vec<String>> {
    let mut diag = Diagnostics::default();

    // --- metadata ---
    diag.non_empty("metadata.name", &doc.metadata.name);
    diag.non_empty("metadata.version", &doc.metadata.version);

    // --- global ---
    let g = &doc.global;
    diag.in_range(
        "global.max_exposure_percentage",
        g.max_exposure_percentage,
        0.0,
        100.0,
    );
    diag.non_negative("global.max_daily_volume", g.max_daily_volume);
    diag.in_range("global.reserve_ratio", g.reserve_ratio, 0.0, 1.0);

    // --- tiers ---
    let mut tiers = BTreeMap::new();
    for (name, tier) in &doc.tiers {
        let path = format!("tiers.{name}");
        diag.non_negative(&format!("{path}.min_floor_price"), tier.min_floor_price);
        diag.in_range(
            &format!("{path}.max_default_rate"),
            tier.max_default_rate,
            0.0,
            1.0,
        );
        diag.non_negative(&format!("{path}.min_volume_24h"), tier.min_volume_24h);
        tiers.insert(
            name.clone(),
            TierPolicy {
                description: tier.description.clone(),
                min_floor_price: tier.min_floor_price,
                max_default_rate: tier.max_default_rate,
                min_volume_24h: tier.min_volume_24h,
            },
        );
    }

    // --- collections ---
    if doc.collections.is_empty() {
        diag.push("collections", "at least one collection is required");
    }
    let mut collections = BTreeMap::new();
    let mut seen_addresses: HashMap<String, &str> = HashMap::new();
    for (key, c) in &doc.collections {
        let path = format!("collections.{key}");
        let unknown_class = c.tier.eq_ignore_ascii_case(UNKNOWN_TIER);
        if !unknown_class {
            diag.non_empty(&format!("{path}.address"), &c.address);
            if !c.address.trim().is_empty() {
                let normalized = c.address.trim().to_ascii_lowercase();
                if let Some(first) = seen_addresses.get(&normalized) {
                    diag.push(
                        &format!("{path}.address"),
                        format!("duplicates the address of collections.{first}"),
                    );
                } else {
                    seen_addresses.insert(normalized, key.as_str());
                }
            }
            if !tiers.contains_key(&c.tier) {
                diag.push(
                    &format!("{path}.tier"),
                    format!("references undefined tier '{}'", c.tier),
                );
            }
        }
        diag.in_range(&format!("{path}.max_ltv"), c.max_ltv, 0.0, 1.0);
        diag.positive(&format!("{path}.base_apr"), c.base_apr);
        diag.positive(&format!("{path}.max_loan_amount"), c.max_loan_amount);
        diag.non_negative(&format!("{path}.required_liquidity"), c.required_liquidity);
        collections.insert(
            key.clone(),
            CollectionPolicy {
                address: c.address.trim().to_string(),
                tier: if unknown_class {
                    UNKNOWN_TIER.to_string()
                } else {
                    c.tier.clone()
                },
                max_ltv: c.max_ltv,
                base_apr: c.base_apr,
                max_loan_amount: c.max_loan_amount,
                required_liquidity: c.required_liquidity,
            },
        );
    }

    // --- durations ---
    let mut durations = BTreeMap::new();
    for (key, d) in &doc.durations {
        let path = format!("durations.{key}");
        let Some(bucket) = DurationBucket::from_key(key) else {
            diag.push(
                &path,
                "unknown bucket, expected short_term, medium_term or long_term",
            );
            continue;
        };
        diag.positive(&format!("{path}.risk_multiplier"), d.risk_multiplier);
        diag.non_negative(&format!("{path}.apr_bonus"), d.apr_bonus);
        durations.insert(
            bucket,
            DurationPolicy {
                risk_multiplier: d.risk_multiplier,
                apr_bonus: d.apr_bonus,
            },
        );
    }

    // --- market conditions ---
    let mut market_conditions = BTreeMap::new();
    for (regime, m) in &doc.market_conditions {
        let path = format!("market_conditions.{regime}");
        for (field, value) in [
            ("ltv_bonus", m.ltv_bonus),
            ("ltv_penalty", m.ltv_penalty),
            ("ltv_adjustment", m.ltv_adjustment),
            ("apr_discount", m.apr_discount),
            ("apr_premium", m.apr_premium),
            ("apr_adjustment", m.apr_adjustment),
        ] {
            diag.finite(&format!("{path}.{field}"), value);
        }
        market_conditions.insert(
            regime.clone(),
            MarketConditionPolicy {
                ltv_bonus: m.ltv_bonus,
                ltv_penalty: m.ltv_penalty,
                ltv_adjustment: m.ltv_adjustment,
                apr_discount: m.apr_discount,
                apr_premium: m.apr_premium,
                apr_adjustment: m.apr_adjustment,
            },
        );
    }

    // --- dry run ---
    let dr = &doc.dry_run;
    let log_level = dr.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&log_level.as_str()) {
        diag.push(
            "dry_run.log_level",
            format!(
                "unknown level '{}', expected one of {}",
                dr.log_level,
                LOG_LEVELS.join(", ")
            ),
        );
    }
    let so = &dr.simulation_outcomes;
    diag.in_range(
        "dry_run.simulation_outcomes.success_rate",
        so.success_rate,
        0.0,
        1.0,
    );
    diag.in_range(
        "dry_run.simulation_outcomes.default_rate",
        so.default_rate,
        0.0,
        1.0,
    );
    diag.positive(
        "dry_run.simulation_outcomes.avg_repayment_days",
        so.avg_repayment_days,
    );

    // --- banking wisdom ---
    let mut banking_rules = Vec::with_capacity(doc.banking_wisdom.len());
    for (idx, entry) in doc.banking_wisdom.iter().enumerate() {
        diag.non_empty(&format!("banking_wisdom[{idx}].rule"), &entry.rule);
        let notes = entry
            .extra
            .iter()
            .map(|(k, v)| {
                let text = scalar_to_string(v).unwrap_or_else(|| {
                    serde_yaml::to_string(v)
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default()
                });
                (k.clone(), text)
            })
            .collect();
        banking_rules.push(BankingRule {
            rule: entry.rule.clone(),
            notes,
        });
    }

    if !diag.0.is_empty() {
        return Err(diag.0);
    }

    Ok(RiskPolicy {
        metadata: PolicyMetadata {
            name: doc.metadata.name.trim().to_string(),
            version: doc.metadata.version.trim().to_string(),
            last_updated: doc.metadata.last_updated,
            description: doc.metadata.description,
        },
        global: GlobalPolicy {
            max_exposure_percentage: g.max_exposure_percentage,
            max_daily_volume: g.max_daily_volume,
            reserve_ratio: g.reserve_ratio,
            default_dry_run: g.default_dry_run,
        },
        collections,
        tiers,
        durations,
        market_conditions,
        dry_run: DryRunConfig {
            enabled: dr.enabled,
            mode: match dr.mode {
                DryRunModeDoc::Simulation => DryRunMode::Simulation,
                DryRunModeDoc::Validation => DryRunMode::Validation,
                DryRunModeDoc::Disabled => DryRunMode::Disabled,
            },
            log_level,
            simulation_outcomes: SimulationOutcomes {
                success_rate: so.success_rate,
                default_rate: so.default_rate,
                avg_repayment_days: so.avg_repayment_days,
            },
        },
        banking_rules,
    })
}
