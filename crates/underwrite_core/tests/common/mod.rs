use underwrite_core::policy::{
    CollectionPolicy, DurationBucket, DurationPolicy, MarketConditionPolicy, RiskPolicy,
    TierPolicy, fallback_policy,
};

pub const PUNKS_ADDRESS: &str = "0xb47e3cd837dDF8e4c57F05d70Ab865de6e193BBB";
pub const UNLISTED_ADDRESS: &str = "0x00000000000000000000000000000000deadbeef";

/// Test helper: a production-shaped policy with one blue-chip collection.
///
/// Built on top of the fallback so the `unknown` default-terms class is
/// present. Dry-run is off at both document and global level.
pub fn blue_chip_policy() -> RiskPolicy {
    let mut policy = fallback_policy();
    policy.metadata.name = "Test Lending Policy".to_string();
    policy.metadata.version = "2.1.0".to_string();
    policy.global.default_dry_run = false;
    policy.global.max_daily_volume = 500.0;
    policy.global.reserve_ratio = 0.2;
    policy.dry_run.enabled = false;

    policy.tiers.insert(
        "blue_chip".to_string(),
        TierPolicy {
            description: "Established collections with deep liquidity".to_string(),
            min_floor_price: 10.0,
            max_default_rate: 0.05,
            min_volume_24h: 100.0,
        },
    );
    policy.collections.insert(
        "cryptopunks".to_string(),
        CollectionPolicy {
            address: PUNKS_ADDRESS.to_string(),
            tier: "blue_chip".to_string(),
            max_ltv: 0.70,
            base_apr: 0.18,
            max_loan_amount: 100.0,
            required_liquidity: 50.0,
        },
    );

    policy.durations.insert(
        DurationBucket::ShortTerm,
        DurationPolicy {
            risk_multiplier: 1.0,
            apr_bonus: 0.0,
        },
    );
    policy.durations.insert(
        DurationBucket::MediumTerm,
        DurationPolicy {
            risk_multiplier: 1.1,
            apr_bonus: 0.02,
        },
    );
    policy.durations.insert(
        DurationBucket::LongTerm,
        DurationPolicy {
            risk_multiplier: 1.3,
            apr_bonus: 0.05,
        },
    );

    policy.market_conditions.insert(
        "bull".to_string(),
        MarketConditionPolicy {
            ltv_bonus: 0.05,
            apr_discount: 0.02,
            ..MarketConditionPolicy::default()
        },
    );
    policy.market_conditions.insert(
        "bear".to_string(),
        MarketConditionPolicy {
            ltv_penalty: 0.10,
            apr_premium: 0.05,
            ..MarketConditionPolicy::default()
        },
    );
    policy
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
