#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const PUNKS_ADDRESS: &str = "0xb47e3cd837dDF8e4c57F05d70Ab865de6e193BBB";
pub const UNLISTED_ADDRESS: &str = "0x00000000000000000000000000000000deadbeef";

/// Test helper: a complete policy document with one whitelisted collection.
///
/// `dry_run_enabled` drives both `dry_run.enabled` and
/// `global.default_dry_run`; `mode` is written verbatim. The simulated success
/// rate is 1.0, so a simulation on a zero-score assessment always succeeds.
pub fn policy_yaml(version: &str, max_ltv: f64, dry_run_enabled: bool, mode: &str) -> String {
    format!(
        r#"metadata:
  name: Test Lending Policy
  version: "{version}"
  last_updated: "2024-06-01"
global:
  max_exposure_percentage: 20.0
  max_daily_volume: 500.0
  reserve_ratio: 0.2
  default_dry_run: {dry_run_enabled}
tiers:
  blue_chip:
    description: Deep liquidity
    min_floor_price: 10.0
    max_default_rate: 0.05
    min_volume_24h: 100.0
collections:
  cryptopunks:
    address: "{PUNKS_ADDRESS}"
    tier: blue_chip
    max_ltv: {max_ltv}
    base_apr: 0.18
    max_loan_amount: 100.0
    required_liquidity: 50.0
  unknown:
    tier: unknown
    max_ltv: 0.30
    base_apr: 0.40
    max_loan_amount: 1.0
durations:
  short_term:
    risk_multiplier: 1.0
    apr_bonus: 0.0
  medium_term:
    risk_multiplier: 1.1
    apr_bonus: 0.02
  long_term:
    risk_multiplier: 1.3
    apr_bonus: 0.05
market_conditions:
  neutral:
    ltv_adjustment: 0.0
  bear:
    ltv_penalty: 0.10
    apr_premium: 0.05
dry_run:
  enabled: {dry_run_enabled}
  mode: {mode}
  log_level: debug
  simulation_outcomes:
    success_rate: 1.0
    default_rate: 0.0
    avg_repayment_days: 21
banking_wisdom:
  - rule: Never lend against collateral you cannot sell in a day.
    source: desk
"#
    )
}

/// Live policy: dry-run off everywhere.
pub fn live_policy_yaml() -> String {
    policy_yaml("3.0.0", 0.70, false, "simulation")
}

/// Write `text` to `path` via rename so concurrent readers never see a
/// partial file.
pub fn write_atomically(path: &Path, text: &str) {
    let staging = path.with_extension("yaml.tmp");
    fs::write(&staging, text).unwrap();
    fs::rename(&staging, path).unwrap();
}

pub fn sample_policy_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/risk_policy.yaml")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
