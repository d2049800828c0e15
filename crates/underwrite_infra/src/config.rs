//! Engine configuration from the environment.
//!
//! | Variable                   | Default                   |
//! |----------------------------|---------------------------|
//! | `UNDERWRITE_POLICY_PATH`   | `config/risk_policy.yaml` |
//! | `UNDERWRITE_MARKET_REGIME` | `neutral`                 |
//! | `UNDERWRITE_RNG_SEED`      | unset (OS entropy)        |
//! | `UNDERWRITE_LOG`           | `info`                    |
//!
//! Missing or blank variables take their default. A present value that cannot
//! be used fails closed with [`ConfigError`].

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use underwrite_core::risk::DEFAULT_MARKET_REGIME;

use crate::error::ConfigError;

pub const POLICY_PATH_VAR: &str = "UNDERWRITE_POLICY_PATH";
pub const MARKET_REGIME_VAR: &str = "UNDERWRITE_MARKET_REGIME";
pub const RNG_SEED_VAR: &str = "UNDERWRITE_RNG_SEED";
pub const LOG_FILTER_VAR: &str = "UNDERWRITE_LOG";

pub const DEFAULT_POLICY_PATH: &str = "config/risk_policy.yaml";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub policy_path: PathBuf,
    pub market_regime: String,
    /// Simulation seed; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy_path: PathBuf::from(DEFAULT_POLICY_PATH),
            market_regime: DEFAULT_MARKET_REGIME.to_string(),
            rng_seed: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(POLICY_PATH_VAR) {
            config.policy_path = PathBuf::from(path);
        }

        if let Some(regime) = get(MARKET_REGIME_VAR) {
            if !regime
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ConfigError::InvalidValue {
                    name: MARKET_REGIME_VAR,
                    value: regime,
                    reason: "regime names are [A-Za-z0-9_-]".to_string(),
                });
            }
            config.market_regime = regime;
        }

        if let Some(seed) = get(RNG_SEED_VAR) {
            config.rng_seed = Some(seed.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: RNG_SEED_VAR,
                value: seed.clone(),
                reason: e.to_string(),
            })?);
        }

        if let Some(filter) = get(LOG_FILTER_VAR) {
            if let Err(e) = EnvFilter::try_new(&filter) {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FILTER_VAR,
                    value: filter,
                    reason: e.to_string(),
                });
            }
            config.log_filter = filter;
        }

        Ok(config)
    }
}
