//! Tracing subscriber setup for binaries and test harnesses that host the
//! engine. Library code only emits events.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_FILTER_VAR;
use crate::error::ConfigError;

/// Install a global fmt subscriber filtered by `filter`.
///
/// Returns `Ok(false)` when a global subscriber is already installed.
pub fn init_tracing(filter: &str) -> Result<bool, ConfigError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| ConfigError::InvalidValue {
        name: LOG_FILTER_VAR,
        value: filter.to_string(),
        reason: e.to_string(),
    })?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok())
}
