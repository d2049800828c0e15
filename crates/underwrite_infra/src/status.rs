//! Read-only policy status for external monitoring.

use std::sync::Arc;

use serde::Serialize;

use crate::store::{PolicyState, PolicyStore};

/// Health/monitoring view of the active policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    /// Document version, or `fallback` while degraded.
    pub policy_version: String,
    /// Runtime dry-run flag.
    pub dry_run_enabled: bool,
    /// The policy's `global.default_dry_run`.
    pub global_dry_run: bool,
    pub supported_collections_count: usize,
    pub reserve_ratio: f64,
    pub max_daily_volume: f64,
    pub policy_name: String,
    pub policy_state: PolicyState,
    /// Regime applied to new assessments.
    pub market_regime: String,
    pub policy_digest: Option<String>,
    pub last_load_error: Option<String>,
    pub reload_total: u64,
    pub fallback_total: u64,
}

impl StatusSummary {
    pub fn is_degraded(&self) -> bool {
        self.policy_state == PolicyState::Fallback
    }
}

/// Handle given to monitoring consumers. Holds no state of its own.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    store: Arc<PolicyStore>,
}

impl StatusReporter {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }

    pub fn status(&self) -> StatusSummary {
        self.store.status()
    }
}
