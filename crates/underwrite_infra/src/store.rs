//! Active policy store.
//!
//! Lifecycle: `Loaded <-> Fallback`. Startup lands in `Loaded` when the source
//! reads and validates, `Fallback` otherwise. Every reload re-reads the source
//! and publishes the result (the decoded policy or the embedded fallback) as a
//! new immutable snapshot.
//!
//! The snapshot, the runtime dry-run flag and the selected market regime live
//! behind one lock and are read together as an [`ActivePolicy`]. Publication
//! replaces snapshot and reseeded flag in a single write, so an assessment
//! never pairs one policy with the flag of another. Readers hold the read lock
//! only long enough to clone the view.
//!
//! Reloads are serialised on the source lock: read, decode and publish of one
//! reload finish before the next one starts.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use underwrite_core::policy::{RiskPolicy, fallback_policy};
use underwrite_core::risk::DEFAULT_MARKET_REGIME;
use xxhash_rust::xxh64::xxh64;

use crate::error::PolicyError;
use crate::status::StatusSummary;
use crate::validate::decode_policy;

/// Where the policy document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    File(PathBuf),
    /// In-memory document, e.g. compiled in or supplied by a test.
    Inline { label: String, text: String },
}

impl PolicySource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Inline {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline { label, .. } => format!("inline:{label}"),
        }
    }

    fn read(&self) -> Result<String, PolicyError> {
        match self {
            Self::File(path) => fs::read_to_string(path).map_err(|source| PolicyError::Read {
                origin: self.describe(),
                source,
            }),
            Self::Inline { text, .. } => Ok(text.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyState {
    Loaded,
    Fallback,
}

impl PolicyState {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyState::Loaded => "loaded",
            PolicyState::Fallback => "fallback",
        }
    }
}

/// One immutable published policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySnapshot {
    pub policy: RiskPolicy,
    pub state: PolicyState,
    /// xxh64 of the source text, hex. `None` for the fallback.
    pub digest: Option<String>,
    /// Why the source was rejected, when `state == Fallback`.
    pub load_error: Option<String>,
}

/// Raw-bytes fingerprint reported in status.
pub fn policy_digest(text: &str) -> String {
    format!("{:016x}", xxh64(text.as_bytes(), 0))
}

/// Read, decode and validate `source`.
pub fn try_load(source: &PolicySource) -> Result<PolicySnapshot, PolicyError> {
    let text = source.read()?;
    let policy = decode_policy(&text, &source.describe())?;
    Ok(PolicySnapshot {
        policy,
        state: PolicyState::Loaded,
        digest: Some(policy_digest(&text)),
        load_error: None,
    })
}

/// Load `source`, substituting the embedded fallback on any failure.
pub fn load(source: &PolicySource) -> PolicySnapshot {
    match try_load(source) {
        Ok(snapshot) => {
            tracing::info!(
                origin = %source.describe(),
                name = %snapshot.policy.metadata.name,
                version = %snapshot.policy.metadata.version,
                collections = snapshot.policy.whitelisted_count(),
                digest = snapshot.digest.as_deref().unwrap_or_default(),
                "risk policy loaded"
            );
            snapshot
        }
        Err(err) => {
            tracing::warn!(
                origin = %source.describe(),
                kind = err.kind(),
                error = %err,
                "risk policy unavailable; using embedded fallback policy"
            );
            PolicySnapshot {
                policy: fallback_policy(),
                state: PolicyState::Fallback,
                digest: None,
                load_error: Some(err.to_string()),
            }
        }
    }
}

/// Everything an assessment reads from the store, taken under one lock.
#[derive(Debug, Clone)]
pub struct ActivePolicy {
    pub snapshot: Arc<PolicySnapshot>,
    /// Seeded from the snapshot on publication, then overridable.
    pub dry_run: bool,
    /// Survives reloads.
    pub market_regime: String,
}

#[derive(Debug)]
pub struct PolicyStore {
    source: Mutex<PolicySource>,
    active: RwLock<ActivePolicy>,
    reload_total: AtomicU64,
    fallback_total: AtomicU64,
}

impl PolicyStore {
    /// Load `source` and build a store around the result. Never fails.
    pub fn open(source: PolicySource) -> Self {
        let snapshot = load(&source);
        let fallback_total = u64::from(snapshot.state == PolicyState::Fallback);
        Self {
            active: RwLock::new(ActivePolicy {
                dry_run: snapshot.policy.dry_run_requested(),
                snapshot: Arc::new(snapshot),
                market_regime: DEFAULT_MARKET_REGIME.to_string(),
            }),
            source: Mutex::new(source),
            reload_total: AtomicU64::new(0),
            fallback_total: AtomicU64::new(fallback_total),
        }
    }

    pub fn source(&self) -> PolicySource {
        self.source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consistent view of snapshot, dry-run flag and regime.
    pub fn active(&self) -> ActivePolicy {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard.snapshot)
    }

    pub fn state(&self) -> PolicyState {
        self.snapshot().state
    }

    /// Re-read the source and publish the outcome.
    pub fn reload(&self) -> PolicyState {
        let source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = load(&source);
        self.publish(snapshot).1
    }

    /// Switch to `source` and publish whatever it yields. The new source
    /// is kept even when it falls back, so a later `reload` retries it.
    pub fn reload_from(&self, source: PolicySource) -> PolicyState {
        let mut current = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = load(&source);
        *current = source;
        self.publish(snapshot).1
    }

    /// Swap in `snapshot` with its reseeded dry-run flag. Returns the
    /// `(replaced, published)` states. Callers hold the source lock.
    fn publish(&self, snapshot: PolicySnapshot) -> (PolicyState, PolicyState) {
        let state = snapshot.state;
        let dry_run = snapshot.policy.dry_run_requested();
        let previous = {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            let previous = active.snapshot.state;
            active.snapshot = Arc::new(snapshot);
            active.dry_run = dry_run;
            previous
        };

        self.reload_total.fetch_add(1, Ordering::Relaxed);
        if state == PolicyState::Fallback {
            self.fallback_total.fetch_add(1, Ordering::Relaxed);
        }
        if previous != state {
            tracing::info!(
                from = previous.as_str(),
                to = state.as_str(),
                "risk policy state changed"
            );
        }
        (previous, state)
    }

    pub fn dry_run_enabled(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .dry_run
    }

    /// Override the runtime flag until the next load. Returns the previous
    /// value.
    pub fn set_dry_run(&self, enabled: bool) -> bool {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut active.dry_run, enabled)
    }

    pub fn market_regime(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .market_regime
            .clone()
    }

    pub fn set_market_regime(&self, regime: String) {
        self.active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .market_regime = regime;
    }

    pub fn reload_total(&self) -> u64 {
        self.reload_total.load(Ordering::Relaxed)
    }

    pub fn fallback_total(&self) -> u64 {
        self.fallback_total.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> StatusSummary {
        let active = self.active();
        let snapshot = &active.snapshot;
        let policy = &snapshot.policy;
        StatusSummary {
            policy_version: policy.metadata.version.clone(),
            dry_run_enabled: active.dry_run,
            global_dry_run: policy.global.default_dry_run,
            supported_collections_count: policy.collections.len(),
            reserve_ratio: policy.global.reserve_ratio,
            max_daily_volume: policy.global.max_daily_volume,
            policy_name: policy.metadata.name.clone(),
            policy_state: snapshot.state,
            market_regime: active.market_regime.clone(),
            policy_digest: snapshot.digest.clone(),
            last_load_error: snapshot.load_error.clone(),
            reload_total: self.reload_total(),
            fallback_total: self.fallback_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: &str = r#"
metadata:
  name: Unit
  version: "1"
global:
  max_exposure_percentage: 10.0
  max_daily_volume: 0.0
  reserve_ratio: 0.5
  default_dry_run: false
collections:
  unknown:
    tier: unknown
    max_ltv: 0.3
    base_apr: 0.4
    max_loan_amount: 1.0
dry_run:
  enabled: false
"#;

    #[test]
    fn publish_reports_replaced_state() {
        let store = PolicyStore::open(PolicySource::inline("broken", "metadata: ["));
        let live = try_load(&PolicySource::inline("live", LIVE)).unwrap();

        assert_eq!(
            store.publish(live.clone()),
            (PolicyState::Fallback, PolicyState::Loaded)
        );
        assert_eq!(
            store.publish(live),
            (PolicyState::Loaded, PolicyState::Loaded)
        );
        assert!(!store.dry_run_enabled());
    }

    #[test]
    fn publish_reseeds_flag_with_snapshot() {
        let store = PolicyStore::open(PolicySource::inline("live", LIVE));
        assert!(!store.set_dry_run(true));

        store.reload();
        let active = store.active();
        assert_eq!(active.snapshot.state, PolicyState::Loaded);
        assert!(!active.dry_run);
    }
}
