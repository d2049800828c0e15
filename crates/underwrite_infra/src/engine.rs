//! Underwriting engine facade.
//!
//! One explicit instance per policy source. Instances share nothing, so
//! several engines with different policies can run side by side in one
//! process. All methods take `&self`; the engine is `Send + Sync` and meant to
//! be shared behind an `Arc` by the hosting layer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use underwrite_core::risk::{self, AssessmentContext, AssessmentMetrics};
use underwrite_core::{LoanRequest, RiskAssessment};

use crate::config::EngineConfig;
use crate::status::{StatusReporter, StatusSummary};
use crate::store::{PolicySnapshot, PolicySource, PolicyState, PolicyStore};

type EntropySource = Box<dyn RngCore + Send>;

/// Locks the shared generator on the first draw. Live assessments never draw,
/// so they never touch the lock.
struct LazyRng<'a> {
    source: &'a Mutex<EntropySource>,
    guard: Option<MutexGuard<'a, EntropySource>>,
}

impl<'a> LazyRng<'a> {
    fn new(source: &'a Mutex<EntropySource>) -> Self {
        Self {
            source,
            guard: None,
        }
    }

    fn inner(&mut self) -> &mut dyn RngCore {
        let source = self.source;
        let guard = self
            .guard
            .get_or_insert_with(|| source.lock().unwrap_or_else(PoisonError::into_inner));
        &mut ***guard
    }
}

impl RngCore for LazyRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.inner().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner().try_fill_bytes(dest)
    }
}

pub struct UnderwritingEngine {
    store: Arc<PolicyStore>,
    /// Only locked for dry-run simulation draws.
    rng: Mutex<EntropySource>,
    metrics: AssessmentMetrics,
}

impl std::fmt::Debug for UnderwritingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnderwritingEngine")
            .field("store", &self.store)
            .field("market_regime", &self.market_regime())
            .finish_non_exhaustive()
    }
}

impl UnderwritingEngine {
    /// Engine with an OS-seeded simulation generator.
    pub fn new(source: PolicySource) -> Self {
        Self::with_rng(source, StdRng::from_entropy())
    }

    /// Engine whose simulation draws are reproducible from `seed`.
    pub fn with_seed(source: PolicySource, seed: u64) -> Self {
        Self::with_rng(source, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R>(source: PolicySource, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            store: Arc::new(PolicyStore::open(source)),
            rng: Mutex::new(Box::new(rng)),
            metrics: AssessmentMetrics::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let source = PolicySource::file(&config.policy_path);
        let engine = match config.rng_seed {
            Some(seed) => Self::with_seed(source, seed),
            None => Self::new(source),
        };
        engine.set_market_regime(config.market_regime.clone());
        engine
    }

    /// Assess a loan request against the current policy snapshot.
    ///
    /// Never fails: malformed requests come back declined with the problem in
    /// the reasoning trail.
    pub fn assess_loan(&self, request: &LoanRequest) -> RiskAssessment {
        let active = self.store.active();
        let ctx = AssessmentContext {
            market_regime: &active.market_regime,
            dry_run: active.dry_run,
        };
        let mut rng = LazyRng::new(&self.rng);

        let assessment = risk::assess_loan(&active.snapshot.policy, request, &ctx, &mut rng);
        self.metrics.record(&assessment);
        assessment
    }

    pub fn status(&self) -> StatusSummary {
        self.store.status()
    }

    pub fn status_reporter(&self) -> StatusReporter {
        StatusReporter::new(Arc::clone(&self.store))
    }

    pub fn set_dry_run(&self, enabled: bool) {
        let previous = self.store.set_dry_run(enabled);
        if previous != enabled {
            tracing::info!(enabled, "dry-run mode changed");
        }
    }

    /// Re-read the policy source. A failed read leaves the engine on the
    /// fallback policy until a later reload succeeds.
    pub fn reload_policy(&self) -> PolicyState {
        self.store.reload()
    }

    /// Point the engine at a different policy source and load it.
    pub fn reload_policy_from(&self, source: PolicySource) -> PolicyState {
        self.store.reload_from(source)
    }

    pub fn set_market_regime(&self, regime: impl Into<String>) {
        let regime = regime.into();
        tracing::info!(regime = %regime, "market regime selected");
        self.store.set_market_regime(regime);
    }

    pub fn market_regime(&self) -> String {
        self.store.market_regime()
    }

    pub fn policy(&self) -> Arc<PolicySnapshot> {
        self.store.snapshot()
    }

    pub fn metrics(&self) -> &AssessmentMetrics {
        &self.metrics
    }
}
