//! Process-local assessment counters.
//!
//! Atomics so a shared engine can record from concurrent callers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::loan::RiskAssessment;

#[derive(Debug, Default)]
pub struct AssessmentMetrics {
    assessed_total: AtomicU64,
    approved_total: AtomicU64,
    declined_total: AtomicU64,
    dry_run_total: AtomicU64,
}

impl AssessmentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, assessment: &RiskAssessment) {
        self.assessed_total.fetch_add(1, Ordering::Relaxed);
        if assessment.approved {
            self.approved_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.declined_total.fetch_add(1, Ordering::Relaxed);
        }
        if assessment.dry_run {
            self.dry_run_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn assessed_total(&self) -> u64 {
        self.assessed_total.load(Ordering::Relaxed)
    }

    pub fn approved_total(&self) -> u64 {
        self.approved_total.load(Ordering::Relaxed)
    }

    pub fn declined_total(&self) -> u64 {
        self.declined_total.load(Ordering::Relaxed)
    }

    pub fn dry_run_total(&self) -> u64 {
        self.dry_run_total.load(Ordering::Relaxed)
    }
}
