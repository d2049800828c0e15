//! Loan term bucketing.

use crate::policy::{DurationBucket, DurationPolicy, RiskPolicy};

/// Longest term, in days, still classified as short term.
pub const SHORT_TERM_MAX_DAYS: u32 = 7;
/// Longest term, in days, still classified as medium term.
pub const MEDIUM_TERM_MAX_DAYS: u32 = 30;

pub fn classify_duration(duration_days: u32) -> DurationBucket {
    if duration_days <= SHORT_TERM_MAX_DAYS {
        DurationBucket::ShortTerm
    } else if duration_days <= MEDIUM_TERM_MAX_DAYS {
        DurationBucket::MediumTerm
    } else {
        DurationBucket::LongTerm
    }
}

/// Bucket and policy terms for a requested duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationTerms {
    pub bucket: DurationBucket,
    pub terms: DurationPolicy,
    /// False when the policy has no entry for the bucket and defaults apply.
    pub defined: bool,
}

pub fn resolve_duration_terms(policy: &RiskPolicy, duration_days: u32) -> DurationTerms {
    let bucket = classify_duration(duration_days);
    DurationTerms {
        bucket,
        terms: policy.duration_terms(bucket),
        defined: policy.durations.contains_key(&bucket),
    }
}
