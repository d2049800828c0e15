//! Underwriting decision logic.

pub mod assessor;
pub mod bounds;
pub mod duration;
pub mod market;
pub mod metrics;
pub mod penalty;

pub use assessor::{
    AssessmentContext, apply_dry_run, assess_loan, assess_loan_in_regime, log_assessment,
};
pub use bounds::{
    APPROVAL_RISK_THRESHOLD, LOAN_AMOUNT_HEADROOM, MAX_RECOMMENDED_LTV, MIN_ADJUSTED_APR,
};
pub use duration::{
    DurationTerms, MEDIUM_TERM_MAX_DAYS, SHORT_TERM_MAX_DAYS, classify_duration,
    resolve_duration_terms,
};
pub use market::{DEFAULT_MARKET_REGIME, MarketAdjustment, resolve_market_adjustment};
pub use metrics::AssessmentMetrics;
pub use penalty::{PenaltyCode, penalty_registry};
