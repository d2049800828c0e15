//! Loan underwriting decision.
//!
//! Evaluation order (each step appends to the reasoning trail):
//! 1. Request sanity (amount, duration).
//! 2. Collection lookup by case-insensitive address; unmatched adds 50 points.
//! 3. Duration bucket (<=7 short, <=30 medium, >30 long) and its APR bonus.
//! 4. Market regime deltas.
//! 5. `recommended_ltv = min(max_ltv + ltv_delta, 0.85)`.
//! 6. `adjusted_apr = max(base_apr + apr_bonus + apr_delta, 0.10)`.
//! 7. `max_loan_amount = min(policy max, requested * 1.1)`; overage adds 25.
//! 8. Requested LTV against floor price, if supplied; overage adds 30.
//! 9. `approved = matched && risk_score < 75`.
//! 10. When dry-run is active, the dry-run flag and a simulated outcome.
//!
//! The pipeline always runs to completion, including for unmatched
//! collateral, so the trail explains every factor.

use rand::Rng;

use crate::loan::{LoanRequest, RiskAssessment};
use crate::policy::{CollectionPolicy, RiskPolicy, UNKNOWN_TIER, default_unknown_terms};
use crate::simulation::{emit_dry_run_event, simulate};

use super::bounds::{
    APPROVAL_RISK_THRESHOLD, LOAN_AMOUNT_HEADROOM, MAX_RECOMMENDED_LTV, MIN_ADJUSTED_APR,
    clamp_ltv, floor_apr,
};
use super::duration::resolve_duration_terms;
use super::market::resolve_market_adjustment;
use super::penalty::PenaltyCode;

/// Per-call inputs that do not come from the policy document.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentContext<'a> {
    pub market_regime: &'a str,
    pub dry_run: bool,
}

// --- Decision trail ------------------------------------------------------

#[derive(Debug, Default)]
struct DecisionTrail {
    reasoning: Vec<String>,
    penalties: Vec<PenaltyCode>,
    risk_score: u32,
}

impl DecisionTrail {
    fn note(&mut self, line: String) {
        self.reasoning.push(line);
    }

    fn penalize(&mut self, code: PenaltyCode, line: String) {
        self.risk_score = self.risk_score.saturating_add(code.points());
        self.penalties.push(code);
        self.reasoning.push(line);
    }
}

fn pct(v: f64) -> f64 {
    v * 100.0
}

// --- Assessor ------------------------------------------------------------

/// Deterministic underwriting decision, without dry-run handling.
///
/// Identical `(policy, request, market_regime)` always produce an identical
/// assessment.
pub fn assess_loan_in_regime(
    policy: &RiskPolicy,
    request: &LoanRequest,
    market_regime: &str,
) -> RiskAssessment {
    let mut trail = DecisionTrail::default();

    let amount_valid = request.requested_amount.is_finite() && request.requested_amount > 0.0;
    let mut problems = Vec::new();
    if !amount_valid {
        problems.push(format!(
            "requested amount {} is not a positive number",
            request.requested_amount
        ));
    }
    if request.duration_days == 0 {
        problems.push("duration must be at least one day".to_string());
    }
    if !problems.is_empty() {
        trail.penalize(
            PenaltyCode::InvalidRequest,
            format!("Invalid request: {}", problems.join("; ")),
        );
    }

    // Collection lookup.
    let matched = policy.find_collection(&request.contract_address);
    let (tier, terms): (String, CollectionPolicy) = match matched {
        Some((key, collection)) => {
            trail.note(format!(
                "Collection {key} matched ({} tier): max LTV {:.1}%, base APR {:.2}%",
                collection.tier,
                pct(collection.max_ltv),
                pct(collection.base_apr)
            ));
            (collection.tier.clone(), collection.clone())
        }
        None => {
            trail.penalize(
                PenaltyCode::CollectionNotWhitelisted,
                format!(
                    "Collection {} not in approved whitelist",
                    request.contract_address
                ),
            );
            let terms = policy
                .default_terms()
                .cloned()
                .unwrap_or_else(default_unknown_terms);
            (UNKNOWN_TIER.to_string(), terms)
        }
    };

    // Duration.
    let duration = resolve_duration_terms(policy, request.duration_days);
    if duration.defined {
        trail.note(format!(
            "Duration {} days classified as {}: APR bonus +{:.2}%, risk multiplier {:.2}",
            request.duration_days,
            duration.bucket.as_str(),
            pct(duration.terms.apr_bonus),
            duration.terms.risk_multiplier
        ));
    } else {
        trail.note(format!(
            "Duration {} days classified as {}: no policy entry, no APR bonus",
            request.duration_days,
            duration.bucket.as_str()
        ));
    }

    // Market regime.
    let market = resolve_market_adjustment(policy, market_regime);
    if market.defined {
        trail.note(format!(
            "Market regime {}: LTV {:+.2}%, APR {:+.2}%",
            market.regime,
            pct(market.ltv_delta),
            pct(market.apr_delta)
        ));
    } else {
        trail.note(format!(
            "Market regime {} not defined in policy; no adjustment applied",
            market.regime
        ));
    }

    // Hard bounds.
    let raw_ltv = terms.max_ltv + market.ltv_delta;
    let recommended_ltv = clamp_ltv(raw_ltv);
    if raw_ltv.is_finite() && raw_ltv > MAX_RECOMMENDED_LTV {
        trail.note(format!(
            "Recommended LTV capped at {:.1}% (policy terms gave {:.1}%)",
            pct(MAX_RECOMMENDED_LTV),
            pct(raw_ltv)
        ));
    }

    let raw_apr = terms.base_apr + duration.terms.apr_bonus + market.apr_delta;
    let adjusted_apr = floor_apr(raw_apr);
    if !(raw_apr.is_finite() && raw_apr >= MIN_ADJUSTED_APR) {
        trail.note(format!(
            "Adjusted APR raised to floor {:.2}% (policy terms gave {:.2}%)",
            pct(MIN_ADJUSTED_APR),
            pct(raw_apr)
        ));
    }

    // Amount.
    let amount_basis = if amount_valid {
        request.requested_amount
    } else {
        0.0
    };
    let max_loan_amount = terms
        .max_loan_amount
        .min(amount_basis * LOAN_AMOUNT_HEADROOM);
    if amount_valid && request.requested_amount > max_loan_amount {
        trail.penalize(
            PenaltyCode::AmountExceedsMax,
            format!(
                "Requested amount {} exceeds maximum loan amount {}",
                request.requested_amount, max_loan_amount
            ),
        );
    }

    // Collateral value.
    match request.floor_price {
        Some(floor) if floor.is_finite() && floor > 0.0 => {
            if amount_valid {
                let requested_ltv = request.requested_amount / floor;
                if requested_ltv > recommended_ltv {
                    trail.penalize(
                        PenaltyCode::LtvExceedsRecommended,
                        format!(
                            "Requested LTV {:.1}% exceeds recommended {:.1}%",
                            pct(requested_ltv),
                            pct(recommended_ltv)
                        ),
                    );
                } else {
                    trail.note(format!(
                        "Requested LTV {:.1}% within recommended {:.1}%",
                        pct(requested_ltv),
                        pct(recommended_ltv)
                    ));
                }
            }
        }
        Some(floor) => {
            trail.note(format!(
                "Floor price {floor} ignored: must be a positive number"
            ));
        }
        None => {}
    }

    // Decision.
    let approved = matched.is_some() && trail.risk_score < APPROVAL_RISK_THRESHOLD;
    if approved {
        trail.note(format!(
            "Approved: risk score {} below threshold {}",
            trail.risk_score, APPROVAL_RISK_THRESHOLD
        ));
    } else if matched.is_none() {
        trail.note(format!(
            "Declined: collateral not whitelisted (risk score {})",
            trail.risk_score
        ));
    } else {
        trail.note(format!(
            "Declined: risk score {} at or above threshold {}",
            trail.risk_score, APPROVAL_RISK_THRESHOLD
        ));
    }

    RiskAssessment {
        approved,
        recommended_ltv,
        adjusted_apr,
        max_loan_amount,
        risk_score: trail.risk_score,
        tier,
        duration_bucket: duration.bucket,
        reasoning: trail.reasoning,
        penalties: trail.penalties,
        dry_run: false,
        simulated_outcome: None,
    }
}

/// Mark an assessment as dry-run and attach an advisory outcome drawn from
/// `rng`.
///
/// Applies whenever dry-run is active, whatever the document's `mode`; the
/// mode only decides whether the document itself asks for dry-run on load.
pub fn apply_dry_run<R: Rng + ?Sized>(
    policy: &RiskPolicy,
    request: &LoanRequest,
    assessment: &mut RiskAssessment,
    rng: &mut R,
) {
    assessment.dry_run = true;
    assessment
        .reasoning
        .push("DRY RUN: advisory assessment only, no funds will move".to_string());

    let outcome = simulate(
        &policy.dry_run.simulation_outcomes,
        request,
        assessment.adjusted_apr,
        assessment.risk_score,
        rng,
    );
    emit_dry_run_event(&policy.dry_run.log_level, &request.contract_address, &outcome);
    assessment.simulated_outcome = Some(outcome);
}

/// Full assessment: the deterministic decision plus dry-run handling.
///
/// `rng` is only drawn from when `ctx.dry_run` is set.
pub fn assess_loan<R: Rng + ?Sized>(
    policy: &RiskPolicy,
    request: &LoanRequest,
    ctx: &AssessmentContext<'_>,
    rng: &mut R,
) -> RiskAssessment {
    let mut assessment = assess_loan_in_regime(policy, request, ctx.market_regime);
    if ctx.dry_run {
        apply_dry_run(policy, request, &mut assessment, rng);
    }
    log_assessment(request, &assessment);
    assessment
}

pub fn log_assessment(request: &LoanRequest, assessment: &RiskAssessment) {
    tracing::debug!(
        contract_address = %request.contract_address,
        token_id = %request.token_id,
        approved = assessment.approved,
        risk_score = assessment.risk_score,
        tier = %assessment.tier,
        dry_run = assessment.dry_run,
        "loan assessed"
    );
}
