//! Dry-run simulation tests.
//!
//! The generator is always injected: success rates of exactly 0 and 1 pin
//! each branch, and equal seeds must reproduce equal draws.

mod common;

use common::{PUNKS_ADDRESS, UNLISTED_ADDRESS, approx_eq, blue_chip_policy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use underwrite_core::LoanRequest;
use underwrite_core::policy::{DryRunMode, SimulationOutcomes};
use underwrite_core::risk::{AssessmentContext, DEFAULT_MARKET_REGIME, assess_loan};
use underwrite_core::simulation::{projected_repayment, risk_adjusted_success_rate, simulate};

fn outcomes(success_rate: f64) -> SimulationOutcomes {
    SimulationOutcomes {
        success_rate,
        default_rate: 0.05,
        avg_repayment_days: 21.0,
    }
}

const DRY_RUN: AssessmentContext<'static> = AssessmentContext {
    market_regime: DEFAULT_MARKET_REGIME,
    dry_run: true,
};

#[test]
fn test_success_rate_discounted_by_risk() {
    assert!(approx_eq(risk_adjusted_success_rate(&outcomes(0.9), 0), 0.9));
    assert!(approx_eq(risk_adjusted_success_rate(&outcomes(0.9), 50), 0.75));
    assert!(approx_eq(risk_adjusted_success_rate(&outcomes(0.9), 100), 0.6));
    // Discount is capped at 30 points even when the score passes 100.
    assert!(approx_eq(risk_adjusted_success_rate(&outcomes(0.9), 180), 0.6));
    assert_eq!(risk_adjusted_success_rate(&outcomes(0.1), 100), 0.0);
}

#[test]
fn test_projected_repayment_is_simple_interest() {
    assert!(approx_eq(projected_repayment(100.0, 0.365, 10), 101.0));
    assert!(approx_eq(projected_repayment(20.0, 0.20, 365), 24.0));
}

#[test]
fn test_certain_success_branch() {
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 10.0, 30);
    let mut rng = StdRng::seed_from_u64(7);
    let out = simulate(&outcomes(1.0), &request, 0.2, 0, &mut rng);

    assert!(out.would_succeed);
    assert_eq!(
        out.risk_factors,
        vec![
            "Risk score: 0/100".to_string(),
            "Risk-adjusted success rate: 100.0%".to_string(),
            "Average repayment period: 21 days".to_string(),
        ]
    );
}

#[test]
fn test_certain_failure_branch() {
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 10.0, 30);
    let mut rng = StdRng::seed_from_u64(7);
    let out = simulate(&outcomes(0.0), &request, 0.2, 0, &mut rng);
    assert!(!out.would_succeed);
}

#[test]
fn test_equal_seeds_reproduce_draws() {
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 10.0, 30);
    let draws = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..32)
            .map(|_| simulate(&outcomes(0.5), &request, 0.2, 10, &mut rng).would_succeed)
            .collect::<Vec<_>>()
    };
    assert_eq!(draws(42), draws(42));
}

#[test]
fn test_dry_run_assessment_carries_simulation() {
    let mut policy = blue_chip_policy();
    policy.dry_run.simulation_outcomes = outcomes(1.0);
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 20.0, 14).with_floor_price(40.0);
    let mut rng = StdRng::seed_from_u64(1);

    let out = assess_loan(&policy, &request, &DRY_RUN, &mut rng);

    assert!(out.dry_run);
    assert!(out.approved);
    assert_eq!(
        out.reasoning.last().unwrap(),
        "DRY RUN: advisory assessment only, no funds will move"
    );
    let sim = out.simulated_outcome.expect("simulation expected in dry-run");
    assert!(sim.would_succeed);
    assert!(approx_eq(sim.projected_repayment, 20.0 * (1.0 + out.adjusted_apr * 14.0 / 365.0)));
}

#[test]
fn test_active_dry_run_simulates_in_every_mode() {
    let request = LoanRequest::new(UNLISTED_ADDRESS, "1", 1.0, 3);
    for mode in [
        DryRunMode::Simulation,
        DryRunMode::Validation,
        DryRunMode::Disabled,
    ] {
        let mut policy = blue_chip_policy();
        policy.dry_run.mode = mode;
        let mut rng = StdRng::seed_from_u64(1);

        let out = assess_loan(&policy, &request, &DRY_RUN, &mut rng);

        assert!(out.dry_run, "mode {}", mode.as_str());
        let sim = out
            .simulated_outcome
            .unwrap_or_else(|| panic!("mode {} must simulate", mode.as_str()));
        assert_eq!(sim.risk_factors[0], format!("Risk score: {}/100", out.risk_score));
        assert_eq!(
            out.reasoning.last().unwrap(),
            "DRY RUN: advisory assessment only, no funds will move"
        );
    }
}

#[test]
fn test_live_mode_never_simulates() {
    let policy = blue_chip_policy();
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 10.0, 3);
    let mut rng = StdRng::seed_from_u64(1);
    let ctx = AssessmentContext {
        market_regime: DEFAULT_MARKET_REGIME,
        dry_run: false,
    };

    let out = assess_loan(&policy, &request, &ctx, &mut rng);
    assert!(!out.dry_run);
    assert!(out.simulated_outcome.is_none());
    assert!(out.reasoning.iter().all(|r| !r.starts_with("DRY RUN")));
}

#[test]
fn test_dry_run_decision_matches_live_decision() {
    let policy = blue_chip_policy();
    let request = LoanRequest::new(PUNKS_ADDRESS, "1", 30.0, 40).with_floor_price(40.0);
    let live = AssessmentContext {
        market_regime: DEFAULT_MARKET_REGIME,
        dry_run: false,
    };
    let mut rng = StdRng::seed_from_u64(3);

    let a = assess_loan(&policy, &request, &live, &mut rng);
    let b = assess_loan(&policy, &request, &DRY_RUN, &mut rng);

    assert_eq!(a.approved, b.approved);
    assert_eq!(a.risk_score, b.risk_score);
    assert_eq!(a.recommended_ltv, b.recommended_ltv);
    assert_eq!(a.adjusted_apr, b.adjusted_apr);
    assert_eq!(a.max_loan_amount, b.max_loan_amount);
    assert_eq!(a.reasoning[..], b.reasoning[..a.reasoning.len()]);
}
