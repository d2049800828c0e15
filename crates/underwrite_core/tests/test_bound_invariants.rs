//! Hard-bound invariants over arbitrary (unvalidated) policy terms and
//! requests.

mod common;

use common::{PUNKS_ADDRESS, UNLISTED_ADDRESS, blue_chip_policy};
use proptest::prelude::*;
use underwrite_core::LoanRequest;
use underwrite_core::policy::MarketConditionPolicy;
use underwrite_core::risk::{
    APPROVAL_RISK_THRESHOLD, LOAN_AMOUNT_HEADROOM, MAX_RECOMMENDED_LTV, MIN_ADJUSTED_APR,
    assess_loan_in_regime,
};

proptest! {
    #[test]
    fn prop_bounds_hold_for_any_terms(
        max_ltv in -0.5f64..2.0,
        base_apr in -0.5f64..1.5,
        ltv_adjustment in -1.0f64..1.0,
        apr_adjustment in -1.0f64..1.0,
        max_loan in 0.0f64..1_000.0,
        amount in 0.001f64..2_000.0,
        duration in 0u32..400,
        floor in proptest::option::of(0.001f64..5_000.0),
        listed in any::<bool>(),
    ) {
        let mut policy = blue_chip_policy();
        if let Some(punks) = policy.collections.get_mut("cryptopunks") {
            punks.max_ltv = max_ltv;
            punks.base_apr = base_apr;
            punks.max_loan_amount = max_loan;
        }
        policy.market_conditions.insert(
            "stress".to_string(),
            MarketConditionPolicy {
                ltv_adjustment,
                apr_adjustment,
                ..MarketConditionPolicy::default()
            },
        );
        let address = if listed { PUNKS_ADDRESS } else { UNLISTED_ADDRESS };
        let mut request = LoanRequest::new(address, "1", amount, duration);
        request.floor_price = floor;

        let out = assess_loan_in_regime(&policy, &request, "stress");

        prop_assert!(out.recommended_ltv >= 0.0 && out.recommended_ltv <= MAX_RECOMMENDED_LTV);
        prop_assert!(out.adjusted_apr >= MIN_ADJUSTED_APR);
        prop_assert!(!out.reasoning.is_empty());

        let points: u32 = out.penalties.iter().map(|p| p.points()).sum();
        prop_assert_eq!(out.risk_score, points);
        if out.risk_score >= APPROVAL_RISK_THRESHOLD || !listed {
            prop_assert!(!out.approved);
        }
        if !listed {
            prop_assert_eq!(out.tier.as_str(), "unknown");
        }
        let policy_max = if listed {
            max_loan
        } else {
            policy.default_terms().map(|t| t.max_loan_amount).unwrap_or(0.0)
        };
        prop_assert_eq!(out.max_loan_amount, policy_max.min(amount * LOAN_AMOUNT_HEADROOM));
    }
}
