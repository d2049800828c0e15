//! Per-call request and decision values. Neither is stored by the engine.

use serde::{Deserialize, Serialize};

use crate::policy::DurationBucket;
use crate::risk::PenaltyCode;

/// A loan request against one unit of NFT collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub contract_address: String,
    pub token_id: String,
    /// Must be > 0.
    pub requested_amount: f64,
    /// Loan term in days, must be > 0.
    pub duration_days: u32,
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Current collateral valuation reference, > 0 when present.
    #[serde(default)]
    pub floor_price: Option<f64>,
}

impl LoanRequest {
    pub fn new(
        contract_address: impl Into<String>,
        token_id: impl Into<String>,
        requested_amount: f64,
        duration_days: u32,
    ) -> Self {
        Self {
            contract_address: contract_address.into(),
            token_id: token_id.into(),
            requested_amount,
            duration_days,
            collection_name: None,
            floor_price: None,
        }
    }

    pub fn with_floor_price(mut self, floor_price: f64) -> Self {
        self.floor_price = Some(floor_price);
        self
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

/// Advisory projection attached to every dry-run assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedOutcome {
    pub would_succeed: bool,
    /// Principal plus simple interest over the term.
    pub projected_repayment: f64,
    pub risk_factors: Vec<String>,
}

/// Underwriting decision for one [`LoanRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub approved: bool,
    /// Never above 0.85.
    pub recommended_ltv: f64,
    /// Never below 0.10.
    pub adjusted_apr: f64,
    pub max_loan_amount: f64,
    /// Sum of the points of every entry in `penalties`.
    pub risk_score: u32,
    pub tier: String,
    pub duration_bucket: DurationBucket,
    /// Ordered audit trail; evaluation order is significant.
    pub reasoning: Vec<String>,
    pub penalties: Vec<PenaltyCode>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_outcome: Option<SimulatedOutcome>,
}
