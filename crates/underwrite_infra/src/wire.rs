//! JSON rendering for the host HTTP layer.

use underwrite_core::{LoanRequest, RiskAssessment};

use crate::status::StatusSummary;

pub fn parse_loan_request(body: &str) -> Result<LoanRequest, serde_json::Error> {
    serde_json::from_str(body)
}

pub fn render_assessment(assessment: &RiskAssessment) -> Result<String, serde_json::Error> {
    serde_json::to_string(assessment)
}

pub fn render_status(status: &StatusSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string(status)
}
