#![forbid(unsafe_code)]

pub mod loan;
pub mod policy;
pub mod risk;
pub mod simulation;

pub use loan::{LoanRequest, RiskAssessment, SimulatedOutcome};
pub use policy::RiskPolicy;
