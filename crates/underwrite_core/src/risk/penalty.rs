//! Registry of risk-score contributions.

use serde::Serialize;

/// A single explicit penalty term folded into `risk_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PenaltyCode {
    CollectionNotWhitelisted,
    AmountExceedsMax,
    LtvExceedsRecommended,
    InvalidRequest,
}

impl PenaltyCode {
    pub fn as_str(self) -> &'static str {
        match self {
            PenaltyCode::CollectionNotWhitelisted => "CollectionNotWhitelisted",
            PenaltyCode::AmountExceedsMax => "AmountExceedsMax",
            PenaltyCode::LtvExceedsRecommended => "LtvExceedsRecommended",
            PenaltyCode::InvalidRequest => "InvalidRequest",
        }
    }

    /// Points added to the risk score.
    pub fn points(self) -> u32 {
        match self {
            PenaltyCode::CollectionNotWhitelisted => 50,
            PenaltyCode::AmountExceedsMax => 25,
            PenaltyCode::LtvExceedsRecommended => 30,
            PenaltyCode::InvalidRequest => 100,
        }
    }
}

const REGISTRY: &[PenaltyCode] = &[
    PenaltyCode::CollectionNotWhitelisted,
    PenaltyCode::AmountExceedsMax,
    PenaltyCode::LtvExceedsRecommended,
    PenaltyCode::InvalidRequest,
];

pub fn penalty_registry() -> &'static [PenaltyCode] {
    REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tokens_are_unique() {
        let mut names: Vec<&str> = penalty_registry().iter().map(|p| p.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), penalty_registry().len());
    }
}
