//! Document-level verification result.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::claim::ClaimVerdict;

/// The single artifact returned by one `verify` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    /// Mean of the per-claim confidences, in [0, 100]
    pub overall_score: f64,

    /// Document confidence, in [0, 100]
    pub confidence: f64,

    pub hallucination_risk: HallucinationRisk,

    /// Verdicts in source order
    pub claims: Vec<ClaimVerdict>,

    /// Wall-clock time spent in the pipeline
    #[serde(rename = "processing_time")]
    pub processing_time_seconds: f64,
}

impl VerificationResult {
    /// Number of claims that passed the verification threshold
    pub fn verified_count(&self) -> usize {
        self.claims.iter().filter(|c| c.verified).count()
    }
}

/// Categorical hallucination risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HallucinationRisk {
    Low,
    Medium,
    High,
}

impl HallucinationRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            HallucinationRisk::Low => "low",
            HallucinationRisk::Medium => "medium",
            HallucinationRisk::High => "high",
        }
    }
}

impl fmt::Display for HallucinationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Claim;

    #[test]
    fn test_result_wire_field_names() {
        let result = VerificationResult {
            overall_score: 91.5,
            confidence: 91.5,
            hallucination_risk: HallucinationRisk::Low,
            claims: vec![ClaimVerdict {
                claim: Claim::new("The Eiffel Tower was completed in 1889.", 0, 0),
                verified: true,
                confidence: 91.5,
                sources: 5,
            }],
            processing_time_seconds: 0.002,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overall_score"], 91.5);
        assert_eq!(json["confidence"], 91.5);
        assert_eq!(json["hallucination_risk"], "low");
        assert_eq!(json["processing_time"], 0.002);
        assert_eq!(json["claims"][0]["sources"], 5);
        assert_eq!(result.verified_count(), 1);
    }

    #[test]
    fn test_risk_display() {
        assert_eq!(HallucinationRisk::Medium.to_string(), "medium");
        assert_eq!(
            serde_json::to_string(&HallucinationRisk::High).unwrap(),
            "\"high\""
        );
    }
}
