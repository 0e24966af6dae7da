//! Ensemble aggregation: sub-scores -> per-claim verdicts -> document result.

use std::time::Duration;

use serde::Serialize;

use super::error::VerifyError;
use crate::domain::{ClaimScore, ClaimVerdict, HallucinationRisk, VerificationResult};

/// Fixed ensemble weights; they sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnsembleWeights {
    pub linguistic: f64,
    pub semantic: f64,
    pub factual: f64,
}

pub const WEIGHTS: EnsembleWeights = EnsembleWeights {
    linguistic: 0.30,
    semantic: 0.40,
    factual: 0.30,
};

/// Claims at or above this confidence are verified (inclusive)
pub const VERIFIED_THRESHOLD: f64 = 60.0;

/// Overall scores at or above this are low risk (inclusive)
pub const LOW_RISK_THRESHOLD: f64 = 80.0;

/// Overall scores at or above this (and below low) are medium risk (inclusive)
pub const MEDIUM_RISK_THRESHOLD: f64 = VERIFIED_THRESHOLD;

impl EnsembleWeights {
    /// Weighted confidence in [0, 100], before rounding
    pub fn combine(&self, linguistic: f64, semantic: f64, factual: f64) -> f64 {
        100.0 * (self.linguistic * linguistic + self.semantic * semantic + self.factual * factual)
    }
}

impl HallucinationRisk {
    /// Bucket an overall score
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= LOW_RISK_THRESHOLD {
            HallucinationRisk::Low
        } else if overall_score >= MEDIUM_RISK_THRESHOLD {
            HallucinationRisk::Medium
        } else {
            HallucinationRisk::High
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Turn one claim's sub-scores into its verdict
pub fn judge(score: ClaimScore) -> ClaimVerdict {
    let raw = WEIGHTS.combine(score.linguistic, score.semantic, score.factual);
    let confidence = round1(raw.clamp(0.0, 100.0));

    ClaimVerdict {
        claim: score.claim,
        verified: confidence >= VERIFIED_THRESHOLD,
        confidence,
        sources: score.sources_matched,
    }
}

/// Combine verdicts (in source order) into the document-level result
pub fn aggregate(
    verdicts: Vec<ClaimVerdict>,
    elapsed: Duration,
) -> Result<VerificationResult, VerifyError> {
    if verdicts.is_empty() {
        return Err(VerifyError::EmptyClaimSet);
    }

    let total: f64 = verdicts.iter().map(|v| v.confidence).sum();
    let overall_score = round1(total / verdicts.len() as f64);

    Ok(VerificationResult {
        overall_score,
        confidence: overall_score,
        hallucination_risk: HallucinationRisk::from_score(overall_score),
        claims: verdicts,
        processing_time_seconds: elapsed.as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Claim;

    fn claim_score(linguistic: f64, semantic: f64, factual: f64, sources: u32) -> ClaimScore {
        ClaimScore {
            claim: Claim::new("A claim under test.", 0, 0),
            linguistic,
            semantic,
            factual,
            sources_matched: sources,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = WEIGHTS.linguistic + WEIGHTS.semantic + WEIGHTS.factual;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_judge_scenarios() {
        let a = judge(claim_score(0.85, 0.90, 1.0, 5));
        assert_eq!(a.confidence, 91.5);
        assert!(a.verified);
        assert_eq!(a.sources, 5);

        let b = judge(claim_score(0.75, 0.30, 0.20, 0));
        assert_eq!(b.confidence, 40.5);
        assert!(!b.verified);

        let c = judge(claim_score(0.50, 0.90, 0.45, 0));
        assert_eq!(c.confidence, 64.5);
        assert!(c.verified);
    }

    #[test]
    fn test_verified_boundary_is_inclusive() {
        // 100 * (0.3 * 0.6 + 0.4 * 0.6 + 0.3 * 0.6) = 60.0
        let v = judge(claim_score(0.6, 0.6, 0.6, 0));
        assert_eq!(v.confidence, 60.0);
        assert!(v.verified);

        let v = judge(claim_score(0.6, 0.6, 0.59, 0));
        assert!(v.confidence < 60.0);
        assert!(!v.verified);
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(HallucinationRisk::from_score(100.0), HallucinationRisk::Low);
        assert_eq!(HallucinationRisk::from_score(80.0), HallucinationRisk::Low);
        assert_eq!(HallucinationRisk::from_score(79.9), HallucinationRisk::Medium);
        assert_eq!(HallucinationRisk::from_score(60.0), HallucinationRisk::Medium);
        assert_eq!(HallucinationRisk::from_score(59.9), HallucinationRisk::High);
        assert_eq!(HallucinationRisk::from_score(0.0), HallucinationRisk::High);
    }

    #[test]
    fn test_aggregate_mean() {
        let verdicts = vec![
            judge(claim_score(0.85, 0.90, 1.0, 5)),
            judge(claim_score(0.75, 0.30, 0.20, 0)),
        ];
        let result = aggregate(verdicts, Duration::from_millis(3)).unwrap();

        assert_eq!(result.overall_score, 66.0);
        assert_eq!(result.confidence, result.overall_score);
        assert_eq!(result.hallucination_risk, HallucinationRisk::Medium);
        assert_eq!(result.claims.len(), 2);
        assert!((result.processing_time_seconds - 0.003).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_fails() {
        assert_eq!(
            aggregate(Vec::new(), Duration::ZERO),
            Err(VerifyError::EmptyClaimSet)
        );
    }
}
