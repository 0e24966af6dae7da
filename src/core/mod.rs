//! Core verification engine.
//!
//! This module contains:
//! - Segmenter: Splits text into claims
//! - Scorers: Linguistic, semantic and factual heuristics
//! - Facts: The authority-fact table
//! - Ensemble: Weighted combination and document aggregation
//! - Verifier: The end-to-end pipeline

pub mod ensemble;
pub mod error;
pub mod facts;
pub mod factual;
pub mod limits;
pub mod linguistic;
pub mod segmenter;
pub mod semantic;
pub mod verifier;

use crate::domain::Claim;

// Re-export commonly used types
pub use ensemble::{
    aggregate, judge, EnsembleWeights, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
    VERIFIED_THRESHOLD, WEIGHTS,
};
pub use error::VerifyError;
pub use facts::{Accepted, EntityFacts, Fact, FactKind, FactTable};
pub use factual::{FactualScore, FactualScorer};
pub use limits::{InputLimits, LimitViolation};
pub use linguistic::{HedgeDetector, LinguisticFeatures, LinguisticScorer};
pub use segmenter::segment;
pub use semantic::SemanticScorer;
pub use verifier::Verifier;

/// Scorers only accept claims with text
pub(crate) fn ensure_scorable(claim: &Claim) -> Result<(), VerifyError> {
    if claim.text.trim().is_empty() {
        return Err(VerifyError::InvalidClaim {
            position: claim.position,
            reason: "empty text".to_string(),
        });
    }
    Ok(())
}
