//! Verification pipeline.
//!
//! Runs text through the segmenter, the three scorers and the ensemble to
//! produce one `VerificationResult`. A `Verifier` is immutable after
//! construction and can be shared across tasks behind an `Arc`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use super::ensemble::{aggregate, judge};
use super::error::VerifyError;
use super::facts::FactTable;
use super::factual::{FactualScore, FactualScorer};
use super::limits::InputLimits;
use super::linguistic::LinguisticScorer;
use super::segmenter::segment;
use super::semantic::SemanticScorer;
use crate::domain::{Claim, ClaimScore, VerificationResult};

/// The claim verification engine
#[derive(Debug, Clone)]
pub struct Verifier {
    linguistic: LinguisticScorer,
    semantic: SemanticScorer,
    factual: FactualScorer,
    limits: InputLimits,
}

impl Verifier {
    /// Create a verifier over the bundled fact table with default limits
    pub fn new() -> Result<Self> {
        let facts = FactTable::bundled()?;
        Self::with_facts(Arc::new(facts), InputLimits::default())
    }

    /// Create a verifier over a specific fact table and limits
    pub fn with_facts(facts: Arc<FactTable>, limits: InputLimits) -> Result<Self> {
        let linguistic = LinguisticScorer::new().context("Failed to build linguistic scorer")?;
        let semantic = SemanticScorer::new().context("Failed to build semantic scorer")?;
        let factual = FactualScorer::new(facts, linguistic.hedges().clone())
            .context("Failed to compile fact table matchers")?;

        Ok(Self {
            linguistic,
            semantic,
            factual,
            limits,
        })
    }

    /// Verify a block of text
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub fn verify(&self, text: &str) -> Result<VerificationResult, VerifyError> {
        self.verify_source(text, None)
    }

    /// Verify text read from `source`, checking the path against the denylist
    pub fn verify_source(
        &self,
        text: &str,
        source: Option<&Path>,
    ) -> Result<VerificationResult, VerifyError> {
        let started = Instant::now();

        if text.trim().is_empty() {
            return Err(VerifyError::EmptyInput);
        }
        self.limits.validate_input(text, source)?;

        let claims = segment(text)?;
        self.limits.check_claims(claims.len())?;
        debug!(claims = claims.len(), "Segmented input");

        let verdicts = claims
            .into_iter()
            .map(|claim| self.score_claim(claim).map(judge))
            .collect::<Result<Vec<_>, _>>()?;

        let result = aggregate(verdicts, started.elapsed())?;
        info!(
            claims = result.claims.len(),
            verified = result.verified_count(),
            overall_score = result.overall_score,
            risk = %result.hallucination_risk,
            "Verification complete"
        );

        Ok(result)
    }

    /// Run the three scorers over one claim
    pub fn score_claim(&self, claim: Claim) -> Result<ClaimScore, VerifyError> {
        let linguistic = self.linguistic.score(&claim)?;
        let semantic = self.semantic.score(&claim)?;
        let FactualScore {
            score: factual,
            sources,
            matched,
            contradicted,
        } = self.factual.score(&claim)?;

        debug!(
            position = claim.position,
            linguistic,
            semantic,
            factual,
            ?matched,
            ?contradicted,
            "Scored claim"
        );

        Ok(ClaimScore {
            claim,
            linguistic,
            semantic,
            factual,
            sources_matched: sources,
        })
    }

    /// Implausibility flags the semantic scorer raises for `text`
    pub fn semantic_flags(&self, text: &str) -> Vec<&'static str> {
        self.semantic.flags(text)
    }

    /// The fact table in use
    pub fn facts(&self) -> &Arc<FactTable> {
        self.factual.table()
    }

    /// The limits applied to every request
    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }
}
