//! Claims and their per-claim scoring records.
//!
//! A Claim is created once by the segmenter and only ever read afterwards.
//! Each claim produces exactly one ClaimScore, which in turn yields exactly
//! one ClaimVerdict.

use serde::{Serialize, Serializer};

/// An atomic factual assertion extracted from the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Trimmed claim text
    pub text: String,

    /// Ordinal index of the claim in the source (0-based)
    pub position: usize,

    /// UTF-8 byte offset of the claim's first character in the source
    pub offset: usize,
}

impl Claim {
    /// Create a new claim
    pub fn new(text: impl Into<String>, position: usize, offset: usize) -> Self {
        Self {
            text: text.into(),
            position,
            offset,
        }
    }

    /// Byte range of the claim in the source text
    pub fn span(&self) -> (usize, usize) {
        (self.offset, self.offset + self.text.len())
    }
}

/// Raw sub-model scores for one claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimScore {
    pub claim: Claim,

    /// Certainty / concreteness of the wording, in [0, 1]
    pub linguistic: f64,

    /// Internal plausibility, in [0, 1]
    pub semantic: f64,

    /// Agreement with the fact table, in [0, 1]
    pub factual: f64,

    /// Sources behind the best matched fact (0 when nothing matched)
    pub sources_matched: u32,
}

/// Final judgement for one claim
///
/// Serializes to the wire shape `{ claim, verified, confidence, sources }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimVerdict {
    #[serde(serialize_with = "serialize_claim_text")]
    pub claim: Claim,

    pub verified: bool,

    /// Ensemble confidence, in [0, 100], one decimal
    pub confidence: f64,

    pub sources: u32,
}

fn serialize_claim_text<S: Serializer>(claim: &Claim, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&claim.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_span() {
        let claim = Claim::new("Water boils at 100 degrees.", 2, 40);
        assert_eq!(claim.span(), (40, 67));
        assert_eq!(claim.position, 2);
    }

    #[test]
    fn test_verdict_wire_shape() {
        let verdict = ClaimVerdict {
            claim: Claim::new("The sky is blue.", 0, 0),
            verified: true,
            confidence: 72.5,
            sources: 0,
        };

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["claim"], "The sky is blue.");
        assert_eq!(json["verified"], true);
        assert_eq!(json["confidence"], 72.5);
        assert_eq!(json["sources"], 0);
        assert!(json.get("position").is_none());
    }
}
