//! Error taxonomy for the verification engine.

use thiserror::Error;

use super::limits::LimitViolation;

/// Errors produced by `verify` and its stages
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerifyError {
    /// No text supplied (empty or whitespace only)
    #[error("Text cannot be empty")]
    EmptyInput,

    /// A claim reached a scorer in a state the segmenter never produces
    #[error("Invalid claim at position {position}: {reason}")]
    InvalidClaim { position: usize, reason: String },

    /// Segmentation yielded nothing to aggregate
    #[error("No claims to aggregate")]
    EmptyClaimSet,

    /// Input rejected by the configured limits
    #[error(transparent)]
    Limit(#[from] LimitViolation),
}

impl VerifyError {
    /// True for failures the caller can fix by changing the input
    pub fn is_client_error(&self) -> bool {
        matches!(self, VerifyError::EmptyInput | VerifyError::Limit(_))
    }
}
