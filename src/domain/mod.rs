//! Domain types for the verification engine.
//!
//! This module contains the core data structures:
//! - Claim: An atomic assertion cut from the input text
//! - ClaimScore / ClaimVerdict: Per-claim scoring records
//! - VerificationResult: The document-level verdict

pub mod claim;
pub mod result;

// Re-export commonly used types
pub use claim::{Claim, ClaimScore, ClaimVerdict};
pub use result::{HallucinationRisk, VerificationResult};
