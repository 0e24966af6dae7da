//! truthlens - Claim-level hallucination scoring
//!
//! Takes a block of text (human- or AI-authored) and produces a
//! trustworthiness assessment: an overall score, a confidence value, a
//! hallucination-risk level and a per-claim breakdown.
//!
//! # Architecture
//!
//! Text flows through a fixed pipeline:
//! - The segmenter cuts the text into claims
//! - Each claim is scored by three independent heuristics (linguistic,
//!   semantic, factual)
//! - A fixed-weight ensemble turns the sub-scores into per-claim verdicts
//!   and a document-level result
//!
//! # Modules
//!
//! - `core`: Scoring engine (Segmenter, Scorers, Ensemble, Verifier)
//! - `domain`: Data structures (Claim, ClaimVerdict, VerificationResult)
//! - `server`: HTTP API
//! - `cli`: Command-line interface
//! - `config`: Layered configuration
//!
//! # Usage
//!
//! ```bash
//! # Check a sentence
//! truthlens check "The Eiffel Tower was completed in 1889."
//!
//! # Check a file, JSON output
//! truthlens check -i answer.txt --json
//!
//! # Serve the HTTP API
//! truthlens serve -a 127.0.0.1:8000
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;

// Re-export main types at crate root for convenience
pub use crate::core::{FactTable, InputLimits, Verifier, VerifyError};
pub use domain::{Claim, ClaimScore, ClaimVerdict, HallucinationRisk, VerificationResult};
