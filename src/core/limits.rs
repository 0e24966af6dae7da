//! Input limits applied before and after segmentation.
//!
//! Keeps a single request bounded through configurable limits on:
//! - Input length (in characters)
//! - Number of claims after segmentation
//! - Denylist patterns for input files (to avoid scoring secrets)

use std::path::Path;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits for a single verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum input length in characters (default: 10,000)
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Maximum number of claims per request (default: 100)
    #[serde(default = "default_max_claims")]
    pub max_claims: usize,

    /// Glob patterns to reject (input files matching these won't be read)
    #[serde(default = "default_denylist")]
    pub denylist_patterns: Vec<String>,
}

fn default_max_input_chars() -> usize {
    10_000
}
fn default_max_claims() -> usize {
    100
}

fn default_denylist() -> Vec<String> {
    vec![
        "**/.env*".to_string(),
        "**/secrets*".to_string(),
        "**/*credential*".to_string(),
        "**/*.pem".to_string(),
        "**/*.key".to_string(),
    ]
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            max_claims: default_max_claims(),
            denylist_patterns: default_denylist(),
        }
    }
}

impl InputLimits {
    /// Check if an input path matches any denylist pattern
    pub fn is_denylisted(&self, path: &str) -> bool {
        self.denylist_patterns
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|pattern| pattern.matches(path))
    }

    /// Validate input text against the length limit and its source path against the denylist
    pub fn validate_input(&self, input: &str, source_path: Option<&Path>) -> Result<(), LimitViolation> {
        let chars = input.chars().count();
        if chars > self.max_input_chars {
            return Err(LimitViolation::InputTooLarge {
                actual: chars,
                limit: self.max_input_chars,
            });
        }

        if let Some(path) = source_path {
            self.check_path(path)?;
        }

        Ok(())
    }

    /// Reject denylisted input files before they are read
    pub fn check_path(&self, path: &Path) -> Result<(), LimitViolation> {
        let path_str = path.to_string_lossy();
        if self.is_denylisted(&path_str) {
            return Err(LimitViolation::DenylistMatch {
                path: path_str.to_string(),
            });
        }
        Ok(())
    }

    /// Validate the number of segmented claims
    pub fn check_claims(&self, count: usize) -> Result<(), LimitViolation> {
        if count > self.max_claims {
            return Err(LimitViolation::TooManyClaims {
                actual: count,
                limit: self.max_claims,
            });
        }
        Ok(())
    }
}

/// Limit violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitViolation {
    #[error("Input too large: {actual} chars > {limit} chars")]
    InputTooLarge { actual: usize, limit: usize },

    #[error("Too many claims: {actual} > {limit}")]
    TooManyClaims { actual: usize, limit: usize },

    #[error("Path matches denylist pattern: {path}")]
    DenylistMatch { path: String },
}
