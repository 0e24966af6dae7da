//! Input Limits Integration Tests
//!
//! Tests for input-size limits, claim-count limits and denylist patterns.

use std::path::Path;
use std::sync::Arc;

use truthlens::core::{FactTable, InputLimits, LimitViolation};
use truthlens::{Verifier, VerifyError};

fn verifier_with(limits: InputLimits) -> Verifier {
    let facts = Arc::new(FactTable::bundled().unwrap());
    Verifier::with_facts(facts, limits).unwrap()
}

#[test]
fn test_max_input_chars() {
    let limits = InputLimits {
        max_input_chars: 100,
        ..Default::default()
    };

    // Input within limits
    let small_input = "x".repeat(50);
    assert!(limits.validate_input(&small_input, None).is_ok());

    // Input at exact limit
    let exact_input = "x".repeat(100);
    assert!(limits.validate_input(&exact_input, None).is_ok());

    // Input exceeding limit
    let large_input = "x".repeat(200);
    match limits.validate_input(&large_input, None) {
        Err(LimitViolation::InputTooLarge { actual, limit }) => {
            assert_eq!(actual, 200);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected InputTooLarge violation, got {:?}", other),
    }
}

#[test]
fn test_default_input_limit_is_ten_thousand_chars() {
    let verifier = verifier_with(InputLimits::default());

    let at_limit = format!("{}.", "a".repeat(9_999));
    assert!(verifier.verify(&at_limit).is_ok());

    let over_limit = "a".repeat(10_001);
    assert!(matches!(
        verifier.verify(&over_limit),
        Err(VerifyError::Limit(LimitViolation::InputTooLarge {
            actual: 10_001,
            limit: 10_000
        }))
    ));
}

#[test]
fn test_max_claims() {
    let verifier = verifier_with(InputLimits {
        max_claims: 3,
        ..Default::default()
    });

    assert!(verifier.verify("One is one. Two is two. Three is three.").is_ok());

    let err = verifier
        .verify("One is one. Two is two. Three is three. Four is four.")
        .unwrap_err();
    assert_eq!(
        err,
        VerifyError::Limit(LimitViolation::TooManyClaims {
            actual: 4,
            limit: 3
        })
    );
    assert!(err.is_client_error());
}

#[test]
fn test_denylist_patterns() {
    let limits = InputLimits::default();

    // Should match denylist
    assert!(limits.is_denylisted(".env"));
    assert!(limits.is_denylisted(".env.local"));
    assert!(limits.is_denylisted("project/.env"));
    assert!(limits.is_denylisted("secrets.yaml"));
    assert!(limits.is_denylisted("aws_credentials.json"));
    assert!(limits.is_denylisted("server.pem"));
    assert!(limits.is_denylisted("private.key"));

    // Should not match denylist
    assert!(!limits.is_denylisted("answer.txt"));
    assert!(!limits.is_denylisted("notes/essay.md"));
}

#[test]
fn test_custom_denylist() {
    let limits = InputLimits {
        denylist_patterns: vec!["**/drafts/**".to_string()],
        ..Default::default()
    };

    assert!(limits.check_path(Path::new("work/drafts/answer.txt")).is_err());
    assert!(limits.check_path(Path::new(".env")).is_ok());
}

#[test]
fn test_limits_from_yaml() {
    let limits: InputLimits = serde_yaml::from_str("max_claims: 5").unwrap();

    assert_eq!(limits.max_claims, 5);
    assert_eq!(limits.max_input_chars, 10_000);
    assert!(!limits.denylist_patterns.is_empty());
}
