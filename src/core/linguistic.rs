//! Linguistic scorer: how confidently and concretely a claim is worded.
//!
//! Score = base, plus a small bonus for certainty markers, plus a bonus per
//! concrete detail (year, measurement, named entity), minus a penalty when
//! any hedging marker is present. Clamped to [0, 1].

use regex::Regex;

use super::error::VerifyError;
use super::ensure_scorable;
use crate::domain::Claim;

const BASE_SCORE: f64 = 0.50;
const CERTAINTY_BONUS: f64 = 0.05;
const DETAIL_BONUS: f64 = 0.10;
const HEDGE_PENALTY: f64 = 0.20;
const SHORT_CLAIM_PENALTY: f64 = 0.15;
const SHORT_CLAIM_WORDS: usize = 5;

const HEDGE_PATTERNS: &[&str] = &[
    r"(?i)\b(might|could|perhaps|possibly|probably|maybe|allegedly|supposedly|reportedly|presumably|apparently|sometime)\b",
    // Case-sensitive so the month "May" is not a hedge
    r"\bmay\b",
    r"(?i)\bsome (sources|people|experts|reports|historians) (suggest|say|claim|believe)",
    r"(?i)\bit is (believed|rumou?red|said|thought)\b",
    r"(?i)\b(seems|appears) to\b",
    r"(?i)\b(rumou?red|unconfirmed|speculated)\b",
];

const CERTAINTY_PATTERN: &str =
    r"(?i)\b(is|was|are|were|stands|has|had|remains|definitely|certainly|confirmed|proven)\b";

const YEAR_PATTERN: &str = r"\b(1[0-9]{3}|20[0-9]{2})\b";

const MEASUREMENT_PATTERN: &str = r"(?i)\b\d[\d,]*(?:\.\d+)?\s*(?:%|percent\b|(?:mm|cm|m|km|meters?|metres?|kilometers?|kilometres?|feet|foot|ft|miles?|inches|kg|g|grams?|kilograms?|tons?|tonnes?|pounds?|lbs?|degrees?|years?|days?|hours?|minutes?|seconds?|people|million|billion)\b)";

/// Words that open a sentence without being part of a name
const LEADING_STOPWORDS: &[&str] = &["The", "A", "An", "In", "On", "At", "This", "That", "It", "Its"];

/// Lowercase words allowed inside a multi-word name ("Statue of Liberty")
const NAME_CONNECTORS: &[&str] = &["of", "de", "da", "del", "von", "van", "the"];

/// Detects hedging language
#[derive(Debug, Clone)]
pub struct HedgeDetector {
    patterns: Vec<Regex>,
}

impl HedgeDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = HEDGE_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True when at least one hedging marker appears
    pub fn is_hedged(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// Surface features the linguistic score is computed from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinguisticFeatures {
    pub words: usize,
    pub hedged: bool,
    pub certain: bool,
    pub years: usize,
    pub measurements: usize,
    pub named_entities: usize,
}

impl LinguisticFeatures {
    /// Count of concrete, falsifiable details
    pub fn details(&self) -> usize {
        self.years + self.measurements + self.named_entities
    }
}

/// Heuristic certainty/hedging scorer
#[derive(Debug, Clone)]
pub struct LinguisticScorer {
    hedges: HedgeDetector,
    certainty: Regex,
    year: Regex,
    measurement: Regex,
}

impl LinguisticScorer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            hedges: HedgeDetector::new()?,
            certainty: Regex::new(CERTAINTY_PATTERN)?,
            year: Regex::new(YEAR_PATTERN)?,
            measurement: Regex::new(MEASUREMENT_PATTERN)?,
        })
    }

    /// Shared hedge detector (the factual scorer reuses it)
    pub fn hedges(&self) -> &HedgeDetector {
        &self.hedges
    }

    /// Score a claim in [0, 1]; higher means more confidently and concretely stated
    pub fn score(&self, claim: &Claim) -> Result<f64, VerifyError> {
        ensure_scorable(claim)?;
        let features = self.features(&claim.text);

        let mut score = BASE_SCORE;
        if features.certain {
            score += CERTAINTY_BONUS;
        }
        score += DETAIL_BONUS * features.details() as f64;
        if features.hedged {
            score -= HEDGE_PENALTY;
        }
        if features.words < SHORT_CLAIM_WORDS {
            score -= SHORT_CLAIM_PENALTY;
        }

        Ok(score.clamp(0.0, 1.0))
    }

    /// Extract the features used by `score`
    pub fn features(&self, text: &str) -> LinguisticFeatures {
        let measurement_spans: Vec<(usize, usize)> = self
            .measurement
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        // A year that is really a quantity ("1083 feet") counts once, as a measurement
        let years = self
            .year
            .find_iter(text)
            .filter(|m| {
                !measurement_spans
                    .iter()
                    .any(|(s, e)| m.start() >= *s && m.end() <= *e)
            })
            .count();

        LinguisticFeatures {
            words: text.split_whitespace().count(),
            hedged: self.hedges.is_hedged(text),
            certain: self.certainty.is_match(text),
            years,
            measurements: measurement_spans.len(),
            named_entities: count_named_entities(text),
        }
    }
}

/// Count runs of capitalized words ("Eiffel Tower", "Statue of Liberty")
fn count_named_entities(text: &str) -> usize {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let is_capitalized = |t: &str| {
        let mut chars = t.chars();
        matches!(chars.next(), Some(c) if c.is_uppercase()) && chars.next().is_some()
    };

    let mut count = 0;
    let mut i = 0;
    while i < tokens.len() {
        if !is_capitalized(tokens[i]) {
            i += 1;
            continue;
        }

        let run_start = i;
        let mut run_end = i + 1;
        loop {
            if run_end < tokens.len() && is_capitalized(tokens[run_end]) {
                run_end += 1;
            } else if run_end + 1 < tokens.len()
                && NAME_CONNECTORS.contains(&tokens[run_end])
                && is_capitalized(tokens[run_end + 1])
            {
                run_end += 2;
            } else {
                break;
            }
        }

        let mut run = &tokens[run_start..run_end];
        if run_start == 0 {
            // Sentence-initial capitals only count when the run is clearly a name
            while let Some((first, rest)) = run.split_first() {
                if LEADING_STOPWORDS.contains(first) {
                    run = rest;
                } else {
                    break;
                }
            }
            if run.len() >= 2 || (run.len() == 1 && run_end - run_start > 1) {
                count += 1;
            }
        } else {
            count += 1;
        }

        i = run_end;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LinguisticScorer {
        LinguisticScorer::new().unwrap()
    }

    fn score(text: &str) -> f64 {
        scorer().score(&Claim::new(text, 0, 0)).unwrap()
    }

    #[test]
    fn test_concrete_claim_features() {
        let f = scorer().features("The Eiffel Tower was completed in 1889 and stands at 330 meters tall.");
        assert!(f.certain);
        assert!(!f.hedged);
        assert_eq!(f.years, 1);
        assert_eq!(f.measurements, 1);
        assert_eq!(f.named_entities, 1);
    }

    #[test]
    fn test_concrete_claim_score() {
        let s = score("The Eiffel Tower was completed in 1889 and stands at 330 meters tall.");
        assert!((s - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_hedging_penalty() {
        let s = score("The Eiffel Tower might have been built sometime around 1899.");
        assert!((s - 0.50).abs() < 1e-9);
    }

    #[test]
    fn test_hedge_detector() {
        let hedges = HedgeDetector::new().unwrap();
        assert!(hedges.is_hedged("Some sources suggest it opened early"));
        assert!(hedges.is_hedged("It may be older"));
        assert!(!hedges.is_hedged("It opened in May 1937"));
        assert!(!hedges.is_hedged("The bridge opened in 1937"));
    }

    #[test]
    fn test_year_inside_measurement_counted_once() {
        let f = scorer().features("The tower rises 1083 feet above the river");
        assert_eq!(f.measurements, 1);
        assert_eq!(f.years, 0);
    }

    #[test]
    fn test_named_entity_runs() {
        assert_eq!(count_named_entities("The Statue of Liberty faces Brooklyn"), 2);
        assert_eq!(count_named_entities("Paris is lovely"), 0);
        assert_eq!(count_named_entities("I think it rained"), 0);
        assert_eq!(count_named_entities("New York is large"), 1);
    }

    #[test]
    fn test_short_claim_penalty_and_clamp() {
        assert!((score("It rained.") - 0.35).abs() < 1e-9);

        let s = score("Maybe.");
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_empty_claim_is_invalid() {
        let err = scorer().score(&Claim::new("   ", 3, 0)).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidClaim { position: 3, .. }));
    }
}
