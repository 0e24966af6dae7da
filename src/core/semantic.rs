//! Semantic consistency scorer.
//!
//! Flags claims that describe physically implausible or self-contradictory
//! situations by matching a small table of known-implausible patterns. No
//! flag yields a high default score; each distinct flag subtracts a fixed
//! penalty. This is a coarse stand-in for contradiction detection and trades
//! recall for having no model to load.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use super::error::VerifyError;
use super::ensure_scorable;
use crate::domain::Claim;

const DEFAULT_SCORE: f64 = 0.90;
const FLAG_PENALTY: f64 = 0.60;
const REPETITION_PENALTY: f64 = 0.10;
const REPETITION_MIN_WORDS: usize = 6;
const REPETITION_MIN_UNIQUE_RATIO: f64 = 0.5;

/// (flag, pattern) pairs describing implausible predicates
const IMPLAUSIBLE_PATTERNS: &[(&str, &str)] = &[
    (
        "edible_material",
        r"(?i)\bmade (?:entirely |completely |wholly |purely )?(?:out )?of (?:solid )?(?:chocolate|candy|cheese|ice cream|jelly|marshmallows?|cake|butter|sugar|gingerbread|cotton candy)\b",
    ),
    (
        "seasonal_melting",
        r"(?i)\bmelts? (?:away )?every (?:summer|winter|day|year|night)\b",
    ),
    (
        "levitation",
        r"(?i)\b(?:levitates|hovers in mid-?air|floats (?:in|through) the (?:air|sky)|flies (?:on its own|through the sky))\b",
    ),
    // Taller than any mountain on Earth
    (
        "impossible_height",
        r"(?i)\b(?:\d{2,3},\d{3}|\d{5,})\s*(?:meters|metres|m)\s+tall\b",
    ),
    (
        "impossible_height",
        r"(?i)\b(?:[3-9]\d,\d{3}|\d{3},\d{3}|[3-9]\d{4}|\d{6,})\s*(?:feet|ft)\s+tall\b",
    ),
    (
        "superhuman_lifespan",
        r"(?i)\b(?:lived|lives|live) (?:to (?:be |the age of )?|for )(?:1[3-9]\d|[2-9]\d\d|\d{4,})\b",
    ),
    (
        "absolute_efficacy",
        r"(?i)(?:\b(?:always works|never fails|100% (?:guaranteed|effective|accurate|certain)|cures (?:all|every) (?:diseases?|illness(?:es)?)|everyone agrees|nobody knows|completely impossible)\b|\b1000%)",
    ),
    (
        "moon_visibility",
        r"(?i)\bvisible (?:with the naked eye )?from the moon\b",
    ),
];

/// Word pairs that contradict each other inside one claim
const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("never", "sometimes"),
    ("always", "occasionally"),
    ("impossible", "possible"),
    ("everyone", "nobody"),
    ("everything", "nothing"),
];

/// An event verb bound to a year ("built in 1889")
const DATED_EVENT_PATTERN: &str = r"(?i)\b(built|completed|finished|founded|established|constructed|erected|opened|launched|born|died|sank|landed)\b(?:\s+\S+){0,3}?\s+(\d{4})\b";

/// Heuristic implausibility scorer
#[derive(Debug, Clone)]
pub struct SemanticScorer {
    implausible: Vec<(&'static str, Regex)>,
    dated_event: Regex,
}

impl SemanticScorer {
    pub fn new() -> Result<Self, regex::Error> {
        let implausible = IMPLAUSIBLE_PATTERNS
            .iter()
            .map(|(flag, pattern)| Regex::new(pattern).map(|re| (*flag, re)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            implausible,
            dated_event: Regex::new(DATED_EVENT_PATTERN)?,
        })
    }

    /// Score a claim in [0, 1]; higher means internally plausible
    pub fn score(&self, claim: &Claim) -> Result<f64, VerifyError> {
        ensure_scorable(claim)?;

        let flags = self.flags(&claim.text);
        let mut score = DEFAULT_SCORE - FLAG_PENALTY * flags.len() as f64;
        if is_repetitive(&claim.text) {
            score -= REPETITION_PENALTY;
        }

        Ok(score.clamp(0.0, 1.0))
    }

    /// Distinct implausibility flags raised by the text, in table order
    pub fn flags(&self, text: &str) -> Vec<&'static str> {
        let mut flags: Vec<&'static str> = Vec::new();
        let mut push = |flag: &'static str| {
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        };

        for (flag, re) in &self.implausible {
            if re.is_match(text) {
                push(*flag);
            }
        }
        if has_antonym_pair(text) {
            push("contradictory_terms");
        }
        if self.has_conflicting_dates(text) {
            push("conflicting_dates");
        }

        flags
    }

    /// The same event verb bound to two different years
    fn has_conflicting_dates(&self, text: &str) -> bool {
        let mut years_by_event: HashMap<String, HashSet<&str>> = HashMap::new();
        for caps in self.dated_event.captures_iter(text) {
            if let (Some(verb), Some(year)) = (caps.get(1), caps.get(2)) {
                years_by_event
                    .entry(verb.as_str().to_lowercase())
                    .or_default()
                    .insert(year.as_str());
            }
        }
        years_by_event.values().any(|years| years.len() > 1)
    }
}

fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn has_antonym_pair(text: &str) -> bool {
    let words: HashSet<String> = lowercase_words(text).into_iter().collect();
    ANTONYM_PAIRS
        .iter()
        .any(|(a, b)| words.contains(*a) && words.contains(*b))
}

/// Heavily repeated wording (few unique words)
fn is_repetitive(text: &str) -> bool {
    let words = lowercase_words(text);
    if words.len() < REPETITION_MIN_WORDS {
        return false;
    }
    let unique: HashSet<&String> = words.iter().collect();
    (unique.len() as f64 / words.len() as f64) < REPETITION_MIN_UNIQUE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SemanticScorer {
        SemanticScorer::new().unwrap()
    }

    fn score(text: &str) -> f64 {
        scorer().score(&Claim::new(text, 0, 0)).unwrap()
    }

    #[test]
    fn test_plausible_claim_gets_default() {
        let s = score("The Eiffel Tower was completed in 1889 and stands at 330 meters tall.");
        assert!((s - DEFAULT_SCORE).abs() < 1e-9);
    }

    #[test]
    fn test_chocolate_tower_flagged() {
        let text = "The Eiffel Tower was built in 1920 and is made entirely of chocolate.";
        assert_eq!(scorer().flags(text), vec!["edible_material"]);
        assert!((score(text) - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_flags_clamp_to_zero() {
        let text = "The tower is made of chocolate and melts every summer.";
        assert_eq!(scorer().flags(text).len(), 2);
        assert_eq!(score(text), 0.0);
    }

    #[test]
    fn test_conflicting_dates() {
        let s = scorer();
        assert!(s
            .flags("The bridge was opened in 1937 and opened again in 1950.")
            .contains(&"conflicting_dates"));
        assert!(s
            .flags("The wall was built in 1961 and fell in 1989.")
            .is_empty());
    }

    #[test]
    fn test_impossible_height_threshold() {
        let s = scorer();
        assert!(s.flags("The tower is 12,000 meters tall.").contains(&"impossible_height"));
        assert!(s.flags("The Burj Khalifa is 2,717 feet tall.").is_empty());
        assert!(s.flags("Everest is 8,849 meters tall.").is_empty());
    }

    #[test]
    fn test_antonyms_and_exaggeration() {
        let s = scorer();
        assert!(s
            .flags("It never rains here but sometimes it pours.")
            .contains(&"contradictory_terms"));
        assert!(s
            .flags("This remedy always works and is 1000% safe.")
            .contains(&"absolute_efficacy"));
        assert!(s.flags("It is possible to climb in winter.").is_empty());
    }

    #[test]
    fn test_repetition_penalty() {
        let s = score("very very very very very big big tower");
        assert!((s - 0.80).abs() < 1e-9);
    }
}
