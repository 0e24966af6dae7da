//! Factual scorer: compares what a claim asserts against the fact table.
//!
//! A fact is *asserted* by a claim when the claim mentions the entity (name
//! or alias), uses one of the fact's trigger words, and states a value of the
//! fact's kind. Asserted values inside the accepted range are matches;
//! anything else is a contradiction. Hedged claims never contradict: a
//! guess is not a statement.
//!
//! Values bind only to the entity whose clause they sit in: the text from a
//! mention of the entity up to the next mention of a different entity.
//! Years must follow a trigger within a few words. Lengths need a trigger
//! within a few words on either side, and a length followed by `from`,
//! `away` and the like is a distance, not a dimension.

use std::sync::Arc;

use regex::Regex;

use super::error::VerifyError;
use super::facts::{EntityFacts, Fact, FactKind, FactTable};
use super::linguistic::HedgeDetector;
use super::ensure_scorable;
use crate::domain::Claim;

const DEFAULT_SCORE: f64 = 0.45;
const MATCH_BONUS: f64 = 0.30;
const CONTRADICTION_PENALTY: f64 = 0.25;

/// Number with optional thousands separators and decimals, followed by a length unit
const LENGTH_PATTERN: &str = r"(?i)\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(kilometers|kilometres|km|meters|metres|meter|metre|m|feet|foot|ft|miles|mile|mi)\b";

/// A length followed by one of these describes a distance
const DISTANCE_PATTERN: &str =
    r"(?i)^\s*(?:from|away|apart|off|north|south|east|west|behind|beyond|outside)\b";

/// Words on either side of a length searched for a trigger
const TRIGGER_WINDOW: usize = 3;

/// Outcome of scoring one claim against the table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactualScore {
    /// Score in [0, 1]
    pub score: f64,

    /// Highest source count among matched facts (0 when nothing matched)
    pub sources: u32,

    /// Matched facts as "Entity.attribute"
    pub matched: Vec<String>,

    /// Contradicted facts as "Entity.attribute"
    pub contradicted: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assertion {
    Match,
    Contradiction,
}

/// One fact with its matchers compiled
#[derive(Debug, Clone)]
struct CompiledFact {
    label: String,
    fact: Fact,
    trigger: Regex,
    /// Trigger word followed by a year within a few words
    dated: Option<Regex>,
}

#[derive(Debug, Clone)]
struct CompiledEntity {
    mention: Regex,
    facts: Vec<CompiledFact>,
}

/// Fact-table lookup scorer
#[derive(Debug, Clone)]
pub struct FactualScorer {
    hedges: HedgeDetector,
    table: Arc<FactTable>,
    entities: Vec<CompiledEntity>,
    length: Regex,
    distance: Regex,
}

impl FactualScorer {
    pub fn new(table: Arc<FactTable>, hedges: HedgeDetector) -> Result<Self, regex::Error> {
        let entities = table
            .entities
            .iter()
            .map(compile_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            hedges,
            table,
            entities,
            length: Regex::new(LENGTH_PATTERN)?,
            distance: Regex::new(DISTANCE_PATTERN)?,
        })
    }

    /// The table this scorer checks against
    pub fn table(&self) -> &Arc<FactTable> {
        &self.table
    }

    /// Score a claim against the fact table
    pub fn score(&self, claim: &Claim) -> Result<FactualScore, VerifyError> {
        ensure_scorable(claim)?;

        let text = claim.text.as_str();
        let hedged = self.hedges.is_hedged(text);
        let mut result = FactualScore::default();

        let mentions = self.mentions(text);

        for (idx, entity) in self.entities.iter().enumerate() {
            let clauses = entity_clauses(text, idx, &mentions);
            if clauses.is_empty() {
                continue;
            }

            for compiled in &entity.facts {
                match self.assess(compiled, &clauses) {
                    Some(Assertion::Match) => {
                        result.sources = result.sources.max(compiled.fact.sources);
                        result.matched.push(compiled.label.clone());
                    }
                    Some(Assertion::Contradiction) if !hedged => {
                        result.contradicted.push(compiled.label.clone());
                    }
                    _ => {}
                }
            }
        }

        let score = DEFAULT_SCORE + MATCH_BONUS * result.matched.len() as f64
            - CONTRADICTION_PENALTY * result.contradicted.len() as f64;
        result.score = score.clamp(0.0, 1.0);

        Ok(result)
    }

    /// Every entity mention as (start byte, entity index), in text order
    fn mentions(&self, text: &str) -> Vec<(usize, usize)> {
        let mut mentions: Vec<(usize, usize)> = self
            .entities
            .iter()
            .enumerate()
            .flat_map(|(idx, entity)| entity.mention.find_iter(text).map(move |m| (m.start(), idx)))
            .collect();
        mentions.sort_unstable();
        mentions
    }

    /// Decide whether the clauses assert `compiled` and whether the assertion holds
    fn assess(&self, compiled: &CompiledFact, clauses: &[&str]) -> Option<Assertion> {
        let values: Vec<f64> = clauses
            .iter()
            .flat_map(|clause| match (compiled.fact.kind, &compiled.dated) {
                (FactKind::Year, Some(dated)) => dated
                    .captures_iter(clause)
                    .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
                    .collect::<Vec<f64>>(),
                (FactKind::Year, None) => Vec::new(),
                (FactKind::Length, _) => self.measured_lengths(&compiled.trigger, clause),
            })
            .collect();

        if values.is_empty() {
            None
        } else if values.iter().any(|v| compiled.fact.accepts(*v)) {
            Some(Assertion::Match)
        } else {
            Some(Assertion::Contradiction)
        }
    }

    /// Lengths in metres that sit next to a trigger word and are not distances
    fn measured_lengths(&self, trigger: &Regex, clause: &str) -> Vec<f64> {
        self.length
            .captures_iter(clause)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let after = &clause[whole.end()..];
                if self.distance.is_match(after) {
                    return None;
                }

                let mut before: Vec<&str> = clause[..whole.start()]
                    .split_whitespace()
                    .rev()
                    .take(TRIGGER_WINDOW)
                    .collect();
                before.reverse();
                let after: Vec<&str> = after.split_whitespace().take(TRIGGER_WINDOW).collect();
                if !trigger.is_match(&before.join(" ")) && !trigger.is_match(&after.join(" ")) {
                    return None;
                }

                let number: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
                let factor = metres_per_unit(caps.get(2)?.as_str())?;
                Some(number * factor)
            })
            .collect()
    }
}

/// Slices of `text` that belong to entity `idx`: from each of its mentions to
/// the next mention of another entity
fn entity_clauses<'a>(text: &'a str, idx: usize, mentions: &[(usize, usize)]) -> Vec<&'a str> {
    mentions
        .iter()
        .enumerate()
        .filter(|(_, (_, entity))| *entity == idx)
        .map(|(pos, (start, _))| {
            let end = mentions[pos + 1..]
                .iter()
                .find(|(_, other)| *other != idx)
                .map(|(next, _)| *next)
                .unwrap_or(text.len());
            &text[*start..end.max(*start)]
        })
        .collect()
}

fn metres_per_unit(unit: &str) -> Option<f64> {
    match unit.to_lowercase().as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => Some(1.0),
        "km" | "kilometers" | "kilometres" => Some(1000.0),
        "ft" | "foot" | "feet" => Some(0.3048),
        "mi" | "mile" | "miles" => Some(1609.344),
        _ => None,
    }
}

/// Case-insensitive, word-bounded alternation of literal words
fn word_alternation(words: impl Iterator<Item = impl AsRef<str>>) -> String {
    let escaped: Vec<String> = words.map(|w| regex::escape(w.as_ref())).collect();
    format!(r"(?i)\b(?:{})\b", escaped.join("|"))
}

fn compile_entity(entity: &EntityFacts) -> Result<CompiledEntity, regex::Error> {
    let mention = Regex::new(&word_alternation(entity.names()))?;

    let facts = entity
        .facts
        .iter()
        .map(|fact| -> Result<CompiledFact, regex::Error> {
            let triggers = word_alternation(fact.triggers.iter());
            let dated = match fact.kind {
                FactKind::Year => Some(Regex::new(&format!(
                    r"{}(?:\s+\S+){{0,3}}?\s+(\d{{4}})\b",
                    triggers
                ))?),
                FactKind::Length => None,
            };

            Ok(CompiledFact {
                label: format!("{}.{}", entity.name, fact.attribute),
                fact: fact.clone(),
                trigger: Regex::new(&triggers)?,
                dated,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledEntity { mention, facts })
}
