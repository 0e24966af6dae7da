//! Authority-fact table.
//!
//! The table is the engine's only ground truth: entity -> attribute ->
//! accepted value or range, each backed by a source count. A copy is bundled
//! into the binary; a replacement can be loaded from YAML at startup. Once
//! loaded it is never mutated and is shared read-only.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The table compiled into the binary
const BUNDLED_FACTS: &str = include_str!("../../data/facts.yaml");

/// A complete fact table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactTable {
    /// Table format version
    pub version: String,

    /// Entities with their known facts
    pub entities: Vec<EntityFacts>,
}

impl FactTable {
    /// Load the table bundled with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_FACTS).context("Failed to load bundled fact table")
    }

    /// Load a table from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fact table: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Invalid fact table: {}", path.display()))
    }

    /// Parse and validate a table from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(content).context("Failed to parse fact table YAML")?;
        table.validate()?;
        Ok(table)
    }

    /// Validate the table definition
    pub fn validate(&self) -> Result<()> {
        if self.entities.is_empty() {
            anyhow::bail!("Fact table must have at least one entity");
        }

        for (i, entity) in self.entities.iter().enumerate() {
            if entity.name.trim().is_empty() {
                anyhow::bail!("Entity {} has an empty name", i);
            }

            for fact in &entity.facts {
                if fact.triggers.is_empty() {
                    anyhow::bail!(
                        "Fact '{}.{}' has no trigger words",
                        entity.name,
                        fact.attribute
                    );
                }
                if fact.tolerance < 0.0 {
                    anyhow::bail!(
                        "Fact '{}.{}' has a negative tolerance",
                        entity.name,
                        fact.attribute
                    );
                }
                if let Accepted::Range { min, max } = fact.accepted {
                    if min > max {
                        anyhow::bail!(
                            "Fact '{}.{}' has an empty range ({} > {})",
                            entity.name,
                            fact.attribute,
                            min,
                            max
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Total number of facts across all entities
    pub fn fact_count(&self) -> usize {
        self.entities.iter().map(|e| e.facts.len()).sum()
    }

    /// Get an entity by name (case-insensitive)
    pub fn get_entity(&self, name: &str) -> Option<&EntityFacts> {
        self.entities
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// Facts known about one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityFacts {
    /// Canonical entity name
    pub name: String,

    /// Other names the entity goes by
    #[serde(default)]
    pub aliases: Vec<String>,

    pub facts: Vec<Fact>,
}

impl EntityFacts {
    /// Canonical name followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A single checkable attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// Attribute name (e.g., "completed", "height")
    pub attribute: String,

    /// What kind of quantity the attribute holds
    pub kind: FactKind,

    /// Words that signal the claim is talking about this attribute
    pub triggers: Vec<String>,

    /// Accepted value or range
    pub accepted: Accepted,

    /// Slack on both sides of the accepted value, in canonical units
    #[serde(default)]
    pub tolerance: f64,

    /// Number of independent references behind the fact
    pub sources: u32,
}

impl Fact {
    /// Check a stated value against the accepted value
    pub fn accepts(&self, value: f64) -> bool {
        let (min, max) = match self.accepted {
            Accepted::Value { value } => (value, value),
            Accepted::Range { min, max } => (min, max),
        };
        value >= min - self.tolerance && value <= max + self.tolerance
    }
}

/// Quantity kinds the factual scorer can read from text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    /// A four-digit calendar year
    Year,

    /// A length, canonical unit metres
    Length,
}

/// Accepted value for a fact
///
/// Supports two YAML formats:
/// - Exact: `accepted: { value: 1889 }`
/// - Range: `accepted: { min: 300, max: 330 }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Accepted {
    Value { value: f64 },
    Range { min: f64, max: f64 },
}
