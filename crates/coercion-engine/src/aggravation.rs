//! Vulnerability registry and aggravation
//!
//! Registered entities (for example minors with a documented condition) can
//! raise the final risk level above the base level when enough detections are
//! attributable to them. The registry also pseudonymizes names in display
//! text.

use crate::error::ConfigurationError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use shared_types::{
    AggravationResult, CorrelatedDetection, EntityEscalation, LegalAssessment, RiskLevel,
};

/// Automatic escalation: at least `min_count` attributable detections raise
/// the level to `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub min_count: usize,
    pub tier: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerableEntityDefinition {
    pub name: String,
    /// Replacement used when names are protected
    pub alias: String,
    /// Extra regexes matching variants of the name (case-insensitive).
    /// The name itself always matches as a whole phrase.
    #[serde(default)]
    pub name_patterns: Vec<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub vulnerability: Option<String>,
    #[serde(default)]
    pub escalation: Vec<EscalationRule>,
}

#[derive(Debug, Clone)]
pub struct VulnerableEntity {
    definition: VulnerableEntityDefinition,
    patterns: Vec<Regex>,
}

impl VulnerableEntity {
    pub fn compile(definition: VulnerableEntityDefinition) -> Result<Self, ConfigurationError> {
        if definition.name.trim().is_empty() {
            return Err(ConfigurationError::InvalidSetting {
                name: "entities.name",
                reason: "entity name is empty".to_string(),
            });
        }
        for rule in &definition.escalation {
            if rule.min_count == 0 {
                return Err(ConfigurationError::InvalidThreshold(format!(
                    "escalation for {} must require at least 1 detection",
                    definition.name
                )));
            }
        }

        let literal = format!(r"\b{}\b", regex::escape(definition.name.trim()));
        let mut patterns = Vec::with_capacity(definition.name_patterns.len() + 1);
        for pattern in std::iter::once(&literal).chain(definition.name_patterns.iter()) {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigurationError::InvalidEntityPattern {
                    entity: definition.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })?;
            patterns.push(regex);
        }

        Ok(Self {
            definition,
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn alias(&self) -> &str {
        &self.definition.alias
    }

    pub fn definition(&self) -> &VulnerableEntityDefinition {
        &self.definition
    }

    pub fn is_mentioned_in(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Highest tier whose threshold `count` reaches
    pub fn tier_for(&self, count: usize) -> Option<RiskLevel> {
        self.definition
            .escalation
            .iter()
            .filter(|r| count >= r.min_count)
            .map(|r| r.tier)
            .max()
    }

    fn protect(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            out = pattern
                .replace_all(&out, regex::NoExpand(&self.definition.alias))
                .into_owned();
        }
        out
    }
}

/// Ordered set of registered vulnerable entities.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityRegistry {
    entities: Vec<VulnerableEntity>,
}

impl VulnerabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(
        definitions: Vec<VulnerableEntityDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let entities = definitions
            .into_iter()
            .map(VulnerableEntity::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entities })
    }

    pub fn entities(&self) -> &[VulnerableEntity] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First registered entity mentioned in `text`
    pub fn detect_entity(&self, text: &str) -> Option<&str> {
        self.entities
            .iter()
            .find(|e| e.is_mentioned_in(text))
            .map(|e| e.name())
    }

    /// Replace every name variant of every entity by its alias
    pub fn protect_names(&self, text: &str) -> String {
        self.entities
            .iter()
            .fold(text.to_string(), |acc, entity| entity.protect(&acc))
    }
}

/// Raise the base level of `assessment` using the registry.
///
/// A detection is attributable to an entity when its context or citation
/// mentions the entity, or when any of its correlations detected that
/// entity. Each detection counts at most once per entity. The final level is
/// never below the base level.
pub fn aggravate(
    assessment: &LegalAssessment,
    detections: &[CorrelatedDetection],
    registry: &VulnerabilityRegistry,
) -> AggravationResult {
    let base = assessment.base_risk_level;
    let mut final_level = base;
    let mut per_entity = Vec::with_capacity(registry.entities().len());

    for entity in registry.entities() {
        let count = detections
            .iter()
            .filter(|cd| is_attributable(entity, cd))
            .count();
        let tier = entity.tier_for(count);
        if let Some(tier) = tier {
            final_level = final_level.max(tier);
        }

        let def = entity.definition();
        per_entity.push(EntityEscalation {
            entity: def.name.clone(),
            alias: def.alias.clone(),
            age: def.age,
            condition: def.condition.clone(),
            vulnerability: def.vulnerability.clone(),
            attributable_count: count,
            automatic_tier: tier,
        });
    }

    if final_level > base {
        tracing::info!(base = %base, final_level = %final_level, "risk aggravated");
    }

    AggravationResult {
        base_risk_level: base,
        final_risk_level: final_level,
        per_entity,
    }
}

fn is_attributable(entity: &VulnerableEntity, cd: &CorrelatedDetection) -> bool {
    entity.is_mentioned_in(&cd.detection.context_window)
        || entity.is_mentioned_in(&cd.detection.citation)
        || cd
            .correlations
            .iter()
            .any(|c| c.detected_entity.as_deref() == Some(entity.name()))
}
