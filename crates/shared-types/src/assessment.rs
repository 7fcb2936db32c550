use crate::detection::{CategoryTally, Detection};
use crate::error::InvariantError;
use crate::types::SourceLocator;
use std::collections::BTreeSet;
use std::fmt;

/// Aggregate risk classification. Ordering is the escalation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of applying a jurisdiction's threshold table to a detection set.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LegalAssessment {
    /// Statute the table implements, e.g. "Straffeloven § 243"
    pub statute: String,
    pub tally: CategoryTally,
    pub criteria_met: BTreeSet<String>,
    /// True when at least one criterion is met
    pub indication: bool,
    pub base_risk_level: RiskLevel,
    pub rationale: Vec<String>,
}

/// How one registered vulnerable entity contributed to the final level.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityEscalation {
    pub entity: String,
    /// Protected alias used in place of the name in any display copy
    pub alias: String,
    pub age: Option<u32>,
    pub condition: Option<String>,
    pub vulnerability: Option<String>,
    pub attributable_count: usize,
    /// Highest tier whose threshold was met, if any
    pub automatic_tier: Option<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggravationResult {
    pub base_risk_level: RiskLevel,
    pub final_risk_level: RiskLevel,
    pub per_entity: Vec<EntityEscalation>,
}

/// A pairing between a detection and a unit of the other corpus.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Correlation {
    pub similarity_score: f64,
    pub matched_source_id: String,
    pub matched_locator: SourceLocator,
    pub matched_text: String,
    pub detected_entity: Option<String>,
}

impl Correlation {
    pub fn new(
        similarity_score: f64,
        matched_source_id: impl Into<String>,
        matched_locator: SourceLocator,
        matched_text: impl Into<String>,
    ) -> Result<Self, InvariantError> {
        if !(0.0..=1.0).contains(&similarity_score) {
            return Err(InvariantError::ScoreOutOfRange(similarity_score));
        }
        matched_locator.validate()?;
        Ok(Self {
            similarity_score,
            matched_source_id: matched_source_id.into(),
            matched_locator,
            matched_text: matched_text.into(),
            detected_entity: None,
        })
    }

    pub fn with_entity(mut self, entity: Option<String>) -> Self {
        self.detected_entity = entity;
        self
    }
}

/// A detection together with its ranked correlations, best first.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CorrelatedDetection {
    pub detection: Detection,
    pub correlations: Vec<Correlation>,
}

impl CorrelatedDetection {
    pub fn uncorrelated(detection: Detection) -> Self {
        Self {
            detection,
            correlations: Vec::new(),
        }
    }

    pub fn best_score(&self) -> Option<f64> {
        self.correlations.first().map(|c| c.similarity_score)
    }
}
