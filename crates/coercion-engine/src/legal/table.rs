//! Threshold tables and the risk cascade
//!
//! Every number here is policy data and can be replaced from configuration.

use crate::error::ConfigurationError;
use crate::jurisdiction::Jurisdiction;
use serde::{Deserialize, Serialize};
use shared_types::{Category, CategoryTally, RiskLevel};

/// One statutory criterion: met when the summed count of its categories
/// reaches `min_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalCriterion {
    pub name: String,
    pub categories: Vec<Category>,
    pub min_count: usize,
}

impl LegalCriterion {
    pub fn new(name: impl Into<String>, categories: &[Category], min_count: usize) -> Self {
        Self {
            name: name.into(),
            categories: categories.to_vec(),
            min_count,
        }
    }

    pub fn count(&self, tally: &CategoryTally) -> usize {
        tally.sum_of(&self.categories)
    }

    pub fn is_met(&self, tally: &CategoryTally) -> bool {
        self.count(tally) >= self.min_count
    }
}

fn default_threat_categories() -> Vec<Category> {
    vec![Category::DirectThreat, Category::VeiledThreat]
}

fn default_economic_categories() -> Vec<Category> {
    vec![Category::EconomicCoercion]
}

fn default_isolation_categories() -> Vec<Category> {
    vec![Category::Isolation]
}

fn default_critical_threats() -> usize {
    2
}

fn default_critical_economic() -> usize {
    3
}

fn default_critical_isolation() -> usize {
    1
}

fn default_high_total_with_indication() -> usize {
    10
}

fn default_high_total() -> usize {
    5
}

fn default_high_threats() -> usize {
    1
}

fn default_high_economic() -> usize {
    2
}

fn default_moderate_total() -> usize {
    3
}

/// Strict-priority rules mapping a tally to a base risk level.
///
/// * critical: threats >= `critical_threats`, or economic >= `critical_economic`
///   together with isolation >= `critical_isolation`
/// * high: total >= `high_total_with_indication` with an indication, or
///   total >= `high_total` with threats >= `high_threats` or economic >= `high_economic`
/// * moderate: total >= `moderate_total` or an indication
/// * low otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCascade {
    #[serde(default = "default_threat_categories")]
    pub threat_categories: Vec<Category>,
    #[serde(default = "default_economic_categories")]
    pub economic_categories: Vec<Category>,
    #[serde(default = "default_isolation_categories")]
    pub isolation_categories: Vec<Category>,
    #[serde(default = "default_critical_threats")]
    pub critical_threats: usize,
    #[serde(default = "default_critical_economic")]
    pub critical_economic: usize,
    #[serde(default = "default_critical_isolation")]
    pub critical_isolation: usize,
    #[serde(default = "default_high_total_with_indication")]
    pub high_total_with_indication: usize,
    #[serde(default = "default_high_total")]
    pub high_total: usize,
    #[serde(default = "default_high_threats")]
    pub high_threats: usize,
    #[serde(default = "default_high_economic")]
    pub high_economic: usize,
    #[serde(default = "default_moderate_total")]
    pub moderate_total: usize,
}

impl Default for RiskCascade {
    fn default() -> Self {
        Self {
            threat_categories: default_threat_categories(),
            economic_categories: default_economic_categories(),
            isolation_categories: default_isolation_categories(),
            critical_threats: default_critical_threats(),
            critical_economic: default_critical_economic(),
            critical_isolation: default_critical_isolation(),
            high_total_with_indication: default_high_total_with_indication(),
            high_total: default_high_total(),
            high_threats: default_high_threats(),
            high_economic: default_high_economic(),
            moderate_total: default_moderate_total(),
        }
    }
}

impl RiskCascade {
    /// Apply the cascade. The first rule that matches wins.
    pub fn classify(&self, tally: &CategoryTally, indication: bool) -> (RiskLevel, String) {
        let total = tally.total();
        let threats = tally.sum_of(&self.threat_categories);
        let economic = tally.sum_of(&self.economic_categories);
        let isolation = tally.sum_of(&self.isolation_categories);

        if threats >= self.critical_threats {
            return (
                RiskLevel::Critical,
                format!("{} threats (critical at {})", threats, self.critical_threats),
            );
        }
        if economic >= self.critical_economic && isolation >= self.critical_isolation {
            return (
                RiskLevel::Critical,
                format!(
                    "{} economic pressure with {} isolation",
                    economic, isolation
                ),
            );
        }
        if indication && total >= self.high_total_with_indication {
            return (
                RiskLevel::High,
                format!("{} detections with statutory indication", total),
            );
        }
        if total >= self.high_total && (threats >= self.high_threats || economic >= self.high_economic)
        {
            return (
                RiskLevel::High,
                format!(
                    "{} detections including {} threats and {} economic pressure",
                    total, threats, economic
                ),
            );
        }
        if total >= self.moderate_total || indication {
            return (
                RiskLevel::Moderate,
                format!("{} detections, indication: {}", total, indication),
            );
        }
        (RiskLevel::Low, format!("{} detections", total))
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let counts = [
            ("critical_threats", self.critical_threats),
            ("critical_economic", self.critical_economic),
            ("high_total_with_indication", self.high_total_with_indication),
            ("high_total", self.high_total),
            ("high_threats", self.high_threats),
            ("high_economic", self.high_economic),
            ("moderate_total", self.moderate_total),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigurationError::InvalidThreshold(format!(
                    "cascade {} must be at least 1",
                    name
                )));
            }
        }
        if self.threat_categories.is_empty() || self.economic_categories.is_empty() {
            return Err(ConfigurationError::InvalidThreshold(
                "cascade threat and economic groups need at least one category".to_string(),
            ));
        }
        Ok(())
    }
}

/// Criteria and cascade for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub jurisdiction: Jurisdiction,
    pub statute: String,
    pub criteria: Vec<LegalCriterion>,
    #[serde(default)]
    pub cascade: RiskCascade,
}

impl ThresholdTable {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.criteria.is_empty() {
            return Err(ConfigurationError::InvalidThreshold(format!(
                "table for {} has no criteria",
                self.jurisdiction
            )));
        }
        for criterion in &self.criteria {
            if criterion.min_count == 0 {
                return Err(ConfigurationError::InvalidThreshold(format!(
                    "criterion {} must require at least 1 detection",
                    criterion.name
                )));
            }
            if criterion.categories.is_empty() {
                return Err(ConfigurationError::InvalidThreshold(format!(
                    "criterion {} names no categories",
                    criterion.name
                )));
            }
        }
        self.cascade.validate()
    }
}
