//! Legal threshold evaluation
//!
//! Maps a detection set to the criteria of a jurisdiction's threshold table
//! and a base risk level. Tables are data; `denmark` ships the built-in one.

pub mod denmark;
pub mod table;

pub use table::{LegalCriterion, RiskCascade, ThresholdTable};

use crate::error::ConfigurationError;
use crate::jurisdiction::Jurisdiction;
use shared_types::{CategoryTally, Detection, LegalAssessment};
use std::collections::BTreeSet;

/// Built-in table for a jurisdiction, if one ships with the engine
pub fn builtin_table(jurisdiction: &Jurisdiction) -> Option<ThresholdTable> {
    match jurisdiction {
        Jurisdiction::DK => Some(denmark::straffeloven_243()),
        Jurisdiction::Custom(_) => None,
    }
}

#[derive(Debug, Clone)]
pub struct LegalThresholdEvaluator {
    table: ThresholdTable,
}

impl LegalThresholdEvaluator {
    pub fn new(table: ThresholdTable) -> Result<Self, ConfigurationError> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn for_jurisdiction(jurisdiction: &Jurisdiction) -> Result<Self, ConfigurationError> {
        let table = builtin_table(jurisdiction)
            .ok_or_else(|| ConfigurationError::MissingThresholdTable(jurisdiction.to_string()))?;
        Self::new(table)
    }

    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    pub fn evaluate(&self, detections: &[Detection]) -> LegalAssessment {
        let tally = CategoryTally::from_detections(detections);

        let mut criteria_met = BTreeSet::new();
        let mut rationale = Vec::new();
        for criterion in &self.table.criteria {
            let count = criterion.count(&tally);
            if criterion.is_met(&tally) {
                rationale.push(format!(
                    "{}: {} detections (threshold {})",
                    criterion.name, count, criterion.min_count
                ));
                criteria_met.insert(criterion.name.clone());
            }
        }
        let indication = !criteria_met.is_empty();
        if !indication {
            rationale.push(format!("No {} criteria met", self.table.statute));
        }

        let (base_risk_level, reason) = self.table.cascade.classify(&tally, indication);
        rationale.push(format!("Risk {}: {}", base_risk_level, reason));

        tracing::info!(
            statute = %self.table.statute,
            detections = detections.len(),
            criteria = criteria_met.len(),
            risk = %base_risk_level,
            "legal assessment"
        );

        LegalAssessment {
            statute: self.table.statute.clone(),
            tally,
            criteria_met,
            indication,
            base_risk_level,
            rationale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Category, RiskLevel, Severity, SourceLocator};

    fn detection(category: Category) -> Detection {
        Detection::new(
            category,
            Severity::High,
            "m",
            "rec",
            SourceLocator::Time {
                start_secs: 0.0,
                end_secs: 5.0,
            },
        )
        .unwrap()
    }

    fn evaluator() -> LegalThresholdEvaluator {
        LegalThresholdEvaluator::for_jurisdiction(&Jurisdiction::DK).unwrap()
    }

    #[test]
    fn test_two_direct_threats_critical() {
        let assessment = evaluator().evaluate(&[
            detection(Category::DirectThreat),
            detection(Category::DirectThreat),
        ]);
        assert_eq!(assessment.base_risk_level, RiskLevel::Critical);
        assert!(assessment.indication);
        assert_eq!(
            assessment.criteria_met.iter().cloned().collect::<Vec<_>>(),
            vec!["threats".to_string()]
        );
    }

    #[test]
    fn test_empty_detections_low() {
        let assessment = evaluator().evaluate(&[]);
        assert_eq!(assessment.base_risk_level, RiskLevel::Low);
        assert!(!assessment.indication);
        assert!(assessment.criteria_met.is_empty());
        assert!(assessment.rationale[0].contains("No Straffeloven § 243 criteria met"));
    }

    #[test]
    fn test_criteria_sum_their_categories() {
        let assessment = evaluator().evaluate(&[
            detection(Category::Humiliation),
            detection(Category::Insult),
        ]);
        assert!(assessment.criteria_met.contains("degrading_conduct"));
        assert_eq!(assessment.base_risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_unknown_jurisdiction_missing_table() {
        let err = LegalThresholdEvaluator::for_jurisdiction(&Jurisdiction::Custom("SE".into()));
        assert!(matches!(
            err,
            Err(ConfigurationError::MissingThresholdTable(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{Category, Severity, SourceLocator};

    proptest! {
        /// Property: the tally in the assessment accounts for every detection
        #[test]
        fn tally_matches_input(indices in prop::collection::vec(0usize..13, 0..50)) {
            let detections: Vec<Detection> = indices
                .iter()
                .map(|&i| {
                    Detection::new(Category::ALL[i], Severity::Low, "m", "d", SourceLocator::Page { page: 1 })
                        .unwrap()
                })
                .collect();
            let evaluator = LegalThresholdEvaluator::for_jurisdiction(&Jurisdiction::DK).unwrap();
            let assessment = evaluator.evaluate(&detections);
            prop_assert_eq!(assessment.tally.total(), detections.len());
            prop_assert_eq!(assessment.indication, !assessment.criteria_met.is_empty());
        }
    }
}
