//! Denmark: Straffeloven § 243 (psychological violence)

use super::table::{LegalCriterion, RiskCascade, ThresholdTable};
use crate::jurisdiction::Jurisdiction;
use shared_types::Category;

pub const STATUTE: &str = "Straffeloven § 243";

pub fn straffeloven_243() -> ThresholdTable {
    ThresholdTable {
        jurisdiction: Jurisdiction::DK,
        statute: STATUTE.to_string(),
        criteria: vec![
            LegalCriterion::new("control", &[Category::PsychologicalControl], 3),
            LegalCriterion::new(
                "degrading_conduct",
                &[Category::Humiliation, Category::Insult, Category::Disqualification],
                2,
            ),
            LegalCriterion::new(
                "manipulation",
                &[Category::EmotionalManipulation, Category::EmotionalBlackmail],
                3,
            ),
            LegalCriterion::new(
                "threats",
                &[Category::DirectThreat, Category::VeiledThreat],
                1,
            ),
            LegalCriterion::new("gaslighting", &[Category::Gaslighting], 2),
            LegalCriterion::new("isolation", &[Category::Isolation], 1),
            LegalCriterion::new(
                "psychological_pressure",
                &[Category::PsychologicalPressure, Category::Invalidation],
                3,
            ),
            LegalCriterion::new("economic_pressure", &[Category::EconomicCoercion], 2),
        ],
        cascade: RiskCascade::default(),
    }
}
