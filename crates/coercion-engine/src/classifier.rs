//! Segment classifier
//!
//! Runs every rule of a lexicon over one text unit. Categories may overlap:
//! the same span can be reported under several categories.

use crate::lexicon::Lexicon;
use crate::patterns::{citation_line, context_window, NormalizedText, DEFAULT_CONTEXT_RADIUS};
use shared_types::{Detection, TextUnit};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    lexicon: Arc<Lexicon>,
    context_radius: usize,
}

impl SegmentClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify one unit. Offsets are relative to the unit.
    pub fn classify(&self, unit: &TextUnit) -> Vec<Detection> {
        self.classify_at(unit, 0)
    }

    /// Classify the unit at `unit_index` of its document.
    ///
    /// Output order: categories in lexicon order, rules in lexicon order,
    /// matches left to right.
    pub fn classify_at(&self, unit: &TextUnit, unit_index: usize) -> Vec<Detection> {
        if unit.content.trim().is_empty() {
            return Vec::new();
        }
        if let Err(e) = unit.locator.validate() {
            tracing::warn!(source = %unit.source_id, error = %e, "skipping unit with invalid locator");
            return Vec::new();
        }

        let normalized = NormalizedText::new(&unit.content);
        let chars: Vec<char> = unit.content.chars().collect();
        let mut detections = Vec::new();

        for category in self.lexicon.categories() {
            let category_severity = self.lexicon.category_severity(category);
            for rule in self.lexicon.rules_for(category) {
                for m in rule.regex().find_iter(normalized.as_str()) {
                    let Some((start, end)) = normalized.source_span(m.start(), m.end()) else {
                        continue;
                    };
                    let matched: String = chars[start..end].iter().collect();
                    let severity = rule.severity_hint.unwrap_or(category_severity);

                    match Detection::new(
                        category,
                        severity,
                        matched,
                        unit.source_id.clone(),
                        unit.locator,
                    ) {
                        Ok(detection) => detections.push(
                            detection
                                .with_context(
                                    context_window(&chars, start, end, self.context_radius),
                                    citation_line(&chars, start, end),
                                )
                                .at(unit_index, start)
                                .with_position(start),
                        ),
                        Err(e) => {
                            tracing::debug!(pattern = %rule.pattern, error = %e, "dropped match")
                        }
                    }
                }
            }
        }

        tracing::debug!(
            source = %unit.source_id,
            unit = unit_index,
            detections = detections.len(),
            "classified unit"
        );
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::{Jurisdiction, Language};
    use crate::lexicon::{CategoryDefinition, LexiconDefinition, RuleDefinition};
    use crate::lexicons;
    use pretty_assertions::assert_eq;
    use shared_types::{Category, Severity, SourceLocator};

    fn english() -> SegmentClassifier {
        let lexicon = Lexicon::compile(&lexicons::english::definition()).unwrap();
        SegmentClassifier::new(Arc::new(lexicon))
    }

    fn unit(text: &str) -> TextUnit {
        TextUnit::new("doc", SourceLocator::Page { page: 1 }, text).unwrap()
    }

    #[test]
    fn test_empty_unit_yields_nothing() {
        assert!(english().classify(&unit("")).is_empty());
        assert!(english().classify(&unit("   \n ")).is_empty());
    }

    #[test]
    fn test_single_gaslighting_detection() {
        let detections = english().classify(&unit("you always exaggerate, that never happened"));
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].category, Category::Gaslighting);
        assert_eq!(detections[0].matched_text, "that never happened");
        assert_eq!(detections[0].unit_offset, 23);
        assert_eq!(detections[0].severity, Severity::Medium);
    }

    #[test]
    fn test_matched_text_keeps_source_case() {
        let detections = english().classify(&unit("Well. I'LL REPORT YOU tomorrow"));
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "I'LL REPORT YOU");
        assert_eq!(detections[0].unit_offset, 6);
    }

    #[test]
    fn test_context_window_radius() {
        let classifier = english().with_context_radius(4);
        let detections = classifier.classify(&unit("abcdefgh because of you ijklmnop"));
        assert_eq!(detections[0].context_window, "fgh because of you ijk");
    }

    #[test]
    fn test_citation_is_whole_line() {
        let text = "Page header\nHe said: it's your fault, all of it.\nFooter";
        let detections = english().classify(&unit(text));
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].citation, "He said: it's your fault, all of it.");
    }

    #[test]
    fn test_cross_category_overlap_allowed() {
        let definition = LexiconDefinition {
            jurisdiction: Jurisdiction::DK,
            language: Language::English,
            name: None,
            categories: vec![
                CategoryDefinition::from_patterns(Category::DirectThreat, &[r"\bor else\b"]),
                CategoryDefinition::from_patterns(Category::VeiledThreat, &[r"\bor else\b"]),
            ],
        };
        let classifier = SegmentClassifier::new(Arc::new(Lexicon::compile(&definition).unwrap()));
        let detections = classifier.classify(&unit("do it or else"));
        let categories: Vec<_> = detections.iter().map(|d| d.category).collect();
        assert_eq!(categories, vec![Category::DirectThreat, Category::VeiledThreat]);
    }

    #[test]
    fn test_rule_hint_overrides_category_severity() {
        let definition = LexiconDefinition {
            jurisdiction: Jurisdiction::DK,
            language: Language::English,
            name: None,
            categories: vec![CategoryDefinition::from_patterns(Category::DirectThreat, &["hurt"])
                .with_rule(RuleDefinition::with_severity("leave", Severity::Low))],
        };
        let classifier = SegmentClassifier::new(Arc::new(Lexicon::compile(&definition).unwrap()));
        let detections = classifier.classify(&unit("I will leave and hurt"));
        let severities: Vec<_> = detections.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Low]);
    }

    #[test]
    fn test_danish_offsets_are_characters() {
        let lexicon = Lexicon::compile(&lexicons::danish::definition()).unwrap();
        let classifier = SegmentClassifier::new(Arc::new(lexicon));
        let text = "Økonomi: du får ingen penge";
        let detections = classifier.classify(&unit(text));
        let economic = detections
            .iter()
            .find(|d| d.category == Category::EconomicCoercion)
            .unwrap();
        assert_eq!(economic.unit_offset, 9);
        assert_eq!(economic.matched_text, "du får ingen penge");
    }
}
