use crate::error::InvariantError;
use crate::types::SourceLocator;
use std::collections::BTreeMap;
use std::fmt;

/// Closed taxonomy of coercive-communication patterns.
///
/// A lexicon uses a subset of these; the order here is the canonical
/// reporting order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gaslighting,
    EconomicCoercion,
    DirectThreat,
    VeiledThreat,
    Invalidation,
    EmotionalManipulation,
    PsychologicalControl,
    Isolation,
    Humiliation,
    EmotionalBlackmail,
    Insult,
    Disqualification,
    PsychologicalPressure,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Gaslighting,
        Category::EconomicCoercion,
        Category::DirectThreat,
        Category::VeiledThreat,
        Category::Invalidation,
        Category::EmotionalManipulation,
        Category::PsychologicalControl,
        Category::Isolation,
        Category::Humiliation,
        Category::EmotionalBlackmail,
        Category::Insult,
        Category::Disqualification,
        Category::PsychologicalPressure,
    ];

    /// Serialized identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gaslighting => "gaslighting",
            Category::EconomicCoercion => "economic_coercion",
            Category::DirectThreat => "direct_threat",
            Category::VeiledThreat => "veiled_threat",
            Category::Invalidation => "invalidation",
            Category::EmotionalManipulation => "emotional_manipulation",
            Category::PsychologicalControl => "psychological_control",
            Category::Isolation => "isolation",
            Category::Humiliation => "humiliation",
            Category::EmotionalBlackmail => "emotional_blackmail",
            Category::Insult => "insult",
            Category::Disqualification => "disqualification",
            Category::PsychologicalPressure => "psychological_pressure",
        }
    }

    /// Human readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Gaslighting => "Gaslighting",
            Category::EconomicCoercion => "Economic coercion",
            Category::DirectThreat => "Direct threat",
            Category::VeiledThreat => "Veiled threat",
            Category::Invalidation => "Invalidation",
            Category::EmotionalManipulation => "Emotional manipulation",
            Category::PsychologicalControl => "Psychological control",
            Category::Isolation => "Isolation",
            Category::Humiliation => "Humiliation",
            Category::EmotionalBlackmail => "Emotional blackmail",
            Category::Insult => "Insult",
            Category::Disqualification => "Disqualification",
            Category::PsychologicalPressure => "Psychological pressure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// A single lexicon match with its provenance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Detection {
    pub category: Category,
    pub severity: Severity,
    /// Exact matched text as it appears in the source
    pub matched_text: String,
    /// Surrounding text, fixed character radius around the match
    pub context_window: String,
    /// Full source line containing the match
    pub citation: String,
    pub source_id: String,
    pub locator: SourceLocator,
    /// Index of the unit inside its document
    pub unit_index: usize,
    /// Character offset of the match inside its unit
    pub unit_offset: usize,
    /// Character offset of the match inside the whole document
    pub position: usize,
}

impl Detection {
    /// Create a detection. Context and citation default to the matched text
    /// and all offsets to zero; the scanner fills them in.
    pub fn new(
        category: Category,
        severity: Severity,
        matched_text: impl Into<String>,
        source_id: impl Into<String>,
        locator: SourceLocator,
    ) -> Result<Self, InvariantError> {
        let matched_text = matched_text.into();
        if matched_text.is_empty() {
            return Err(InvariantError::EmptyMatchedText);
        }
        locator.validate()?;
        Ok(Self {
            category,
            severity,
            context_window: matched_text.clone(),
            citation: matched_text.clone(),
            matched_text,
            source_id: source_id.into(),
            locator,
            unit_index: 0,
            unit_offset: 0,
            position: 0,
        })
    }

    pub fn with_context(
        mut self,
        context_window: impl Into<String>,
        citation: impl Into<String>,
    ) -> Self {
        self.context_window = context_window.into();
        self.citation = citation.into();
        self
    }

    pub fn at(mut self, unit_index: usize, unit_offset: usize) -> Self {
        self.unit_index = unit_index;
        self.unit_offset = unit_offset;
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Detection counts per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CategoryTally(BTreeMap<Category, usize>);

impl CategoryTally {
    pub fn from_detections(detections: &[Detection]) -> Self {
        let mut tally = Self::default();
        for detection in detections {
            tally.add(detection.category);
        }
        tally
    }

    pub fn add(&mut self, category: Category) {
        *self.0.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self, category: Category) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Sum of the counts of every listed category. Duplicates count once.
    pub fn sum_of(&self, categories: &[Category]) -> usize {
        let mut seen = Vec::with_capacity(categories.len());
        let mut total = 0;
        for category in categories {
            if !seen.contains(category) {
                seen.push(*category);
                total += self.count(*category);
            }
        }
        total
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page() -> SourceLocator {
        SourceLocator::Page { page: 1 }
    }

    #[test]
    fn test_detection_rejects_empty_match() {
        let err = Detection::new(Category::Isolation, Severity::Low, "", "doc", page());
        assert_eq!(err, Err(InvariantError::EmptyMatchedText));
    }

    #[test]
    fn test_detection_rejects_invalid_locator() {
        let err = Detection::new(
            Category::Isolation,
            Severity::Low,
            "x",
            "doc",
            SourceLocator::Page { page: 0 },
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::EconomicCoercion).unwrap();
        assert_eq!(json, "\"economic_coercion\"");
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_tally_counts() {
        let d = |c| Detection::new(c, Severity::Low, "m", "doc", page()).unwrap();
        let detections = vec![
            d(Category::DirectThreat),
            d(Category::DirectThreat),
            d(Category::VeiledThreat),
        ];
        let tally = CategoryTally::from_detections(&detections);
        assert_eq!(tally.count(Category::DirectThreat), 2);
        assert_eq!(tally.count(Category::Isolation), 0);
        assert_eq!(
            tally.sum_of(&[Category::DirectThreat, Category::VeiledThreat]),
            3
        );
        assert_eq!(
            tally.sum_of(&[Category::DirectThreat, Category::DirectThreat]),
            2
        );
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_tally_add() {
        let mut tally = CategoryTally::default();
        assert!(tally.is_empty());
        tally.add(Category::Gaslighting);
        tally.add(Category::Gaslighting);
        tally.add(Category::Isolation);
        assert_eq!(tally.count(Category::Gaslighting), 2);
        assert_eq!(
            tally.iter().collect::<Vec<_>>(),
            vec![(Category::Gaslighting, 2), (Category::Isolation, 1)]
        );
    }

    #[test]
    fn test_tally_serializes_as_map() {
        let d = Detection::new(Category::Isolation, Severity::Low, "m", "doc", page()).unwrap();
        let tally = CategoryTally::from_detections(&[d]);
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"isolation":1}"#);
    }
}
