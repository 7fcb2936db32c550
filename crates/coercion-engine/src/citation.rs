//! Display copies of citations
//!
//! Citations are always kept verbatim in detections. Rendering produces an
//! additional copy for readers: names protected through the registry and,
//! when a translator is available, translated. Translation failure falls
//! back to the untranslated text.

use crate::aggravation::VulnerabilityRegistry;
use crate::jurisdiction::Language;
use crate::patterns::truncate_chars;
use serde::{Deserialize, Serialize};
use shared_types::Detection;
use std::sync::Arc;

/// Longest input handed to a translator, in characters
pub const MAX_TRANSLATION_CHARS: usize = 5000;

/// External translation service. `None` means the text could not be
/// translated.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target: &Language) -> Option<String>;
}

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _target: &Language) -> Option<String> {
        Some(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCitation {
    /// Citation exactly as extracted
    pub original: String,
    /// Citation with registered names replaced by aliases
    pub protected: String,
    /// Translated copy of `protected`, if a target language was set
    pub translated: Option<String>,
}

pub struct CitationRenderer {
    translator: Box<dyn Translator>,
    registry: Option<Arc<VulnerabilityRegistry>>,
    target: Option<Language>,
}

impl CitationRenderer {
    pub fn new() -> Self {
        Self {
            translator: Box::new(IdentityTranslator),
            registry: None,
            target: None,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>, target: Language) -> Self {
        self.translator = translator;
        self.target = Some(target);
        self
    }

    pub fn with_registry(mut self, registry: Arc<VulnerabilityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn render(&self, detection: &Detection) -> DisplayCitation {
        let original = detection.citation.clone();
        let protected = match &self.registry {
            Some(registry) => registry.protect_names(&original),
            None => original.clone(),
        };
        let translated = self.target.as_ref().map(|target| {
            let input = truncate_chars(&protected, MAX_TRANSLATION_CHARS);
            self.translator
                .translate(input, target)
                .unwrap_or_else(|| {
                    tracing::debug!(language = %target, "translation unavailable, keeping original");
                    protected.clone()
                })
        });

        DisplayCitation {
            original,
            protected,
            translated,
        }
    }
}

impl Default for CitationRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggravation::VulnerableEntityDefinition;
    use pretty_assertions::assert_eq;
    use shared_types::{Category, Severity, SourceLocator};
    use std::sync::Mutex;

    struct Unavailable;

    impl Translator for Unavailable {
        fn translate(&self, _text: &str, _target: &Language) -> Option<String> {
            None
        }
    }

    struct Recording(Arc<Mutex<Vec<usize>>>);

    impl Translator for Recording {
        fn translate(&self, text: &str, _target: &Language) -> Option<String> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(text.chars().count());
            }
            Some(text.to_uppercase())
        }
    }

    fn detection(citation: &str) -> Detection {
        Detection::new(
            Category::Humiliation,
            Severity::High,
            "inútil",
            "doc.pdf",
            SourceLocator::Page { page: 1 },
        )
        .unwrap()
        .with_context(citation, citation)
    }

    #[test]
    fn test_default_renderer_is_identity() {
        let rendered = CitationRenderer::default().render(&detection("eres inútil"));
        assert_eq!(rendered.original, "eres inútil");
        assert_eq!(rendered.protected, "eres inútil");
        assert_eq!(rendered.translated, None);
    }

    #[test]
    fn test_unavailable_translation_falls_back() {
        let renderer = CitationRenderer::new().with_translator(Box::new(Unavailable), Language::Danish);
        let rendered = renderer.render(&detection("eres inútil"));
        assert_eq!(rendered.translated.as_deref(), Some("eres inútil"));
    }

    #[test]
    fn test_names_protected_before_translation() {
        let registry = VulnerabilityRegistry::from_definitions(vec![VulnerableEntityDefinition {
            name: "Claudia".into(),
            alias: "ex-spouse".into(),
            name_patterns: vec![r"\bclau\b".into()],
            age: None,
            condition: None,
            vulnerability: None,
            escalation: vec![],
        }])
        .unwrap();
        let renderer = CitationRenderer::new()
            .with_registry(Arc::new(registry))
            .with_translator(Box::new(IdentityTranslator), Language::English);
        let rendered = renderer.render(&detection("Clau dijo que eres inútil"));
        assert_eq!(rendered.original, "Clau dijo que eres inútil");
        assert_eq!(rendered.protected, "ex-spouse dijo que eres inútil");
        assert_eq!(rendered.translated.as_deref(), Some("ex-spouse dijo que eres inútil"));
    }

    #[test]
    fn test_translator_input_capped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let renderer = CitationRenderer::new()
            .with_translator(Box::new(Recording(seen.clone())), Language::English);
        let long = "ü".repeat(MAX_TRANSLATION_CHARS + 10);
        renderer.render(&detection(&long));
        assert_eq!(*seen.lock().unwrap(), vec![MAX_TRANSLATION_CHARS]);
    }
}
