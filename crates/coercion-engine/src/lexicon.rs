//! Lexicon store
//!
//! A lexicon maps each category to an ordered list of match rules for one
//! (jurisdiction, language) key. Definitions are plain serde data (built-in
//! or read from TOML); compiling one validates every pattern up front so a
//! broken lexicon never reaches the classifier.

use crate::error::ConfigurationError;
use crate::jurisdiction::{Jurisdiction, Language, LexiconKey};
use crate::lexicons;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use shared_types::{Category, Severity};
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// Definitions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub pattern: String,
    /// Overrides the category severity for matches of this rule
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl RuleDefinition {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            severity: None,
        }
    }

    pub fn with_severity(pattern: impl Into<String>, severity: Severity) -> Self {
        Self {
            pattern: pattern.into(),
            severity: Some(severity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub category: Category,
    /// Overrides the default severity table for this category
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl CategoryDefinition {
    /// Category whose rules are plain patterns
    pub fn from_patterns(category: Category, patterns: &[&str]) -> Self {
        Self {
            category,
            severity: None,
            rules: patterns.iter().map(|p| RuleDefinition::new(*p)).collect(),
        }
    }

    pub fn with_rule(mut self, rule: RuleDefinition) -> Self {
        self.rules.push(rule);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconDefinition {
    pub jurisdiction: Jurisdiction,
    pub language: Language,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
}

impl LexiconDefinition {
    pub fn key(&self) -> LexiconKey {
        LexiconKey::new(self.jurisdiction.clone(), self.language.clone())
    }
}

/// Default severity per category, used when neither the category
/// definition nor the rule overrides it.
pub fn default_severity(category: Category) -> Severity {
    match category {
        Category::DirectThreat
        | Category::EmotionalBlackmail
        | Category::Humiliation
        | Category::Insult => Severity::High,
        Category::Gaslighting
        | Category::PsychologicalControl
        | Category::EconomicCoercion
        | Category::Disqualification
        | Category::Invalidation => Severity::Medium,
        Category::VeiledThreat
        | Category::EmotionalManipulation
        | Category::Isolation
        | Category::PsychologicalPressure => Severity::Low,
    }
}

// ============================================================================
// Compiled lexicon
// ============================================================================

/// A compiled pattern tied to its category.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pub category: Category,
    pub pattern: String,
    pub severity_hint: Option<Severity>,
    regex: Regex,
}

impl MatchRule {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

#[derive(Debug, Clone)]
struct LexiconEntry {
    category: Category,
    severity: Severity,
    rules: Vec<MatchRule>,
}

/// Immutable, validated lexicon for one key.
#[derive(Debug, Clone)]
pub struct Lexicon {
    key: LexiconKey,
    name: String,
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Compile a definition, failing on the first malformed pattern,
    /// duplicated category or category without rules.
    pub fn compile(definition: &LexiconDefinition) -> Result<Self, ConfigurationError> {
        let key = definition.key();
        let name = definition
            .name
            .clone()
            .unwrap_or_else(|| key.to_string());

        if definition.categories.is_empty() {
            return Err(ConfigurationError::EmptyLexicon(name));
        }

        let mut entries: Vec<LexiconEntry> = Vec::with_capacity(definition.categories.len());
        for category_def in &definition.categories {
            let category = category_def.category;
            if entries.iter().any(|e| e.category == category) {
                return Err(ConfigurationError::DuplicateCategory {
                    lexicon: name,
                    category,
                });
            }
            if category_def.rules.is_empty() {
                return Err(ConfigurationError::MissingRules {
                    lexicon: name,
                    category,
                });
            }

            let mut rules = Vec::with_capacity(category_def.rules.len());
            for rule in &category_def.rules {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigurationError::InvalidPattern {
                        lexicon: name.clone(),
                        category,
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
                rules.push(MatchRule {
                    category,
                    pattern: rule.pattern.clone(),
                    severity_hint: rule.severity,
                    regex,
                });
            }

            entries.push(LexiconEntry {
                category,
                severity: category_def
                    .severity
                    .unwrap_or_else(|| default_severity(category)),
                rules,
            });
        }

        tracing::debug!(lexicon = %name, categories = entries.len(), "compiled lexicon");

        Ok(Self { key, name, entries })
    }

    pub fn key(&self) -> &LexiconKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Categories in declaration order
    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|e| e.category).collect()
    }

    /// Rules of a category in declaration order; empty if the category is not used
    pub fn rules_for(&self, category: Category) -> &[MatchRule] {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Severity of a match before any rule hint is applied
    pub fn category_severity(&self, category: Category) -> Severity {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.severity)
            .unwrap_or_else(|| default_severity(category))
    }

    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|e| e.rules.len()).sum()
    }
}

// ============================================================================
// Store
// ============================================================================

/// All lexicons available to the engine, one per key.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    lexicons: BTreeMap<LexiconKey, Arc<Lexicon>>,
}

impl LexiconStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding every built-in lexicon
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let mut store = Self::new();
        for definition in lexicons::builtin_definitions() {
            store.insert(&definition)?;
        }
        Ok(store)
    }

    /// Compile and register a definition. A definition for a key that is
    /// already present replaces the earlier lexicon.
    pub fn insert(&mut self, definition: &LexiconDefinition) -> Result<(), ConfigurationError> {
        let lexicon = Lexicon::compile(definition)?;
        if self.lexicons.contains_key(lexicon.key()) {
            tracing::info!(key = %lexicon.key(), "replacing lexicon");
        }
        self.lexicons.insert(lexicon.key().clone(), Arc::new(lexicon));
        Ok(())
    }

    pub fn get(&self, key: &LexiconKey) -> Option<Arc<Lexicon>> {
        self.lexicons.get(key).cloned()
    }

    pub fn require(&self, key: &LexiconKey) -> Result<Arc<Lexicon>, ConfigurationError> {
        self.get(key)
            .ok_or_else(|| ConfigurationError::UnknownLexicon(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &LexiconKey> {
        self.lexicons.keys()
    }
}
