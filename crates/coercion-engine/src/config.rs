//! Engine configuration
//!
//! Everything tunable lives in one TOML document. Every section has
//! defaults, so an empty document yields the built-in engine: built-in
//! lexicons and threshold tables, an empty vulnerability registry and the
//! default scanner and correlation settings.
//!
//! ```toml
//! [scanner]
//! context_radius = 50
//! dedup_window = 20
//!
//! [correlation]
//! threshold = 0.3
//! max_per_detection = 5
//!
//! [[contradictions]]
//! language = "es"
//! patterns = ["\\bya no pienso (lo mismo|igual)"]
//!
//! [[entities]]
//! name = "Juan Diego"
//! alias = "older son"
//! age = 17
//! condition = "autism"
//! escalation = [{ min_count = 1, tier = "high" }, { min_count = 2, tier = "critical" }]
//! ```

use crate::aggravation::{VulnerabilityRegistry, VulnerableEntityDefinition};
use crate::contradiction::{ContradictionDefinition, ContradictionDetector};
use crate::correlation::CorrelationSettings;
use crate::error::ConfigurationError;
use crate::legal::ThresholdTable;
use crate::lexicon::{Lexicon, LexiconDefinition};
use crate::patterns::DEFAULT_CONTEXT_RADIUS;
use crate::scanner::DEFAULT_DEDUP_WINDOW;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_context_radius() -> usize {
    DEFAULT_CONTEXT_RADIUS
}

fn default_dedup_window() -> usize {
    DEFAULT_DEDUP_WINDOW
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Characters of context kept on each side of a match
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
    /// Detections closer than this many characters are duplicates
    #[serde(default = "default_dedup_window")]
    pub dedup_window: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            context_radius: default_context_radius(),
            dedup_window: default_dedup_window(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scanner: ScannerSettings,
    #[serde(default)]
    pub correlation: CorrelationSettings,
    /// Lexicons added to (or replacing) the built-in ones
    #[serde(default)]
    pub lexicons: Vec<LexiconDefinition>,
    /// Threshold tables added to (or replacing) the built-in ones
    #[serde(default)]
    pub thresholds: Vec<ThresholdTable>,
    /// Contradiction markers replacing the built-in ones of a language
    #[serde(default)]
    pub contradictions: Vec<ContradictionDefinition>,
    /// Vulnerability registry
    #[serde(default)]
    pub entities: Vec<VulnerableEntityDefinition>,
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or any section fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigurationError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section. Lexicons are compiled here so that a broken
    /// pattern is reported at load time.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.correlation.validate()?;
        for definition in &self.lexicons {
            Lexicon::compile(definition)?;
        }
        for table in &self.thresholds {
            table.validate()?;
        }
        for definition in &self.contradictions {
            ContradictionDetector::compile(definition)?;
        }
        VulnerabilityRegistry::from_definitions(self.entities.clone())?;
        Ok(())
    }
}
