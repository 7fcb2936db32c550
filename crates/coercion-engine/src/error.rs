use shared_types::{Category, InvariantError};
use thiserror::Error;

/// Fatal problems found while loading lexicons, tables or the registry.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid pattern for {category} in lexicon {lexicon}: {pattern}")]
    InvalidPattern {
        lexicon: String,
        category: Category,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Category {category} in lexicon {lexicon} declares no rules")]
    MissingRules { lexicon: String, category: Category },

    #[error("Category {category} declared twice in lexicon {lexicon}")]
    DuplicateCategory { lexicon: String, category: Category },

    #[error("Lexicon {0} declares no categories")]
    EmptyLexicon(String),

    #[error("Invalid contradiction pattern for language {language}: {pattern}")]
    InvalidContradictionPattern {
        language: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Contradiction markers for language {0} declare no patterns")]
    EmptyContradictions(String),

    #[error("No lexicon registered for {0}")]
    UnknownLexicon(String),

    #[error("No threshold table registered for jurisdiction {0}")]
    MissingThresholdTable(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Invalid name pattern for entity {entity}: {pattern}")]
    InvalidEntityPattern {
        entity: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced while running an analysis.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),

    #[error("Correlation cancelled")]
    Cancelled,

    #[error("Correlation exceeded its deadline")]
    DeadlineExceeded,
}
