//! Jurisdiction and language keys
//!
//! A lexicon is bound to exactly one (jurisdiction, language) pair and a
//! threshold table to exactly one jurisdiction. Keys are never merged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal jurisdiction a threshold table and its lexicons apply to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Jurisdiction {
    /// Denmark (Straffeloven)
    DK,
    /// Any jurisdiction supplied purely through configuration
    Custom(String),
}

impl Jurisdiction {
    pub fn code(&self) -> &str {
        match self {
            Jurisdiction::DK => "DK",
            Jurisdiction::Custom(code) => code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Jurisdiction::DK => "Denmark",
            Jurisdiction::Custom(code) => code,
        }
    }

    /// Parse from a code or name (case-insensitive)
    pub fn parse_code(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "DK" | "DENMARK" | "DANMARK" => Jurisdiction::DK,
            other => Jurisdiction::Custom(other.to_string()),
        }
    }
}

impl From<String> for Jurisdiction {
    fn from(s: String) -> Self {
        Jurisdiction::parse_code(&s)
    }
}

impl From<Jurisdiction> for String {
    fn from(j: Jurisdiction) -> Self {
        j.code().to_string()
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Language of the text a lexicon is written for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Danish,
    Spanish,
    English,
    Other(String),
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &str {
        match self {
            Language::Danish => "da",
            Language::Spanish => "es",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    pub fn parse_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "da" | "danish" | "dansk" => Language::Danish,
            "es" | "spanish" | "español" | "espanol" => Language::Spanish,
            "en" | "english" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Language::parse_code(&s)
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        l.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies one lexicon, e.g. `DK/da`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LexiconKey {
    pub jurisdiction: Jurisdiction,
    pub language: Language,
}

impl LexiconKey {
    pub fn new(jurisdiction: Jurisdiction, language: Language) -> Self {
        Self {
            jurisdiction,
            language,
        }
    }

    /// Parse `JURISDICTION/lang`, e.g. `DK/es`
    pub fn parse(s: &str) -> Option<Self> {
        let (jurisdiction, language) = s.split_once('/')?;
        if jurisdiction.trim().is_empty() || language.trim().is_empty() {
            return None;
        }
        Some(Self::new(
            Jurisdiction::parse_code(jurisdiction),
            Language::parse_code(language),
        ))
    }
}

impl fmt::Display for LexiconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.jurisdiction, self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_jurisdiction() {
        assert_eq!(Jurisdiction::parse_code("dk"), Jurisdiction::DK);
        assert_eq!(Jurisdiction::parse_code("Danmark"), Jurisdiction::DK);
        assert_eq!(
            Jurisdiction::parse_code("se"),
            Jurisdiction::Custom("SE".into())
        );
    }

    #[test]
    fn test_lexicon_key_roundtrip_display() {
        let key = LexiconKey::parse("DK/es").unwrap();
        assert_eq!(key.jurisdiction, Jurisdiction::DK);
        assert_eq!(key.language, Language::Spanish);
        assert_eq!(key.to_string(), "DK/es");
        assert!(LexiconKey::parse("DK").is_none());
        assert!(LexiconKey::parse("/es").is_none());
    }

    #[test]
    fn test_serde_as_codes() {
        let key = LexiconKey::new(Jurisdiction::DK, Language::Danish);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"jurisdiction":"DK","language":"da"}"#);
        let back: LexiconKey = serde_json::from_str(r#"{"jurisdiction":"dk","language":"DA"}"#).unwrap();
        assert_eq!(back, key);
    }
}
