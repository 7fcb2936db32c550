use crate::error::InvariantError;
use std::fmt;

/// Where a piece of text came from inside its source.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceLocator {
    /// 1-based page number of an extracted document
    Page { page: u32 },
    /// Segment of a transcribed recording, in seconds
    Time { start_secs: f64, end_secs: f64 },
}

impl SourceLocator {
    pub fn page(page: u32) -> Result<Self, InvariantError> {
        let locator = SourceLocator::Page { page };
        locator.validate()?;
        Ok(locator)
    }

    pub fn time(start_secs: f64, end_secs: f64) -> Result<Self, InvariantError> {
        let locator = SourceLocator::Time {
            start_secs,
            end_secs,
        };
        locator.validate()?;
        Ok(locator)
    }

    /// Check the locator invariants. Deserialized locators bypass the
    /// constructors, so consumers call this before trusting one.
    pub fn validate(&self) -> Result<(), InvariantError> {
        match *self {
            SourceLocator::Page { page } if page == 0 => Err(InvariantError::InvalidPage(page)),
            SourceLocator::Page { .. } => Ok(()),
            SourceLocator::Time {
                start_secs,
                end_secs,
            } => {
                let finite = start_secs.is_finite() && end_secs.is_finite();
                if finite && start_secs >= 0.0 && end_secs >= start_secs {
                    Ok(())
                } else {
                    Err(InvariantError::InvalidTimeRange {
                        start: start_secs,
                        end: end_secs,
                    })
                }
            }
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SourceLocator::Page { page } => write!(f, "p. {}", page),
            SourceLocator::Time {
                start_secs,
                end_secs,
            } => write!(
                f,
                "{}-{}",
                format_timestamp(start_secs),
                format_timestamp(end_secs)
            ),
        }
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Smallest piece of text the classifier looks at: one page or one transcript segment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextUnit {
    pub source_id: String,
    pub locator: SourceLocator,
    pub content: String,
}

impl TextUnit {
    pub fn new(
        source_id: impl Into<String>,
        locator: SourceLocator,
        content: impl Into<String>,
    ) -> Result<Self, InvariantError> {
        locator.validate()?;
        Ok(Self {
            source_id: source_id.into(),
            locator,
            content: content.into(),
        })
    }

    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Formal document, page aligned
    Document,
    /// Recorded conversation, time aligned
    Recording,
}

/// One source in a corpus with its units in reading order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub source_id: String,
    pub kind: SourceKind,
    pub units: Vec<TextUnit>,
}

impl Document {
    /// Build a page-aligned document. Page numbers start at 1.
    pub fn from_pages<S: Into<String>>(source_id: impl Into<String>, pages: Vec<S>) -> Self {
        let source_id = source_id.into();
        let units = pages
            .into_iter()
            .enumerate()
            .map(|(i, content)| TextUnit {
                source_id: source_id.clone(),
                locator: SourceLocator::Page {
                    page: i as u32 + 1,
                },
                content: content.into(),
            })
            .collect();
        Self {
            source_id,
            kind: SourceKind::Document,
            units,
        }
    }

    /// Build a time-aligned recording from `(start, end, text)` segments.
    pub fn from_segments<S: Into<String>>(
        source_id: impl Into<String>,
        segments: Vec<(f64, f64, S)>,
    ) -> Result<Self, InvariantError> {
        let source_id = source_id.into();
        let mut units = Vec::with_capacity(segments.len());
        for (start, end, content) in segments {
            units.push(TextUnit::new(
                source_id.clone(),
                SourceLocator::time(start, end)?,
                content,
            )?);
        }
        Ok(Self {
            source_id,
            kind: SourceKind::Recording,
            units,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.units.iter().all(|u| u.content.trim().is_empty())
    }
}

/// Result of external text extraction for one source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceDocument {
    Extracted(Document),
    Failed { source_id: String, reason: String },
}

impl SourceDocument {
    pub fn source_id(&self) -> &str {
        match self {
            SourceDocument::Extracted(doc) => &doc.source_id,
            SourceDocument::Failed { source_id, .. } => source_id,
        }
    }
}

impl From<Document> for SourceDocument {
    fn from(document: Document) -> Self {
        SourceDocument::Extracted(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_zero_rejected() {
        assert_eq!(SourceLocator::page(0), Err(InvariantError::InvalidPage(0)));
        assert!(SourceLocator::page(1).is_ok());
    }

    #[test]
    fn test_time_range_must_be_ordered() {
        assert!(SourceLocator::time(5.0, 10.0).is_ok());
        assert!(SourceLocator::time(3.0, 3.0).is_ok());
        assert!(SourceLocator::time(10.0, 5.0).is_err());
        assert!(SourceLocator::time(-1.0, 5.0).is_err());
        assert!(SourceLocator::time(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(SourceLocator::Page { page: 4 }.to_string(), "p. 4");
        let t = SourceLocator::time(65.4, 70.0).unwrap();
        assert_eq!(t.to_string(), "01:05-01:10");
    }

    #[test]
    fn test_format_timestamp_long_recordings() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(3725.0), "62:05");
        assert_eq!(format_timestamp(-3.0), "00:00");
    }

    #[test]
    fn test_from_pages_numbers_from_one() {
        let doc = Document::from_pages("a.pdf", vec!["first", "second"]);
        assert_eq!(doc.kind, SourceKind::Document);
        assert_eq!(doc.units[1].locator, SourceLocator::Page { page: 2 });
        assert_eq!(doc.units[0].source_id, "a.pdf");
    }

    #[test]
    fn test_from_segments_validates() {
        let bad = Document::from_segments("rec", vec![(4.0, 2.0, "x")]);
        assert!(bad.is_err());
        let ok = Document::from_segments("rec", vec![(0.0, 5.0, "hej")]).unwrap();
        assert_eq!(ok.kind, SourceKind::Recording);
    }

    #[test]
    fn test_source_document_serde_shape() {
        let failed = SourceDocument::Failed {
            source_id: "broken.pdf".into(),
            reason: "encrypted".into(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "encrypted");

        let doc: SourceDocument = Document::from_pages("ok.pdf", vec!["text"]).into();
        let json = serde_json::to_string(&doc).unwrap();
        let back: SourceDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.source_id(), "ok.pdf");
    }
}
