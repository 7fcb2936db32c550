use thiserror::Error;

/// Raised when a value object is constructed with data that breaks its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    #[error("Page numbers are 1-based, got {0}")]
    InvalidPage(u32),

    #[error("Invalid time range: start={start}s end={end}s")]
    InvalidTimeRange { start: f64, end: f64 },

    #[error("Detection has empty matched text")]
    EmptyMatchedText,

    #[error("Similarity score out of range [0, 1]: {0}")]
    ScoreOutOfRange(f64),
}
