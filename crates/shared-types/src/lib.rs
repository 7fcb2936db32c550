pub mod assessment;
pub mod detection;
pub mod error;
pub mod types;

pub use assessment::{
    AggravationResult, CorrelatedDetection, Correlation, EntityEscalation, LegalAssessment,
    RiskLevel,
};
pub use detection::{Category, CategoryTally, Detection, Severity};
pub use error::InvariantError;
pub use types::{format_timestamp, Document, SourceDocument, SourceKind, SourceLocator, TextUnit};
