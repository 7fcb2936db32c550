pub mod aggravation;
pub mod citation;
pub mod classifier;
pub mod config;
pub mod contradiction;
pub mod correlation;
pub mod error;
pub mod jurisdiction;
pub mod legal;
pub mod lexicon;
pub mod lexicons;
pub mod overview;
pub mod patterns;
pub mod scanner;

pub use aggravation::{aggravate, EscalationRule, VulnerabilityRegistry, VulnerableEntityDefinition};
pub use citation::{CitationRenderer, DisplayCitation, IdentityTranslator, Translator};
pub use classifier::SegmentClassifier;
pub use config::{EngineConfig, ScannerSettings};
pub use contradiction::{Contradiction, ContradictionDefinition, ContradictionDetector};
pub use correlation::{CorrelationBudget, CorrelationSettings, CrossCorpusCorrelator};
pub use error::{ConfigurationError, EngineError};
pub use jurisdiction::{Jurisdiction, Language, LexiconKey};
pub use legal::{LegalThresholdEvaluator, ThresholdTable};
pub use lexicon::{Lexicon, LexiconStore};
pub use overview::EvidenceOverview;
pub use scanner::{BatchScan, BatchTally, CorpusScanner, DocumentOutcome};

use serde::{Deserialize, Serialize};
use shared_types::{
    AggravationResult, CorrelatedDetection, Document, LegalAssessment, SourceDocument,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One end-to-end analysis: documents are correlated against recordings.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub jurisdiction: Jurisdiction,
    pub documents: &'a [SourceDocument],
    pub document_lexicon: LexiconKey,
    pub recordings: &'a [SourceDocument],
    pub recording_lexicon: LexiconKey,
    pub budget: CorrelationBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub jurisdiction: Jurisdiction,
    pub documents: BatchScan,
    pub recordings: BatchScan,
    /// Assessment over the detections of both corpora
    pub assessment: LegalAssessment,
    pub aggravation: AggravationResult,
    /// Document detections with their matches in the recordings
    pub correlations: Vec<CorrelatedDetection>,
    pub overview: EvidenceOverview,
    /// Self-contradictions in either corpus, documents first
    pub contradictions: Vec<Contradiction>,
}

/// Engine entry point: holds the compiled lexicons, threshold tables and
/// registry and wires the components together.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: EngineConfig,
    lexicons: LexiconStore,
    thresholds: BTreeMap<Jurisdiction, ThresholdTable>,
    contradictions: BTreeMap<Language, ContradictionDetector>,
    registry: Arc<VulnerabilityRegistry>,
}

impl AnalysisEngine {
    /// Engine with built-in lexicons and tables and default settings
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_config(EngineConfig::default())
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigurationError> {
        config.correlation.validate()?;

        let mut lexicons = LexiconStore::builtin()?;
        for definition in &config.lexicons {
            lexicons.insert(definition)?;
        }

        let mut thresholds = BTreeMap::new();
        if let Some(table) = legal::builtin_table(&Jurisdiction::DK) {
            thresholds.insert(Jurisdiction::DK, table);
        }
        for table in &config.thresholds {
            table.validate()?;
            thresholds.insert(table.jurisdiction.clone(), table.clone());
        }

        let mut contradictions = BTreeMap::new();
        for definition in lexicons::builtin_contradictions()
            .iter()
            .chain(&config.contradictions)
        {
            let detector = ContradictionDetector::compile(definition)?;
            contradictions.insert(detector.language().clone(), detector);
        }

        let registry = Arc::new(VulnerabilityRegistry::from_definitions(
            config.entities.clone(),
        )?);

        tracing::info!(
            lexicons = lexicons.keys().count(),
            tables = thresholds.len(),
            contradiction_languages = contradictions.len(),
            entities = registry.entities().len(),
            "analysis engine ready"
        );

        Ok(Self {
            config,
            lexicons,
            thresholds,
            contradictions,
            registry,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lexicons(&self) -> &LexiconStore {
        &self.lexicons
    }

    pub fn registry(&self) -> Arc<VulnerabilityRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn scanner(&self, key: &LexiconKey) -> Result<CorpusScanner, ConfigurationError> {
        Ok(CorpusScanner::new(self.lexicons.require(key)?)
            .with_context_radius(self.config.scanner.context_radius)
            .with_dedup_window(self.config.scanner.dedup_window))
    }

    pub fn evaluator(
        &self,
        jurisdiction: &Jurisdiction,
    ) -> Result<LegalThresholdEvaluator, ConfigurationError> {
        let table = self
            .thresholds
            .get(jurisdiction)
            .cloned()
            .ok_or_else(|| ConfigurationError::MissingThresholdTable(jurisdiction.to_string()))?;
        LegalThresholdEvaluator::new(table)
    }

    pub fn correlator(&self) -> CrossCorpusCorrelator {
        CrossCorpusCorrelator::new(self.config.correlation.clone())
            .with_registry(Arc::clone(&self.registry))
    }

    /// Detector for a language, if any markers are registered for it
    pub fn contradiction_detector(&self, language: &Language) -> Option<&ContradictionDetector> {
        self.contradictions.get(language)
    }

    /// Contradictions across a corpus. A language without markers yields none.
    pub fn detect_contradictions(
        &self,
        sources: &[SourceDocument],
        language: &Language,
    ) -> Vec<Contradiction> {
        let Some(detector) = self.contradiction_detector(language) else {
            tracing::debug!(%language, "no contradiction markers for language");
            return Vec::new();
        };
        sources
            .iter()
            .filter_map(|s| match s {
                SourceDocument::Extracted(doc) => Some(detector.detect(doc)),
                SourceDocument::Failed { .. } => None,
            })
            .flatten()
            .collect()
    }

    pub fn citation_renderer(&self) -> CitationRenderer {
        CitationRenderer::new().with_registry(Arc::clone(&self.registry))
    }

    /// Scan both corpora, assess, correlate documents against recordings and
    /// aggravate.
    pub fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisReport, EngineError> {
        let evaluator = self.evaluator(&request.jurisdiction)?;
        let documents = self.scanner(&request.document_lexicon)?.scan_batch(request.documents);
        let recordings = self
            .scanner(&request.recording_lexicon)?
            .scan_batch(request.recordings);

        let document_detections = documents.detections();
        let recording_detections = recordings.detections();

        let mut all = document_detections.clone();
        all.extend(recording_detections.iter().cloned());
        let assessment = evaluator.evaluate(&all);

        let recording_corpus: Vec<Document> = request
            .recordings
            .iter()
            .filter_map(|s| match s {
                SourceDocument::Extracted(doc) => Some(doc.clone()),
                SourceDocument::Failed { .. } => None,
            })
            .collect();
        let correlations = self.correlator().correlate_within(
            &document_detections,
            &recording_corpus,
            &request.budget,
        )?;

        let mut attributable = correlations.clone();
        attributable.extend(
            recording_detections
                .into_iter()
                .map(CorrelatedDetection::uncorrelated),
        );
        let aggravation = aggravate(&assessment, &attributable, &self.registry);
        let overview = EvidenceOverview::build(&attributable);

        let mut contradictions =
            self.detect_contradictions(request.documents, &request.document_lexicon.language);
        contradictions.extend(
            self.detect_contradictions(request.recordings, &request.recording_lexicon.language),
        );

        Ok(AnalysisReport {
            jurisdiction: request.jurisdiction.clone(),
            documents,
            recordings,
            assessment,
            aggravation,
            correlations,
            overview,
            contradictions,
        })
    }
}
