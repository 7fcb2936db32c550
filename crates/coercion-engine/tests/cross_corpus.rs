//! Document detections correlated against recorded conversations

use coercion_engine::{
    AnalysisEngine, AnalysisRequest, CorrelationBudget, EngineConfig, Jurisdiction, LexiconKey,
};
use pretty_assertions::assert_eq;
use shared_types::{Category, Document, RiskLevel, SourceDocument, SourceLocator};

fn key(s: &str) -> LexiconKey {
    LexiconKey::parse(s).unwrap()
}

#[test]
fn spanish_documents_against_danish_recordings() {
    let config = EngineConfig::from_str(
        r#"
        [[entities]]
        name = "Juan Diego"
        alias = "hijo mayor"
        name_patterns = ['\bjuan\s+d\b']
        age = 17
        condition = "autism"
        vulnerability = "minor with autism"
        escalation = [{ min_count = 1, tier = "high" }, { min_count = 2, tier = "critical" }]
        "#,
    )
    .unwrap();
    let engine = AnalysisEngine::from_config(config).unwrap();

    let documents: Vec<SourceDocument> = vec![Document::from_pages(
        "demanda.pdf",
        vec![
            "Página uno sin nada relevante.",
            "Juan Diego escuchó cuando dijo: eres un inútil.",
        ],
    )
    .into()];
    let recordings: Vec<SourceDocument> = vec![Document::from_segments(
        "optagelse_01.m4a",
        vec![
            (0.0, 5.0, "Hej, hvordan går det"),
            (5.0, 10.0, "Du får ingen penge, jeg tager børnene"),
        ],
    )
    .unwrap()
    .into()];

    let report = engine
        .analyze(&AnalysisRequest {
            jurisdiction: Jurisdiction::DK,
            documents: &documents,
            document_lexicon: key("DK/es"),
            recordings: &recordings,
            recording_lexicon: key("DK/da"),
            budget: CorrelationBudget::unbounded(),
        })
        .unwrap();

    let doc_detections = report.documents.detections();
    assert_eq!(doc_detections.len(), 1);
    assert_eq!(doc_detections[0].category, Category::Humiliation);
    assert_eq!(doc_detections[0].locator, SourceLocator::Page { page: 2 });

    // one economic and one threat in the recording, exactly one dedup window apart
    let rec_detections = report.recordings.detections();
    let categories: Vec<_> = rec_detections.iter().map(|d| d.category).collect();
    assert_eq!(
        categories,
        vec![Category::EconomicCoercion, Category::DirectThreat]
    );

    assert!(report.assessment.criteria_met.contains("threats"));
    assert_eq!(report.assessment.base_risk_level, RiskLevel::Moderate);

    // the humiliation is attributable to the registered minor
    assert_eq!(report.aggravation.per_entity[0].attributable_count, 1);
    assert_eq!(report.aggravation.final_risk_level, RiskLevel::High);
}

#[test]
fn failed_sources_are_tallied_not_raised() {
    let engine = AnalysisEngine::builtin().unwrap();
    let failed = vec![
        SourceDocument::Failed {
            source_id: "a.pdf".into(),
            reason: "encrypted".into(),
        },
        SourceDocument::Failed {
            source_id: "b.pdf".into(),
            reason: "empty".into(),
        },
    ];
    let report = engine
        .analyze(&AnalysisRequest {
            jurisdiction: Jurisdiction::DK,
            documents: &failed,
            document_lexicon: key("DK/es"),
            recordings: &[],
            recording_lexicon: key("DK/da"),
            budget: CorrelationBudget::unbounded(),
        })
        .unwrap();
    assert_eq!(report.documents.tally.failed, 2);
    assert_eq!(report.documents.tally.succeeded, 0);
    assert!(report.correlations.is_empty());
    assert_eq!(report.assessment.base_risk_level, RiskLevel::Low);
}

#[test]
fn report_serializes_risk_labels() {
    let engine = AnalysisEngine::builtin().unwrap();
    let recordings: Vec<SourceDocument> = vec![Document::from_segments(
        "r.m4a",
        vec![(0.0, 4.0, "jeg anmelder dig, det lover jeg dig"), (40.0, 44.0, "jeg ødelægger dig")],
    )
    .unwrap()
    .into()];
    let report = engine
        .analyze(&AnalysisRequest {
            jurisdiction: Jurisdiction::DK,
            documents: &[],
            document_lexicon: key("DK/es"),
            recordings: &recordings,
            recording_lexicon: key("DK/da"),
            budget: CorrelationBudget::unbounded(),
        })
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["assessment"]["base_risk_level"], "critical");
    assert_eq!(json["aggravation"]["final_risk_level"], "critical");
}
