//! Coercion analysis CLI
//!
//! Reads pre-extracted documents and recording transcripts, runs the
//! analysis engine and writes the report as JSON.

mod input;

use anyhow::{bail, Context, Result};
use clap::Parser;
use coercion_engine::{
    AnalysisEngine, AnalysisReport, AnalysisRequest, CorrelationBudget, DisplayCitation,
    EngineConfig, Jurisdiction, LexiconKey,
};
use serde::Serialize;
use shared_types::{SourceDocument, SourceKind};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "coercion-cli")]
#[command(
    version,
    about = "Detect coercive-communication patterns in documents and recordings"
)]
struct Args {
    /// Engine configuration (TOML). Built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document inputs: Document JSON or plain text with form-feed page breaks
    #[arg(short, long, num_args = 1..)]
    documents: Vec<PathBuf>,

    /// Recording inputs: Document JSON or `[MM:SS] text` timelines
    #[arg(short, long, num_args = 1..)]
    recordings: Vec<PathBuf>,

    /// Jurisdiction whose threshold table applies
    #[arg(short, long, default_value = "DK")]
    jurisdiction: String,

    /// Lexicon for the documents, as JURISDICTION/lang
    #[arg(long, default_value = "DK/es")]
    document_lexicon: String,

    /// Lexicon for the recordings, as JURISDICTION/lang
    #[arg(long, default_value = "DK/da")]
    recording_lexicon: String,

    /// Correlation timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output file. Standard output when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    /// Display copies of every cited line, names replaced by aliases
    citations: Vec<DisplayCitation>,
}

fn parse_key(s: &str) -> Result<LexiconKey> {
    match LexiconKey::parse(s) {
        Some(key) => Ok(key),
        None => bail!("invalid lexicon key {s:?}, expected JURISDICTION/lang such as DK/es"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout may carry the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting coercion-cli v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = AnalysisEngine::from_config(config).context("building analysis engine")?;

    let document_lexicon = parse_key(&args.document_lexicon)?;
    let recording_lexicon = parse_key(&args.recording_lexicon)?;

    let documents: Vec<SourceDocument> = args
        .documents
        .iter()
        .map(|p| input::load_source(p, SourceKind::Document))
        .collect();
    let recordings: Vec<SourceDocument> = args
        .recordings
        .iter()
        .map(|p| input::load_source(p, SourceKind::Recording))
        .collect();

    let budget = match args.timeout_ms {
        Some(ms) => CorrelationBudget::unbounded().with_timeout(Duration::from_millis(ms)),
        None => CorrelationBudget::unbounded(),
    };

    let report = engine
        .analyze(&AnalysisRequest {
            jurisdiction: Jurisdiction::parse_code(&args.jurisdiction),
            documents: &documents,
            document_lexicon,
            recordings: &recordings,
            recording_lexicon,
            budget,
        })
        .context("analysis failed")?;

    tracing::info!(
        documents = report.documents.tally.succeeded,
        failed_documents = report.documents.tally.failed,
        recordings = report.recordings.tally.succeeded,
        failed_recordings = report.recordings.tally.failed,
        detections = report.overview.total_detections,
        correlations = report.overview.total_correlations,
        contradictions = report.contradictions.len(),
        base = %report.aggravation.base_risk_level,
        final_level = %report.aggravation.final_risk_level,
        "analysis complete"
    );

    let renderer = engine.citation_renderer();
    let citations = report
        .documents
        .detections()
        .iter()
        .chain(report.recordings.detections().iter())
        .map(|d| renderer.render(d))
        .collect();

    let output = Output {
        report: &report,
        citations,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
