pub mod delivery;
pub mod error;
pub mod extraction;
pub mod metrics;
pub mod model;
pub mod parsing;
pub mod ranking;
pub mod trace;
pub mod validate;
pub mod vocab;

use error::ReportError;
use extraction::{DocumentContent, PdfExtractor};
use model::{MixItem, RankedList, ReportContext, ReportType, WasteItem};
use serde::{Deserialize, Serialize};
use trace::TraceBundle;
use tracing::info;
use vocab::schema::Vocabulary;

/// Result of analysing a "4 Weekly Food Sales by Store" report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteAnalysis {
    pub context: ReportContext,
    /// Every line item that survived parsing, in extraction order.
    pub items: Vec<WasteItem>,
    pub non_pastry: RankedList<WasteItem>,
    pub pastry: RankedList<WasteItem>,
    pub trace: TraceBundle,
}

/// Result of analysing a single-origin espresso sales report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixAnalysis {
    pub context: ReportContext,
    pub items: Vec<MixItem>,
    pub ranking: RankedList<MixItem>,
    pub trace: TraceBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Analysis {
    Waste(WasteAnalysis),
    SingleOrigin(MixAnalysis),
}

impl Analysis {
    pub fn context(&self) -> &ReportContext {
        match self {
            Analysis::Waste(a) => &a.context,
            Analysis::SingleOrigin(a) => &a.context,
        }
    }

    pub fn trace(&self) -> &TraceBundle {
        match self {
            Analysis::Waste(a) => &a.trace,
            Analysis::SingleOrigin(a) => &a.trace,
        }
    }
}

/// Main API entry point: validate, parse and rank one uploaded PDF.
///
/// With `expected` set, only that report template is accepted; otherwise the
/// template is detected from the first page and the title metadata.
pub fn analyze_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    vocab: &Vocabulary,
    expected: Option<ReportType>,
) -> Result<Analysis, ReportError> {
    let doc = extractor.extract_document(pdf_bytes)?;
    info!(
        backend = extractor.backend_name(),
        pages = doc.pages.len(),
        tables = doc.table_count(),
        "extracted document"
    );
    analyze_document(&doc, vocab, expected)
}

/// Same as [`analyze_pdf`] for content that has already been extracted.
pub fn analyze_document(
    doc: &DocumentContent,
    vocab: &Vocabulary,
    expected: Option<ReportType>,
) -> Result<Analysis, ReportError> {
    let context = validate::validate(doc, expected)?;
    match context.report_type {
        ReportType::Waste => analyze_waste(doc, context, vocab).map(Analysis::Waste),
        ReportType::SingleOrigin => {
            analyze_single_origin(doc, context, vocab).map(Analysis::SingleOrigin)
        }
    }
}

fn analyze_waste(
    doc: &DocumentContent,
    context: ReportContext,
    vocab: &Vocabulary,
) -> Result<WasteAnalysis, ReportError> {
    let parsed = parsing::parse_waste(doc, context, vocab)?;
    let ranking = ranking::rank_waste(&parsed.items, ranking::TOP_N);

    Ok(WasteAnalysis {
        context: parsed.context,
        items: parsed.items,
        non_pastry: ranking.non_pastry,
        pastry: ranking.pastry,
        trace: parsed.trace,
    })
}

fn analyze_single_origin(
    doc: &DocumentContent,
    context: ReportContext,
    vocab: &Vocabulary,
) -> Result<MixAnalysis, ReportError> {
    let parsed = parsing::parse_single_origin(doc, context, vocab)?;
    let ranking = ranking::rank_mix(&parsed.items, vocab, ranking::TOP_N);

    Ok(MixAnalysis {
        context: parsed.context,
        items: parsed.items,
        ranking,
        trace: parsed.trace,
    })
}
