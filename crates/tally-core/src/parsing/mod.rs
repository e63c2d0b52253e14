pub mod classify;
pub mod columns;
pub mod single_origin;
pub mod tables;
pub mod values;
pub mod waste;

use crate::error::ReportError;
use crate::extraction::DocumentContent;
use crate::model::{MixItem, ReportContext, WasteItem};
use crate::trace::TraceBundle;
use crate::vocab::schema::Vocabulary;
use tracing::info;

/// Line items parsed from a waste report, before ranking.
#[derive(Debug, Clone)]
pub struct ParsedWaste {
    pub context: ReportContext,
    pub items: Vec<WasteItem>,
    pub trace: TraceBundle,
}

/// Staff rows parsed from a single-origin report, before ranking.
#[derive(Debug, Clone)]
pub struct ParsedMix {
    pub context: ReportContext,
    pub items: Vec<MixItem>,
    pub trace: TraceBundle,
}

/// Table extraction, row classification and column normalisation for a
/// validated waste report.
pub fn parse_waste(
    doc: &DocumentContent,
    mut context: ReportContext,
    vocab: &Vocabulary,
) -> Result<ParsedWaste, ReportError> {
    let mut trace = TraceBundle::default();
    let tables = tables::extract_waste_tables(doc, &mut trace)?;
    if context.date_range.is_none() {
        context.date_range = tables.date_range.clone();
    }

    let items = waste::parse_waste_items(&tables, vocab, &mut trace)?;
    info!(
        store = context.store_label(),
        tables = tables.tables.len(),
        items = items.len(),
        skipped = trace.skipped_rows.len(),
        "parsed waste report"
    );

    Ok(ParsedWaste {
        context,
        items,
        trace,
    })
}

/// Same stages for a validated single-origin report.
pub fn parse_single_origin(
    doc: &DocumentContent,
    mut context: ReportContext,
    vocab: &Vocabulary,
) -> Result<ParsedMix, ReportError> {
    let mut trace = TraceBundle::default();
    let table = tables::extract_single_origin_table(doc)?;
    let page_number = doc.first_page().map(|p| p.page_number).unwrap_or(1);

    let staff = single_origin::parse_mix_items(table, page_number, vocab, &mut trace);
    if context.store_name.is_none() {
        context.store_name = staff.store_name;
    }

    info!(
        store = context.store_label(),
        staff = staff.items.len(),
        "parsed single origin report"
    );

    Ok(ParsedMix {
        context,
        items: staff.items,
        trace,
    })
}
