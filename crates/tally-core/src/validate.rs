use crate::error::ReportError;
use crate::extraction::DocumentContent;
use crate::model::{ReportContext, ReportType};
use tracing::debug;

/// Title printed on the first page of every "4 Weekly Food Sales by Store" export.
pub const WASTE_MARKER: &str = "4 Weekly Food Sales by Store";

/// Appears in the title metadata or first page of espresso sales exports.
pub const SINGLE_ORIGIN_MARKER: &str = "Single Origin";

const STORE_LABEL: &str = "store name:";

/// Confirm the document is one of the known report templates and read its
/// context. With `expected` set only that template is accepted.
///
/// Nothing is extracted from tables here; the caller stops on `Err`.
pub fn validate(
    doc: &DocumentContent,
    expected: Option<ReportType>,
) -> Result<ReportContext, ReportError> {
    let first_page = doc
        .first_page()
        .ok_or_else(|| ReportError::Validation("the PDF has no pages".into()))?;
    let first_page_text = first_page.text();

    let report_type = match expected {
        Some(ReportType::Waste) => {
            if !is_waste_report(&first_page_text) {
                return Err(ReportError::Validation(format!(
                    "this does not appear to be a valid '{}' report",
                    WASTE_MARKER
                )));
            }
            ReportType::Waste
        }
        Some(ReportType::SingleOrigin) => {
            if !is_single_origin_report(doc.title.as_deref(), &first_page_text) {
                return Err(ReportError::Validation(
                    "this PDF does not appear to be a Single Origin report".into(),
                ));
            }
            ReportType::SingleOrigin
        }
        None => detect_report_type(doc.title.as_deref(), &first_page_text).ok_or_else(|| {
            ReportError::Validation(format!(
                "unrecognised report: expected '{}' or a '{}' sales report",
                WASTE_MARKER, SINGLE_ORIGIN_MARKER
            ))
        })?,
    };

    let mut context = ReportContext::new(report_type);
    context.title = doc.title.clone();

    match report_type {
        ReportType::Waste => {
            context.store_name = first_page.lines.iter().find_map(|l| store_name_from_line(l));
        }
        ReportType::SingleOrigin => {
            context.period = first_page
                .lines
                .iter()
                .find(|l| !l.trim().is_empty())
                .and_then(|l| period_from_heading(l));
        }
    }

    debug!(
        report_type = %context.report_type,
        store = context.store_label(),
        "document validated"
    );

    Ok(context)
}

/// Waste marker is tried first; single-origin second.
pub fn detect_report_type(title: Option<&str>, first_page_text: &str) -> Option<ReportType> {
    if is_waste_report(first_page_text) {
        Some(ReportType::Waste)
    } else if is_single_origin_report(title, first_page_text) {
        Some(ReportType::SingleOrigin)
    } else {
        None
    }
}

fn is_waste_report(first_page_text: &str) -> bool {
    first_page_text.contains(WASTE_MARKER)
}

fn is_single_origin_report(title: Option<&str>, first_page_text: &str) -> bool {
    title.is_some_and(|t| t.contains(SINGLE_ORIGIN_MARKER))
        || first_page_text.contains(SINGLE_ORIGIN_MARKER)
}

/// Value of a `Store Name: <value>` line. Truncates at the next large
/// whitespace gap (3+ spaces) so trailing layout fields are not captured.
fn store_name_from_line(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if !trimmed.to_lowercase().starts_with(STORE_LABEL) {
        return None;
    }
    let after = trimmed.get(STORE_LABEL.len()..)?.trim_start();
    let value = match after.find("   ") {
        Some(gap_pos) => after[..gap_pos].trim(),
        None => after.trim(),
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Date tokens from the heading line: the three tokens before the last one,
/// joined with `-` (`"... 12 May 2025 Page"` gives `"12-May-2025"`).
fn period_from_heading(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    Some(tokens[tokens.len() - 4..tokens.len() - 1].join("-"))
}
