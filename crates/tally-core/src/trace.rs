use crate::model::RowKind;
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Critical,
    Important,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceWarningKind {
    /// A cell could not be read as a number and a fallback was applied.
    CellConversion,
    /// A whole table was ignored (too few rows).
    TableDiscarded,
}

/// Where in the document a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLocation {
    pub page_number: usize,
    pub table_index: usize,
    pub row_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<RowLocation>,
    pub kind: TraceWarningKind,
    pub message: String,
    pub severity: TraceSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    pub location: RowLocation,
    pub text: String,
    pub kind: RowKind,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rows: Vec<SkippedRow>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            warnings: Vec::new(),
            skipped_rows: Vec::new(),
        }
    }
}

impl TraceBundle {
    pub fn warn(
        &mut self,
        location: Option<RowLocation>,
        kind: TraceWarningKind,
        severity: TraceSeverity,
        message: impl Into<String>,
    ) {
        self.warnings.push(TraceWarning {
            location,
            kind,
            message: message.into(),
            severity,
        });
    }

    pub fn skip(
        &mut self,
        location: RowLocation,
        text: impl Into<String>,
        kind: RowKind,
        reason: impl Into<String>,
    ) {
        self.skipped_rows.push(SkippedRow {
            location,
            text: text.into(),
            kind,
            reason: reason.into(),
        });
    }

    pub fn conversion_warnings(&self) -> impl Iterator<Item = &TraceWarning> {
        self.warnings
            .iter()
            .filter(|w| w.kind == TraceWarningKind::CellConversion)
    }
}
