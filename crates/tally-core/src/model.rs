use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a table as it came out of the PDF, cell text verbatim.
pub type RawRow = Vec<Option<String>>;

/// All rows of one table, in extraction order.
pub type RawTable = Vec<RawRow>;

/// Returns the trimmed text of a cell, or `None` when the cell is null or blank.
pub fn cell_text(row: &[Option<String>], index: usize) -> Option<&str> {
    row.get(index)
        .and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    Waste,
    SingleOrigin,
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Waste => write!(f, "waste"),
            ReportType::SingleOrigin => write!(f, "single-origin"),
        }
    }
}

impl ReportType {
    pub fn from_str_loose(s: &str) -> Option<ReportType> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "waste" | "food" | "food-sales" => Some(ReportType::Waste),
            "single-origin" | "single_origin" | "singleorigin" | "so" => {
                Some(ReportType::SingleOrigin)
            }
            _ => None,
        }
    }
}

/// Category assigned to a table row by the row classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    DataRow,
    HeaderRow,
    SubtotalRow,
    NoiseRow,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::DataRow => write!(f, "data"),
            RowKind::HeaderRow => write!(f, "header"),
            RowKind::SubtotalRow => write!(f, "subtotal"),
            RowKind::NoiseRow => write!(f, "noise"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    pub kind: RowKind,
    pub cells: RawRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Metadata read once per document and carried alongside every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    pub report_type: ReportType,
    pub store_name: Option<String>,
    pub date_range: Option<DateRange>,
    /// Free-form period label (single-origin reports carry one date, not a range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ReportContext {
    pub fn new(report_type: ReportType) -> Self {
        Self {
            report_type,
            store_name: None,
            date_range: None,
            period: None,
            title: None,
        }
    }

    pub fn store_label(&self) -> &str {
        self.store_name.as_deref().unwrap_or("Unknown Store")
    }

    pub fn period_label(&self) -> Option<String> {
        self.date_range
            .as_ref()
            .map(|r| r.to_string())
            .or_else(|| self.period.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Pastry,
    NonPastry,
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductCategory::Pastry => write!(f, "Pastries"),
            ProductCategory::NonPastry => write!(f, "Non Pastries"),
        }
    }
}

/// A sellable item from a waste report with its latest-week counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteItem {
    pub name: String,
    pub sold: Decimal,
    pub wasted: Decimal,
    pub waste_pct: Decimal,
    pub category: ProductCategory,
}

/// A staff member's single-origin share of espresso drinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixItem {
    pub name: String,
    pub previous_pct: Decimal,
    pub current_pct: Decimal,
    pub improvement: Decimal,
}

/// Top entries of one bucket, sorted by descending metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedList<T> {
    pub label: String,
    pub metric: String,
    pub items: Vec<T>,
}

impl<T> RankedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
