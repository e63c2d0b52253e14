use crate::vocab::schema::collapse_whitespace;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a cell did not yield a usable number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum MissingReason {
    Empty,
    Unparseable(String),
    Negative(Decimal),
    OutOfRange(Decimal),
    ColumnAbsent,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Empty => write!(f, "empty cell"),
            MissingReason::Unparseable(s) => write!(f, "unparseable value '{s}'"),
            MissingReason::Negative(v) => write!(f, "negative value {v}"),
            MissingReason::OutOfRange(v) => write!(f, "percentage {v} outside 0-100"),
            MissingReason::ColumnAbsent => write!(f, "column not present in this table"),
        }
    }
}

/// Outcome of reading a numeric cell. Callers decide what `Missing` means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Parsed(Decimal),
    Missing(MissingReason),
}

/// What a pipeline does with a `Missing` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// The row carries no signal without this value.
    DropRow,
    /// Absence counts as zero activity.
    Zero,
}

impl CellValue {
    /// Apply a recovery policy. `None` means the row must be dropped.
    pub fn resolve(&self, policy: MissingPolicy) -> Option<Decimal> {
        match (self, policy) {
            (CellValue::Parsed(v), _) => Some(*v),
            (CellValue::Missing(_), MissingPolicy::Zero) => Some(Decimal::ZERO),
            (CellValue::Missing(_), MissingPolicy::DropRow) => None,
        }
    }

    pub fn missing_reason(&self) -> Option<&MissingReason> {
        match self {
            CellValue::Missing(reason) => Some(reason),
            CellValue::Parsed(_) => None,
        }
    }
}

/// Parse a numeric cell from a report table.
///
/// Handles formats like:
/// - "80" -> Parsed(80)
/// - "45%" / "45 %" -> Parsed(45)
/// - "1,204" -> Parsed(1204)
/// - "", "-" -> Missing(Empty)
/// - "n/a" -> Missing(Unparseable)
pub fn parse_number(cell: Option<&str>) -> CellValue {
    let s = match cell.map(str::trim) {
        Some(s) if !s.is_empty() && s != "-" && s != "—" => s,
        _ => return CellValue::Missing(MissingReason::Empty),
    };

    let cleaned: String = s
        .chars()
        .filter(|c| *c != '%' && *c != ',' && !c.is_whitespace())
        .collect();

    match Decimal::from_str(&cleaned) {
        Ok(v) => CellValue::Parsed(v),
        Err(_) => CellValue::Missing(MissingReason::Unparseable(s.to_string())),
    }
}

/// Parse a unit count (sold, wasted). Negative counts are not meaningful.
pub fn parse_count(cell: Option<&str>) -> CellValue {
    match parse_number(cell) {
        CellValue::Parsed(v) if v < Decimal::ZERO => {
            CellValue::Missing(MissingReason::Negative(v))
        }
        other => other,
    }
}

/// Parse a percentage cell, which must fall within 0-100.
pub fn parse_percentage(cell: Option<&str>) -> CellValue {
    match parse_number(cell) {
        CellValue::Parsed(v) if v < Decimal::ZERO || v > Decimal::ONE_HUNDRED => {
            CellValue::Missing(MissingReason::OutOfRange(v))
        }
        other => other,
    }
}

/// Collapse internal whitespace runs in an item or staff name and trim.
pub fn normalize_name(raw: &str) -> String {
    collapse_whitespace(raw)
}
