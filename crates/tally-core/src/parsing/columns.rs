use crate::error::ReportError;
use crate::model::{cell_text, RawRow};
use std::collections::HashMap;

/// Suffix repeated column names with an incrementing counter
/// (`Sold`, `Sold.1`, `Sold.2`, ...). Blank headers become `""`, `".1"`, ...
pub fn deduplicate_columns(headers: &[Option<String>]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .map(|h| {
            let name = h.as_deref().map(str::trim).unwrap_or_default().to_string();
            match seen.get_mut(&name) {
                Some(count) => {
                    *count += 1;
                    format!("{}.{}", name, count)
                }
                None => {
                    seen.insert(name.clone(), 0);
                    name
                }
            }
        })
        .collect()
}

/// Ordered union of column names across concatenated tables (first-seen order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnUnion {
    names: Vec<String>,
}

impl ColumnUnion {
    pub fn extend(&mut self, columns: &[String]) {
        for c in columns {
            if !self.names.contains(c) {
                self.names.push(c.clone());
            }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The rightmost column whose name contains `needle`.
    pub fn last_containing(&self, needle: &str) -> Option<&str> {
        self.names
            .iter()
            .rev()
            .find(|n| n.contains(needle))
            .map(String::as_str)
    }
}

/// The Sold/Wasted pair for the most recent week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasteColumns {
    pub sold: String,
    pub wasted: String,
}

/// Reports repeat the Sold/Wasted family once per week, left to right, so
/// the last occurrence is the latest week.
pub fn select_waste_columns(columns: &ColumnUnion) -> Result<WasteColumns, ReportError> {
    let sold = columns.last_containing("Sold").ok_or_else(|| {
        ReportError::Extraction("no 'Sold' column found in any table header".into())
    })?;
    let wasted = columns.last_containing("Wasted").ok_or_else(|| {
        ReportError::Extraction("no 'Wasted' column found in any table header".into())
    })?;
    Ok(WasteColumns {
        sold: sold.to_string(),
        wasted: wasted.to_string(),
    })
}

/// Positional conventions used when a staff table has no usable header.
pub const POSITIONAL_NAME_INDEX: usize = 1;
const POSITIONAL_PREVIOUS_FROM_END: usize = 3;
const POSITIONAL_CURRENT_FROM_END: usize = 1;

/// Cell indices for one staff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixColumns {
    pub name: usize,
    pub previous: usize,
    pub current: usize,
}

/// How staff rows map onto name / previous mix % / current mix %.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixLayout {
    /// Located from a header row of the given width.
    Named { columns: MixColumns, width: usize },
    /// The trailing columns vary by store, but the last two numeric columns
    /// are always previous-week and current-week mix %, at -3 and -1.
    Positional,
}

impl MixLayout {
    /// Look for a header row naming the previous-week and mix % columns.
    pub fn detect(header_rows: &[RawRow]) -> MixLayout {
        header_rows
            .iter()
            .find_map(named_layout)
            .unwrap_or(MixLayout::Positional)
    }

    /// Indices for `row`, or `None` when the row is too short for any layout.
    pub fn locate(&self, row: &[Option<String>]) -> Option<MixColumns> {
        match self {
            MixLayout::Named { columns, width } if row.len() == *width => Some(*columns),
            _ => positional_columns(row.len()),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, MixLayout::Positional)
    }
}

fn named_layout(row: &RawRow) -> Option<MixLayout> {
    let lower: Vec<String> = (0..row.len())
        .map(|i| cell_text(row, i).unwrap_or_default().to_lowercase())
        .collect();

    let previous = lower.iter().position(|c| c.contains("previous"))?;
    let current = lower
        .iter()
        .enumerate()
        .rev()
        .find(|(i, c)| *i != previous && c.contains("mix"))
        .map(|(i, _)| i)?;
    let name = lower
        .iter()
        .position(|c| c.contains("name"))
        .unwrap_or(POSITIONAL_NAME_INDEX);

    Some(MixLayout::Named {
        columns: MixColumns {
            name,
            previous,
            current,
        },
        width: row.len(),
    })
}

fn positional_columns(width: usize) -> Option<MixColumns> {
    if width < POSITIONAL_PREVIOUS_FROM_END.max(POSITIONAL_NAME_INDEX + 1) {
        return None;
    }
    Some(MixColumns {
        name: POSITIONAL_NAME_INDEX,
        previous: width - POSITIONAL_PREVIOUS_FROM_END,
        current: width - POSITIONAL_CURRENT_FROM_END,
    })
}
