use crate::error::ReportError;
use crate::extraction::DocumentContent;
use crate::model::{cell_text, DateRange, RawRow, RawTable};
use crate::parsing::columns::{deduplicate_columns, ColumnUnion};
use crate::trace::{TraceBundle, TraceSeverity, TraceWarningKind};
use tracing::debug;

/// Row marker in waste reports whose remaining cells are the week dates.
pub const PERIOD_MARKER: &str = "Last 4 Weeks";

/// Staff tables shorter than this carry only headers.
const MIN_TABLE_ROWS: usize = 3;

/// Column header row when no row names a `Sold`/`Wasted` column: row 0 is a
/// repeated page header.
const FALLBACK_HEADER_ROW: usize = 1;

/// Header cells that mark the column header row of a waste table.
const WASTE_HEADER_CELLS: [&str; 2] = ["sold", "wasted"];

/// First row of a staff table that holds a person.
pub const STAFF_DATA_START: usize = 3;

/// Row that holds the store name in a staff table.
pub const STAFF_STORE_ROW: usize = 2;

/// A table from a waste report with its header row resolved.
#[derive(Debug, Clone)]
pub struct HeadedTable {
    pub page_number: usize,
    pub table_index: usize,
    pub columns: Vec<String>,
    /// Row of the source table that `rows[0]` came from.
    pub data_start: usize,
    pub rows: Vec<RawRow>,
}

impl HeadedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[derive(Debug, Clone)]
pub struct WasteTables {
    pub tables: Vec<HeadedTable>,
    pub columns: ColumnUnion,
    pub date_range: Option<DateRange>,
}

/// Collect every table of a waste report.
///
/// The first row with a `Sold` or `Wasted` cell names the columns; rows above
/// it are page furniture and rows below it are data. Without such a row, row
/// 1 is taken as the header. Rows with every cell empty are dropped. The
/// first `Last 4 Weeks` row seen anywhere gives the date range.
pub fn extract_waste_tables(
    doc: &DocumentContent,
    trace: &mut TraceBundle,
) -> Result<WasteTables, ReportError> {
    let mut tables = Vec::new();
    let mut columns = ColumnUnion::default();
    let mut date_range = None;

    for page in &doc.pages {
        for (table_index, table) in page.tables.iter().enumerate() {
            if date_range.is_none() {
                date_range = table.iter().find_map(|row| date_range_from_row(row));
            }

            let header_at = header_row_index(table);
            let data_start = header_at + 1;
            if table.len() <= data_start {
                debug!(
                    page = page.page_number,
                    table = table_index,
                    rows = table.len(),
                    "discarding table with no data rows"
                );
                trace.warn(
                    None,
                    TraceWarningKind::TableDiscarded,
                    TraceSeverity::Info,
                    format!(
                        "Table {} on page {} has only {} row(s) and was ignored",
                        table_index + 1,
                        page.page_number,
                        table.len()
                    ),
                );
                continue;
            }

            let header = deduplicate_columns(&table[header_at]);
            columns.extend(&header);

            let rows: Vec<RawRow> = table[data_start..]
                .iter()
                .filter(|row| row.iter().any(|c| c.as_deref().is_some_and(|s| !s.trim().is_empty())))
                .cloned()
                .collect();

            tables.push(HeadedTable {
                page_number: page.page_number,
                table_index,
                columns: header,
                data_start,
                rows,
            });
        }
    }

    if tables.is_empty() {
        return Err(ReportError::NoTables);
    }

    debug!(
        tables = tables.len(),
        columns = columns.names().len(),
        "waste tables extracted"
    );

    Ok(WasteTables {
        tables,
        columns,
        date_range,
    })
}

fn header_row_index(table: &RawTable) -> usize {
    table
        .iter()
        .position(|row| {
            (0..row.len()).any(|i| {
                cell_text(row, i).is_some_and(|c| {
                    WASTE_HEADER_CELLS.iter().any(|h| c.eq_ignore_ascii_case(h))
                })
            })
        })
        .unwrap_or(FALLBACK_HEADER_ROW)
}

/// Date tokens from a `Last 4 Weeks` row: the cells after the marker, minus
/// a trailing sentinel (a cell with no digits, such as `Total`). The first
/// and last remaining tokens bound the range.
pub fn date_range_from_row(row: &[Option<String>]) -> Option<DateRange> {
    let marker_at = (0..row.len())
        .find(|&i| cell_text(row, i).is_some_and(|c| c.contains(PERIOD_MARKER)))?;

    let mut tokens: Vec<&str> = (marker_at + 1..row.len())
        .filter_map(|i| cell_text(row, i))
        .collect();

    while tokens
        .last()
        .is_some_and(|t| !t.chars().any(|c| c.is_ascii_digit()))
    {
        tokens.pop();
    }

    let start = tokens.first()?;
    let end = tokens.last()?;
    Some(DateRange {
        start: start.to_string(),
        end: end.to_string(),
    })
}

/// The staff table of a single-origin report: the largest table on the first
/// page. Metadata blocks above it are detected as small tables of their own.
pub fn extract_single_origin_table(doc: &DocumentContent) -> Result<&RawTable, ReportError> {
    // `rev()` so the first of several equally long tables wins.
    let table = doc
        .first_page()
        .and_then(|p| p.tables.iter().rev().max_by_key(|t| t.len()))
        .ok_or(ReportError::NoTables)?;

    if table.len() < MIN_TABLE_ROWS {
        return Err(ReportError::Extraction(format!(
            "staff table has only {} row(s)",
            table.len()
        )));
    }

    Ok(table)
}
