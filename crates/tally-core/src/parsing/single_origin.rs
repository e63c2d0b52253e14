use crate::metrics::mix_improvement;
use crate::model::{cell_text, MixItem, RawTable, RowKind};
use crate::parsing::classify::{HeuristicClassifier, RowClassifier};
use crate::parsing::columns::MixLayout;
use crate::parsing::tables::{STAFF_DATA_START, STAFF_STORE_ROW};
use crate::parsing::values::{normalize_name, parse_percentage, MissingPolicy};
use crate::trace::{RowLocation, TraceBundle, TraceSeverity, TraceWarningKind};
use crate::vocab::schema::Vocabulary;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Staff rows need more cells than this to carry mix figures.
const MIN_STAFF_ROW_CELLS: usize = 6;

/// Staff rows read from a single-origin table, plus the store name found in it.
#[derive(Debug, Clone, Default)]
pub struct StaffRows {
    pub store_name: Option<String>,
    pub items: Vec<MixItem>,
}

/// Read the staff table of a single-origin report.
///
/// Row 2 names the store; staff start at row 3. Unreadable percentages count
/// as zero rather than dropping the person.
pub fn parse_mix_items(
    table: &RawTable,
    page_number: usize,
    vocab: &Vocabulary,
    trace: &mut TraceBundle,
) -> StaffRows {
    let layout = MixLayout::detect(&table[..table.len().min(STAFF_DATA_START)]);
    let classifier = HeuristicClassifier::for_staff_rows(vocab);
    let mut out = StaffRows::default();

    debug!(positional = layout.is_positional(), "staff table layout");

    for (row_index, row) in table.iter().enumerate() {
        if row.len() < 2 || (cell_text(row, 0).is_none() && cell_text(row, 1).is_none()) {
            continue;
        }

        if row_index == STAFF_STORE_ROW && out.store_name.is_none() {
            out.store_name = cell_text(row, 1).map(normalize_name);
        }

        if row_index < STAFF_DATA_START || row.len() < MIN_STAFF_ROW_CELLS {
            continue;
        }

        let location = RowLocation {
            page_number,
            table_index: 0,
            row_index,
        };

        let Some(columns) = layout.locate(row) else {
            continue;
        };
        let (Some(raw_name), Some(current_cell)) =
            (cell_text(row, columns.name), cell_text(row, columns.current))
        else {
            trace.skip(
                location,
                cell_text(row, columns.name).unwrap_or_default(),
                RowKind::NoiseRow,
                "missing name or current mix %",
            );
            continue;
        };

        let kind = classifier.classify(&row[columns.name..]);
        if kind != RowKind::DataRow {
            trace.skip(location, raw_name, kind, format!("{} row", kind));
            continue;
        }

        let name = normalize_name(raw_name);
        let previous = percentage_or_zero(cell_text(row, columns.previous), "previous week", &name, location, trace);
        let current = percentage_or_zero(Some(current_cell), "current week", &name, location, trace);

        out.items.push(MixItem {
            improvement: mix_improvement(previous, current),
            name,
            previous_pct: previous,
            current_pct: current,
        });
    }

    debug!(staff = out.items.len(), store = out.store_name.as_deref().unwrap_or(""), "staff rows parsed");
    out
}

fn percentage_or_zero(
    cell: Option<&str>,
    column: &str,
    name: &str,
    location: RowLocation,
    trace: &mut TraceBundle,
) -> Decimal {
    let value = parse_percentage(cell);
    if let Some(reason) = value.missing_reason() {
        warn!(staff = name, column, %reason, "mix % unreadable, using 0");
        trace.warn(
            Some(location),
            TraceWarningKind::CellConversion,
            TraceSeverity::Info,
            format!("{} mix % for '{}': {}, counted as 0", column, name, reason),
        );
    }
    value.resolve(MissingPolicy::Zero).unwrap_or(Decimal::ZERO)
}
