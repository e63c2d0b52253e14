use crate::error::ReportError;
use crate::metrics::waste_pct;
use crate::model::{cell_text, ProductCategory, RowKind, WasteItem};
use crate::parsing::classify::{HeuristicClassifier, RowClassifier};
use crate::parsing::columns::select_waste_columns;
use crate::parsing::tables::WasteTables;
use crate::parsing::values::{normalize_name, parse_count, CellValue, MissingPolicy, MissingReason};
use crate::trace::{RowLocation, TraceBundle, TraceSeverity, TraceWarningKind};
use crate::vocab::schema::Vocabulary;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Names built only from capitals, digits and caption punctuation are
/// residual subtotals that slipped past the row classifier.
static CAPS_TOKEN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\s&/,\-]+$").expect("hardcoded caption regex is valid"));

/// Turn waste tables into line items for the most recent week.
pub fn parse_waste_items(
    tables: &WasteTables,
    vocab: &Vocabulary,
    trace: &mut TraceBundle,
) -> Result<Vec<WasteItem>, ReportError> {
    let columns = select_waste_columns(&tables.columns)?;
    let classifier = HeuristicClassifier::for_item_rows(vocab);
    let mut items = Vec::new();

    debug!(sold = %columns.sold, wasted = %columns.wasted, "selected latest week columns");

    for table in &tables.tables {
        let sold_idx = table.column_index(&columns.sold);
        let wasted_idx = table.column_index(&columns.wasted);

        for (row_index, row) in classifier.classify_rows(&table.rows).into_iter().enumerate() {
            let location = RowLocation {
                page_number: table.page_number,
                table_index: table.table_index,
                row_index: table.data_start + row_index,
            };

            let Some(raw_name) = cell_text(&row.cells, 0) else {
                trace.skip(location, "", RowKind::NoiseRow, "empty first cell");
                continue;
            };

            if row.kind != RowKind::DataRow {
                debug!(name = raw_name, kind = %row.kind, "skipping row");
                trace.skip(location, raw_name, row.kind, format!("{} row", row.kind));
                continue;
            }

            let name = normalize_name(raw_name);
            if CAPS_TOKEN_NAME.is_match(&name) {
                trace.skip(location, &name, RowKind::SubtotalRow, "capitalised caption");
                continue;
            }

            let sold = read_count(sold_idx, &row.cells);
            let wasted = read_count(wasted_idx, &row.cells);
            let (Some(sold_v), Some(wasted_v)) = (
                resolve_or_warn(&sold, "Sold", &name, location, trace),
                resolve_or_warn(&wasted, "Wasted", &name, location, trace),
            ) else {
                trace.skip(location, &name, RowKind::DataRow, "missing sold/wasted count");
                continue;
            };

            let Some(pct) = waste_pct(sold_v, wasted_v) else {
                if sold_v.is_zero() && wasted_v.is_zero() {
                    trace.skip(location, &name, RowKind::DataRow, "no sales or waste recorded");
                } else {
                    warn!(item = %name, "counts too large for waste %, dropping row");
                    trace.warn(
                        Some(location),
                        TraceWarningKind::CellConversion,
                        TraceSeverity::Important,
                        format!("Sold/Wasted for '{}' out of range, row dropped", name),
                    );
                    trace.skip(location, &name, RowKind::DataRow, "counts out of range");
                }
                continue;
            };

            let category = if vocab.is_pastry(&name) {
                ProductCategory::Pastry
            } else {
                ProductCategory::NonPastry
            };

            items.push(WasteItem {
                name,
                sold: sold_v,
                wasted: wasted_v,
                waste_pct: pct,
                category,
            });
        }
    }

    debug!(items = items.len(), "waste items parsed");
    Ok(items)
}

fn read_count(index: Option<usize>, cells: &[Option<String>]) -> CellValue {
    match index {
        Some(i) => parse_count(cell_text(cells, i)),
        None => CellValue::Missing(MissingReason::ColumnAbsent),
    }
}

fn resolve_or_warn(
    value: &CellValue,
    column: &str,
    name: &str,
    location: RowLocation,
    trace: &mut TraceBundle,
) -> Option<rust_decimal::Decimal> {
    if let Some(reason) = value.missing_reason() {
        warn!(item = name, column, %reason, "dropping row with unreadable count");
        trace.warn(
            Some(location),
            TraceWarningKind::CellConversion,
            TraceSeverity::Important,
            format!("{} for '{}': {}, row dropped", column, name, reason),
        );
    }
    value.resolve(MissingPolicy::DropRow)
}
