use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tally_core::model::{MixItem, RankedList, ReportContext, WasteItem};
use tally_core::trace::TraceBundle;
use tally_core::{Analysis, MixAnalysis, WasteAnalysis};

const BAR_WIDTH: usize = 40;

pub fn print(analysis: &Analysis) {
    print_context(analysis.context());
    match analysis {
        Analysis::Waste(w) => print_waste(w),
        Analysis::SingleOrigin(m) => print_mix(m),
    }
    print_trace_summary(analysis.trace());
}

fn print_context(ctx: &ReportContext) {
    println!("Store:   {}", ctx.store_label());
    if let Some(period) = ctx.period_label() {
        println!("Period:  {}", period);
    }
    println!("Report:  {}", ctx.report_type);
    println!();
}

fn print_waste(analysis: &WasteAnalysis) {
    println!("  {} line item(s) parsed\n", analysis.items.len());

    for list in [&analysis.non_pastry, &analysis.pastry] {
        print_ranked(list, |item: &WasteItem| {
            (
                item.name.clone(),
                item.waste_pct,
                format!("{}%  ({} sold, {} wasted)", item.waste_pct, item.sold, item.wasted),
            )
        });
    }
}

fn print_mix(analysis: &MixAnalysis) {
    println!("  {} staff row(s) parsed\n", analysis.items.len());

    print_ranked(&analysis.ranking, |item: &MixItem| {
        let sign = if item.improvement >= Decimal::ZERO { "+" } else { "" };
        (
            item.name.clone(),
            item.current_pct,
            format!("{}%  ({}{} vs previous)", item.current_pct, sign, item.improvement),
        )
    });
}

/// One line per entry: name, bar scaled to the largest metric, detail text.
fn print_ranked<T>(list: &RankedList<T>, describe: impl Fn(&T) -> (String, Decimal, String)) {
    println!("=== {} ===\n", list.label);

    if list.is_empty() {
        println!("  (no entries)\n");
        return;
    }

    let rows: Vec<(String, Decimal, String)> = list.items.iter().map(describe).collect();
    let max_name = rows.iter().map(|(n, _, _)| n.chars().count()).max().unwrap_or(10);
    let max_metric = rows
        .iter()
        .map(|(_, v, _)| *v)
        .max()
        .unwrap_or(Decimal::ZERO);

    for (i, (name, value, detail)) in rows.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {:<bar$}  {}",
            i + 1,
            name,
            bar(*value, max_metric),
            detail,
            width = max_name,
            bar = BAR_WIDTH
        );
    }
    println!();
}

fn bar(value: Decimal, max: Decimal) -> String {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let len = (value / max * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .clamp(1, BAR_WIDTH);
    "#".repeat(len)
}

fn print_trace_summary(trace: &TraceBundle) {
    if trace.warnings.is_empty() && trace.skipped_rows.is_empty() {
        return;
    }
    println!("Warnings:");
    for w in &trace.warnings {
        println!("  - {}", w.message);
    }
    if !trace.skipped_rows.is_empty() {
        println!(
            "  - {} row(s) skipped (headers, subtotals or unreadable values)",
            trace.skipped_rows.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(Decimal::from(50), Decimal::from(50)).len(), BAR_WIDTH);
        assert_eq!(bar(Decimal::from(25), Decimal::from(50)).len(), BAR_WIDTH / 2);
        assert_eq!(bar(Decimal::ZERO, Decimal::from(50)), "");
    }

    #[test]
    fn test_tiny_value_still_visible() {
        assert_eq!(bar(Decimal::new(1, 2), Decimal::from(100)), "#");
    }
}
