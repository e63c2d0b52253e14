//! Integration tests for analyze_pdf() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built DocumentContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::Cell;
use tally_core::delivery::{deliver, Attachment, DeliveryError, MailTransport, OutgoingMessage};
use tally_core::error::ReportError;
use tally_core::extraction::table::detect_tables;
use tally_core::extraction::{DocumentContent, PageContent, PdfExtractor};
use tally_core::model::{ProductCategory, RawRow, RawTable, ReportType, RowKind};
use tally_core::vocab::builtin::default_vocabulary;
use tally_core::{analyze_document, analyze_pdf, Analysis, MixAnalysis, WasteAnalysis};

struct MockExtractor {
    doc: DocumentContent,
}

impl PdfExtractor for MockExtractor {
    fn extract_document(&self, _pdf_bytes: &[u8]) -> Result<DocumentContent, ReportError> {
        Ok(self.doc.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn row(cells: &[Option<&str>]) -> RawRow {
    cells.iter().map(|c| c.map(|s| s.to_string())).collect()
}

fn item(name: &str, sold: &str, wasted: &str) -> RawRow {
    row(&[Some(name), Some("1"), Some("1"), Some(sold), Some(wasted)])
}

fn waste_table(items: Vec<RawRow>) -> RawTable {
    let mut table = vec![
        row(&[
            Some("Last 4 Weeks"),
            Some("06/01/25"),
            Some("13/01/25"),
            Some("20/01/25"),
            Some("27/01/25"),
            Some("Total"),
        ]),
        row(&[Some("Item"), Some("Sold"), Some("Wasted"), Some("Sold"), Some("Wasted")]),
    ];
    table.extend(items);
    table
}

fn waste_doc(tables: Vec<RawTable>) -> DocumentContent {
    DocumentContent {
        title: None,
        pages: vec![PageContent {
            page_number: 1,
            lines: vec![
                "4 Weekly Food Sales by Store".into(),
                "Store Name: Leeds Central      Region: North".into(),
            ],
            tables,
        }],
    }
}

fn staff_doc(title: Option<&str>, people: Vec<RawRow>) -> DocumentContent {
    let mut table = vec![
        row(&[Some("Espresso Sales"), None]),
        row(&[Some("Store"), None]),
        row(&[Some("1042"), Some("Leeds Central")]),
    ];
    table.extend(people);
    DocumentContent {
        title: title.map(|t| t.to_string()),
        pages: vec![PageContent {
            page_number: 1,
            lines: vec!["Espresso Sales Summary 12 May 2025 Page".into()],
            tables: vec![table],
        }],
    }
}

fn person(name: &str, previous: &str, current: &str) -> RawRow {
    row(&[Some("1"), Some(name), Some("10"), Some(previous), Some("12"), Some(current)])
}

fn run(doc: DocumentContent, expected: Option<ReportType>) -> Result<Analysis, ReportError> {
    let vocab = default_vocabulary().unwrap();
    analyze_pdf(&[], &MockExtractor { doc }, &vocab, expected)
}

fn run_waste(doc: DocumentContent) -> WasteAnalysis {
    match run(doc, None).unwrap() {
        Analysis::Waste(w) => w,
        other => panic!("expected waste analysis, got {:?}", other.context().report_type),
    }
}

fn run_mix(doc: DocumentContent) -> MixAnalysis {
    match run(doc, None).unwrap() {
        Analysis::SingleOrigin(m) => m,
        other => panic!("expected single-origin analysis, got {:?}", other.context().report_type),
    }
}

// ---------------------------------------------------------------------------
// Waste reports
// ---------------------------------------------------------------------------
#[test]
fn waste_pastry_item_uses_latest_week() {
    let analysis = run_waste(waste_doc(vec![waste_table(vec![item(
        "Almond Croissant",
        "80",
        "20",
    )])]));

    assert_eq!(analysis.items.len(), 1);
    let almond = &analysis.items[0];
    assert_eq!(almond.category, ProductCategory::Pastry);
    // 20 / (80 + 20)
    assert_eq!(almond.waste_pct, dec!(20.00));
    assert_eq!(analysis.pastry.items[0].name, "Almond Croissant");
    assert!(analysis.non_pastry.is_empty());
}

#[test]
fn waste_subtotal_row_excluded() {
    let analysis = run_waste(waste_doc(vec![waste_table(vec![
        item("BREAKFAST SAVOURY", "120", "5"),
        item("Bacon Roll", "40", "2"),
    ])]));

    assert_eq!(analysis.items.len(), 1);
    assert_eq!(analysis.items[0].name, "Bacon Roll");
    let skipped = &analysis.trace.skipped_rows[0];
    assert_eq!(skipped.text, "BREAKFAST SAVOURY");
    assert_eq!(skipped.kind, RowKind::SubtotalRow);
}

#[test]
fn waste_zero_activity_excluded() {
    let analysis = run_waste(waste_doc(vec![waste_table(vec![
        item("Flapjack", "0", "0"),
        item("Muffin", "9", "1"),
    ])]));

    let names: Vec<&str> = analysis.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Muffin"]);
}

#[test]
fn waste_context_carries_store_and_dates() {
    let analysis = run_waste(waste_doc(vec![waste_table(vec![item("Muffin", "9", "1")])]));
    let ctx = &analysis.context;
    assert_eq!(ctx.report_type, ReportType::Waste);
    assert_eq!(ctx.store_name.as_deref(), Some("Leeds Central"));
    let range = ctx.date_range.as_ref().unwrap();
    assert_eq!(range.start, "06/01/25");
    assert_eq!(range.end, "27/01/25");
}

#[test]
fn waste_rows_span_multiple_tables() {
    let analysis = run_waste(waste_doc(vec![
        waste_table(vec![item("Muffin", "9", "1")]),
        vec![row(&[Some("Continued")]), row(&[Some("Item")])],
        waste_table(vec![item("Pain au Chocolat", "30", "10")]),
    ]));

    assert_eq!(analysis.items.len(), 2);
    assert_eq!(analysis.pastry.len(), 1);
    assert_eq!(analysis.non_pastry.len(), 1);
    assert_eq!(analysis.trace.warnings.len(), 1);
}

#[test]
fn waste_rankings_partition_and_truncate() {
    let mut rows: Vec<RawRow> = (1..=15)
        .map(|i| item(&format!("Sandwich {i}"), "100", &i.to_string()))
        .collect();
    rows.push(item("Cinnamon Swirl", "50", "5"));
    rows.push(item("Danish Pastry", "50", "10"));
    let analysis = run_waste(waste_doc(vec![waste_table(rows)]));

    assert_eq!(analysis.items.len(), 17);
    assert_eq!(analysis.non_pastry.len(), 10);
    assert_eq!(analysis.pastry.len(), 2);

    assert!(analysis
        .non_pastry
        .items
        .iter()
        .all(|i| i.category == ProductCategory::NonPastry));
    assert!(analysis
        .pastry
        .items
        .iter()
        .all(|i| i.category == ProductCategory::Pastry));

    for list in [&analysis.non_pastry, &analysis.pastry] {
        assert!(list
            .items
            .windows(2)
            .all(|w| w[0].waste_pct >= w[1].waste_pct));
    }
    assert_eq!(analysis.non_pastry.items[0].name, "Sandwich 15");
    assert_eq!(analysis.pastry.items[0].name, "Danish Pastry");
}

#[test]
fn waste_without_tables_is_no_tables() {
    let err = run(waste_doc(vec![]), None).unwrap_err();
    assert!(matches!(err, ReportError::NoTables));
}

#[test]
fn analysis_is_idempotent() {
    let doc = waste_doc(vec![waste_table(vec![
        item("Almond Croissant", "80", "20"),
        item("Bacon Roll", "40", "2"),
        item("Muffin", "9", "1"),
    ])]);

    let first = serde_json::to_value(run(doc.clone(), None).unwrap()).unwrap();
    let second = serde_json::to_value(run(doc, None).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["kind"], "waste");
}

// ---------------------------------------------------------------------------
// Single-origin reports
// ---------------------------------------------------------------------------
#[test]
fn single_origin_improvement() {
    let analysis = run_mix(staff_doc(
        Some("Single Origin Report"),
        vec![person("Jane Doe", "30%", "45%")],
    ));

    let jane = &analysis.items[0];
    assert_eq!(jane.previous_pct, dec!(30));
    assert_eq!(jane.current_pct, dec!(45));
    assert_eq!(jane.improvement, dec!(15));
    assert_eq!(analysis.context.store_name.as_deref(), Some("Leeds Central"));
    assert_eq!(analysis.context.period.as_deref(), Some("12-May-2025"));
}

#[test]
fn single_origin_ranking_excludes_roles() {
    let analysis = run_mix(staff_doc(
        Some("Single Origin Report"),
        vec![
            person("Jane Doe", "30%", "45%"),
            person("Cashier 2", "0%", "90%"),
            person("Sam Roe", "50%", "60%"),
            person("Ali Khan", "n/a", "45%"),
        ],
    ));

    assert_eq!(analysis.items.len(), 4);
    let names: Vec<&str> = analysis.ranking.items.iter().map(|i| i.name.as_str()).collect();
    // equal mix % keeps extraction order
    assert_eq!(names, vec!["Sam Roe", "Jane Doe", "Ali Khan"]);
    assert_eq!(analysis.items[3].previous_pct, Decimal::ZERO);
    assert_eq!(analysis.trace.conversion_warnings().count(), 1);
}

#[test]
fn single_origin_marker_in_page_text() {
    let mut doc = staff_doc(None, vec![person("Jane Doe", "30%", "45%")]);
    doc.pages[0].lines.push("Single Origin".into());
    let analysis = run(doc, Some(ReportType::SingleOrigin)).unwrap();
    assert_eq!(analysis.context().report_type, ReportType::SingleOrigin);
}

// ---------------------------------------------------------------------------
// Layout text through table detection
// ---------------------------------------------------------------------------

/// Lay cells out at fixed character columns, as `pdftotext -layout` does.
fn layout_line(starts: &[usize], cells: &[&str]) -> String {
    let mut line = String::new();
    for (start, cell) in starts.iter().zip(cells) {
        if cell.is_empty() {
            continue;
        }
        while line.chars().count() < *start {
            line.push(' ');
        }
        line.push_str(cell);
    }
    line
}

fn layout_doc(title: Option<&str>, lines: Vec<String>) -> DocumentContent {
    let tables = detect_tables(&lines);
    DocumentContent {
        title: title.map(|t| t.to_string()),
        pages: vec![PageContent {
            page_number: 1,
            lines,
            tables,
        }],
    }
}

#[test]
fn waste_layout_with_header_as_first_table_row() {
    const COLS: [usize; 3] = [0, 24, 32];
    let lines = vec![
        "4 Weekly Food Sales by Store".to_string(),
        "Store Name: Leeds Central".to_string(),
        String::new(),
        layout_line(&COLS, &["Item", "Sold", "Wasted"]),
        layout_line(&COLS, &["BREAKFAST SAVOURY", "120", "5"]),
        layout_line(&COLS, &["Almond Croissant", "80", "20"]),
        layout_line(&COLS, &["Bacon Roll", "40", "2"]),
    ];
    let doc = layout_doc(None, lines);
    assert_eq!(doc.table_count(), 1);

    let vocab = default_vocabulary().unwrap();
    let analysis = match analyze_document(&doc, &vocab, Some(ReportType::Waste)).unwrap() {
        Analysis::Waste(w) => w,
        other => panic!("expected waste analysis, got {:?}", other.context().report_type),
    };

    let names: Vec<&str> = analysis.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Almond Croissant", "Bacon Roll"]);
    assert_eq!(analysis.pastry.items[0].waste_pct, dec!(20.00));
    assert_eq!(analysis.trace.skipped_rows[0].location.row_index, 1);
}

#[test]
fn single_origin_layout_with_metadata_block() {
    const COLS: [usize; 6] = [0, 8, 26, 36, 54, 66];
    let lines = vec![
        "Single Origin Sales Summary 12 May 2025 Page".to_string(),
        layout_line(&[0, 20], &["Region: North", "Area: Yorkshire"]),
        layout_line(&[0, 20], &["Manager: A Smith", "Shift: Day"]),
        String::new(),
        layout_line(&COLS, &["No", "Name", "Drinks", "Previous Mix %", "SO Drinks", "Mix %"]),
        layout_line(&COLS, &["Store"]),
        layout_line(&COLS, &["1042", "Leeds Central"]),
        layout_line(&COLS, &["1", "Jane Doe", "40", "30%", "12", "45%"]),
        layout_line(&COLS, &["2", "Sam Roe", "50", "50%", "30", "60%"]),
    ];
    let doc = layout_doc(None, lines);
    assert_eq!(doc.table_count(), 2);

    let vocab = default_vocabulary().unwrap();
    let analysis = match analyze_document(&doc, &vocab, None).unwrap() {
        Analysis::SingleOrigin(m) => m,
        other => panic!("expected single-origin analysis, got {:?}", other.context().report_type),
    };

    assert_eq!(analysis.context.store_name.as_deref(), Some("Leeds Central"));
    let names: Vec<&str> = analysis.ranking.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Sam Roe", "Jane Doe"]);
    assert_eq!(analysis.items[0].improvement, dec!(15));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------
#[test]
fn missing_marker_is_rejected() {
    let doc = staff_doc(Some("Weekly Rota"), vec![person("Jane Doe", "30%", "45%")]);
    let err = run(doc, None).unwrap_err();
    assert!(matches!(err, ReportError::Validation(_)));
}

#[test]
fn expected_type_must_match() {
    let doc = staff_doc(Some("Single Origin Report"), vec![person("Jane Doe", "30%", "45%")]);
    let err = run(doc, Some(ReportType::Waste)).unwrap_err();
    assert!(matches!(err, ReportError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------
#[derive(Default)]
struct RecordingTransport {
    calls: Cell<usize>,
}

impl MailTransport for RecordingTransport {
    fn send(&self, _message: &OutgoingMessage) -> Result<(), DeliveryError> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "recording"
    }
}

fn message(to: &str, attachments: Vec<Attachment>) -> OutgoingMessage {
    OutgoingMessage {
        from: "reports@example.com".into(),
        to: to.into(),
        subject: "Store report".into(),
        body: "Charts attached.".into(),
        attachments,
    }
}

#[test]
fn invalid_recipient_never_reaches_transport() {
    let transport = RecordingTransport::default();
    let msg = message("not-an-email", vec![Attachment::new("waste.pdf", vec![1, 2, 3])]);
    let err = deliver(&transport, &msg).unwrap_err();
    assert!(matches!(err, DeliveryError::InvalidAddress(_)));
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn empty_attachments_rejected() {
    let transport = RecordingTransport::default();
    let err = deliver(&transport, &message("manager@example.com", vec![])).unwrap_err();
    assert!(matches!(err, DeliveryError::NoAttachments));
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn multiline_subject_never_reaches_transport() {
    let transport = RecordingTransport::default();
    let mut msg = message("manager@example.com", vec![Attachment::new("waste.pdf", vec![1])]);
    msg.subject = "Weekly\r\nBcc: someone@elsewhere.com".into();
    let err = deliver(&transport, &msg).unwrap_err();
    assert!(matches!(err, DeliveryError::MultilineHeader { .. }));
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn valid_message_sent_once() {
    let transport = RecordingTransport::default();
    let msg = message("manager@example.com", vec![Attachment::new("waste.pdf", vec![1])]);
    deliver(&transport, &msg).unwrap();
    assert_eq!(transport.calls.get(), 1);
}
