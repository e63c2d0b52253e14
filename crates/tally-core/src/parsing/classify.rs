use crate::model::{cell_text, ClassifiedRow, RawRow, RowKind};
use crate::vocab::schema::Vocabulary;

/// Assigns exactly one `RowKind` to a table row.
pub trait RowClassifier {
    fn classify(&self, row: &[Option<String>]) -> RowKind;

    fn classify_rows(&self, rows: &[RawRow]) -> Vec<ClassifiedRow> {
        rows.iter()
            .map(|row| ClassifiedRow {
                kind: self.classify(row),
                cells: row.clone(),
            })
            .collect()
    }
}

/// One heuristic over the first cell. Returns `Some` when it recognises the row.
pub trait RowRule {
    fn name(&self) -> &str;
    fn apply(&self, first_cell: &str) -> Option<RowKind>;
}

/// Table captions repeated as rows ("Item", "Header").
pub struct HeaderLabelRule<'a>(pub &'a Vocabulary);

impl RowRule for HeaderLabelRule<'_> {
    fn name(&self) -> &str {
        "header-label"
    }

    fn apply(&self, first_cell: &str) -> Option<RowKind> {
        self.0
            .is_header_label(first_cell)
            .then_some(RowKind::HeaderRow)
    }
}

/// Known category aggregates such as "SANDWICHES".
pub struct SubtotalLabelRule<'a>(pub &'a Vocabulary);

impl RowRule for SubtotalLabelRule<'_> {
    fn name(&self) -> &str {
        "subtotal-label"
    }

    fn apply(&self, first_cell: &str) -> Option<RowKind> {
        self.0
            .is_excluded_category(first_cell)
            .then_some(RowKind::SubtotalRow)
    }
}

/// Cells made only of digits, punctuation and spaces (page numbers, totals).
pub struct NumericOnlyRule;

impl RowRule for NumericOnlyRule {
    fn name(&self) -> &str {
        "numeric-only"
    }

    fn apply(&self, first_cell: &str) -> Option<RowKind> {
        first_cell
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_punctuation() || c.is_whitespace())
            .then_some(RowKind::NoiseRow)
    }
}

/// Section dividers are rendered in full capitals.
pub struct AllCapsRule;

impl RowRule for AllCapsRule {
    fn name(&self) -> &str {
        "all-caps"
    }

    fn apply(&self, first_cell: &str) -> Option<RowKind> {
        let has_letters = first_cell.chars().any(char::is_alphabetic);
        let has_lower = first_cell.chars().any(char::is_lowercase);
        (has_letters && !has_lower).then_some(RowKind::NoiseRow)
    }
}

/// Anything with a letter in it names something.
pub struct AlphabeticDataRule;

impl RowRule for AlphabeticDataRule {
    fn name(&self) -> &str {
        "alphabetic"
    }

    fn apply(&self, first_cell: &str) -> Option<RowKind> {
        first_cell
            .chars()
            .any(char::is_alphabetic)
            .then_some(RowKind::DataRow)
    }
}

/// Ordered chain of rules; the first rule that fires decides. Rows no rule
/// recognises, and rows with an empty first cell, are noise.
pub struct HeuristicClassifier<'a> {
    rules: Vec<Box<dyn RowRule + 'a>>,
}

impl<'a> HeuristicClassifier<'a> {
    pub fn new(rules: Vec<Box<dyn RowRule + 'a>>) -> Self {
        Self { rules }
    }

    /// Rules for product tables in waste reports.
    pub fn for_item_rows(vocab: &'a Vocabulary) -> Self {
        Self::new(vec![
            Box::new(HeaderLabelRule(vocab)),
            Box::new(SubtotalLabelRule(vocab)),
            Box::new(NumericOnlyRule),
            Box::new(AllCapsRule),
            Box::new(AlphabeticDataRule),
        ])
    }

    /// Rules for staff tables. Staff names may be exported in capitals, so
    /// the all-caps divider heuristic does not apply.
    pub fn for_staff_rows(vocab: &'a Vocabulary) -> Self {
        Self::new(vec![
            Box::new(HeaderLabelRule(vocab)),
            Box::new(NumericOnlyRule),
            Box::new(AlphabeticDataRule),
        ])
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl RowClassifier for HeuristicClassifier<'_> {
    fn classify(&self, row: &[Option<String>]) -> RowKind {
        let Some(first_cell) = cell_text(row, 0) else {
            return RowKind::NoiseRow;
        };
        self.rules
            .iter()
            .find_map(|rule| rule.apply(first_cell))
            .unwrap_or(RowKind::NoiseRow)
    }
}
