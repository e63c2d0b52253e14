use crate::model::{RawRow, RawTable};

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout preserves column alignment using spaces. A table is a
/// run of non-blank lines that starts with a line of at least
/// `MIN_TABLE_CELLS` cells; each run is snapped onto the column spans of its
/// widest line so every row has the same width, with `None` for empty slots.
const MIN_TABLE_CELLS: usize = 2;

/// A run of text on one line, with its character column range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split a line into segments separated by gaps of 2+ whitespace characters.
pub fn split_segments(line: &str) -> Vec<Segment> {
    let chars: Vec<char> = line.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        while i < chars.len() {
            if chars[i].is_whitespace() {
                let gap_start = i;
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                if i - gap_start >= 2 || i >= chars.len() {
                    break;
                }
            } else {
                i += 1;
                end = i;
            }
        }

        segments.push(Segment {
            start,
            end,
            text: chars[start..end].iter().collect(),
        });
    }

    segments
}

/// Find every table on a page.
pub fn detect_tables(lines: &[String]) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<Segment>> = Vec::new();

    for line in lines {
        let segments = split_segments(line);

        if segments.is_empty() {
            flush_block(&mut block, &mut tables);
            continue;
        }

        // Single-cell lines (section dividers) only continue a running block.
        if segments.len() >= MIN_TABLE_CELLS || !block.is_empty() {
            block.push(segments);
        }
    }

    flush_block(&mut block, &mut tables);
    tables
}

fn flush_block(block: &mut Vec<Vec<Segment>>, tables: &mut Vec<RawTable>) {
    while block
        .last()
        .is_some_and(|row| row.len() < MIN_TABLE_CELLS)
    {
        block.pop();
    }

    if block.len() >= 2 {
        tables.push(align_block(block));
    }
    block.clear();
}

fn align_block(rows: &[Vec<Segment>]) -> RawTable {
    // `rev()` so the first of several equally wide rows wins.
    let spans: Vec<(usize, usize)> = rows
        .iter()
        .rev()
        .max_by_key(|r| r.len())
        .map(|r| r.iter().map(|s| (s.start, s.end)).collect())
        .unwrap_or_default();

    rows.iter()
        .map(|row| {
            let mut cells: RawRow = vec![None; spans.len()];
            for segment in row {
                let col = column_for(segment, &spans);
                match cells[col] {
                    Some(ref mut text) => {
                        text.push(' ');
                        text.push_str(&segment.text);
                    }
                    None => cells[col] = Some(segment.text.clone()),
                }
            }
            cells
        })
        .collect()
}

/// Column whose span overlaps the segment most, else the nearest by centre.
fn column_for(segment: &Segment, spans: &[(usize, usize)]) -> usize {
    let best_overlap = spans
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            let overlap = segment.end.min(end).saturating_sub(segment.start.max(start));
            (i, overlap)
        })
        .filter(|&(_, overlap)| overlap > 0)
        .max_by_key(|&(_, overlap)| overlap);

    if let Some((i, _)) = best_overlap {
        return i;
    }

    let centre = (segment.start + segment.end) as f32 / 2.0;
    spans
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| (i, ((start + end) as f32 / 2.0 - centre).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_segments_keeps_single_spaces() {
        let segments = split_segments("  Almond Croissant      80     20");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Almond Croissant", "80", "20"]);
        assert_eq!(segments[0].start, 2);
        assert_eq!(segments[0].end, 18);
    }

    #[test]
    fn test_split_segments_blank_line() {
        assert!(split_segments("     ").is_empty());
    }

    #[test]
    fn test_detect_single_table_with_gaps() {
        let page = lines(&[
            "4 Weekly Food Sales by Store",
            "",
            "Item                 Sold    Wasted",
            "Almond Croissant       80        20",
            "Brownie                12",
            "",
            "Printed by head office",
        ]);
        let tables = detect_tables(&page);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.len(), 3);
        assert_eq!(table[1][0].as_deref(), Some("Almond Croissant"));
        assert_eq!(table[1][2].as_deref(), Some("20"));
        assert_eq!(table[2][1].as_deref(), Some("12"));
        assert_eq!(table[2][2], None);
    }

    #[test]
    fn test_divider_lines_stay_inside_table() {
        let page = lines(&[
            "Item                 Sold    Wasted",
            "SANDWICHES",
            "Ham Sandwich           10         2",
            "Footer note",
        ]);
        let tables = detect_tables(&page);
        assert_eq!(tables.len(), 1);
        // Trailing single-cell line is trimmed, the divider is kept.
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[0][1][0].as_deref(), Some("SANDWICHES"));
        assert_eq!(tables[0][1][1], None);
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        let page = lines(&["Store Name:     Leeds Central", "", "Something else"]);
        assert!(detect_tables(&page).is_empty());
    }
}
