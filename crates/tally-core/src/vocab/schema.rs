use serde::{Deserialize, Serialize};

/// Domain vocabulary the row classifier and ranker match names against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Category/subtotal captions, matched case-insensitively on whole names.
    pub excluded_categories: Vec<String>,
    /// Pastry name fragments, matched case-insensitively as substrings.
    pub pastry_names: Vec<String>,
    /// Markers that flag a pastry only at the end of a name, such as `(C)`.
    #[serde(default = "default_pastry_suffixes")]
    pub pastry_suffixes: Vec<String>,
    /// Role titles that appear in staff sales tables instead of people.
    #[serde(default = "default_staff_role_noise")]
    pub staff_role_noise: Vec<String>,
    /// First-cell values that mark a repeated column header.
    #[serde(default = "default_header_labels")]
    pub header_labels: Vec<String>,
}

fn default_pastry_suffixes() -> Vec<String> {
    vec!["(C)".into()]
}

fn default_staff_role_noise() -> Vec<String> {
    vec!["Cashier".into(), "Barista".into(), "Shift".into()]
}

fn default_header_labels() -> Vec<String> {
    vec!["item".into(), "header".into()]
}

impl Vocabulary {
    pub fn is_excluded_category(&self, name: &str) -> bool {
        let name = collapse_whitespace(name);
        self.excluded_categories
            .iter()
            .any(|c| collapse_whitespace(c).eq_ignore_ascii_case(&name))
    }

    pub fn is_pastry(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        contains_any(name, &self.pastry_names)
            || self
                .pastry_suffixes
                .iter()
                .any(|s| lower.ends_with(&s.trim().to_lowercase()))
    }

    pub fn is_staff_role(&self, name: &str) -> bool {
        contains_any(name, &self.staff_role_noise)
    }

    pub fn is_header_label(&self, name: &str) -> bool {
        let name = name.trim();
        self.header_labels
            .iter()
            .any(|h| h.trim().eq_ignore_ascii_case(name))
    }
}

fn contains_any(name: &str, fragments: &[String]) -> bool {
    let lower = name.to_lowercase();
    fragments
        .iter()
        .any(|f| lower.contains(&f.trim().to_lowercase()))
}

/// Collapse runs of whitespace to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
