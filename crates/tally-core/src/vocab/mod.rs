pub mod builtin;
pub mod schema;

use crate::error::ReportError;
use schema::Vocabulary;
use std::collections::HashSet;
use std::path::Path;

/// Load a vocabulary from a JSON file.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::VocabularyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_vocabulary(&content, path)
}

/// Parse a vocabulary from a JSON string.
pub fn parse_vocabulary(json: &str, source: &Path) -> Result<Vocabulary, ReportError> {
    let vocab: Vocabulary =
        serde_json::from_str(json).map_err(|e| ReportError::VocabularyLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_vocabulary(&vocab)?;
    Ok(vocab)
}

/// Parse a vocabulary from a JSON string (no file path context).
pub fn parse_vocabulary_str(json: &str) -> Result<Vocabulary, ReportError> {
    let vocab: Vocabulary = serde_json::from_str(json).map_err(ReportError::Json)?;
    validate_vocabulary(&vocab)?;
    Ok(vocab)
}

/// Validate that a vocabulary is well-formed.
pub fn validate_vocabulary(vocab: &Vocabulary) -> Result<(), ReportError> {
    if vocab.name.trim().is_empty() {
        return Err(ReportError::VocabularyInvalid(
            "name must not be empty".into(),
        ));
    }

    let lists = [
        ("excluded_categories", &vocab.excluded_categories),
        ("pastry_names", &vocab.pastry_names),
        ("header_labels", &vocab.header_labels),
    ];
    for (field, entries) in lists {
        if entries.is_empty() {
            return Err(ReportError::VocabularyInvalid(format!(
                "{} must not be empty",
                field
            )));
        }
    }

    let all_lists = lists
        .iter()
        .map(|(f, e)| (*f, *e))
        .chain([
            ("pastry_suffixes", &vocab.pastry_suffixes),
            ("staff_role_noise", &vocab.staff_role_noise),
        ]);
    for (field, entries) in all_lists {
        if entries.iter().any(|e| e.trim().is_empty()) {
            return Err(ReportError::VocabularyInvalid(format!(
                "{} contains a blank entry",
                field
            )));
        }
    }

    Ok(())
}

/// Entries that appear more than once in a list (case-insensitive).
/// Duplicates are harmless, so these are reported as warnings only.
pub fn duplicate_entries(entries: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for entry in entries {
        let key = schema::collapse_whitespace(entry).to_uppercase();
        if !seen.insert(key) && !dupes.contains(entry) {
            dupes.push(entry.clone());
        }
    }
    dupes
}
