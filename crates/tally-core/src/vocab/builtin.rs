use crate::error::ReportError;
use crate::vocab::schema::Vocabulary;

const DEFAULT_JSON: &str = include_str!("../../../../vocab/default.json");

/// Available predefined vocabularies.
pub const PRESETS: &[&str] = &["default"];

/// Load a predefined vocabulary by name.
pub fn load_preset(name: &str) -> Result<Vocabulary, ReportError> {
    match name {
        "default" => {
            let vocab: Vocabulary = serde_json::from_str(DEFAULT_JSON)?;
            Ok(vocab)
        }
        _ => Err(ReportError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS.join(", "),
        }),
    }
}

/// The vocabulary used when the caller supplies none.
pub fn default_vocabulary() -> Result<Vocabulary, ReportError> {
    load_preset("default")
}
