use std::path::PathBuf;

use crate::delivery::DeliveryError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report rejected: {0}")]
    Validation(String),

    #[error("table extraction failed: {0}")]
    Extraction(String),

    #[error("no tables found in the uploaded PDF")]
    NoTables,

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load vocabulary from {path}: {reason}")]
    VocabularyLoad { path: PathBuf, reason: String },

    #[error("invalid vocabulary: {0}")]
    VocabularyInvalid(String),

    #[error("unknown vocabulary preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
