use std::path::PathBuf;
use tally_core::error::ReportError;
use tally_core::extraction::pdftotext::PdftotextExtractor;
use tally_core::model::ReportType;
use tally_core::vocab::{self, builtin};

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    report_type: Option<&str>,
    vocab_file: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), ReportError> {
    let expected = match report_type {
        Some(s) => Some(ReportType::from_str_loose(s).ok_or_else(|| {
            ReportError::Validation(format!(
                "unknown report type '{}'. Use 'waste' or 'single-origin'",
                s
            ))
        })?),
        None => None,
    };

    let vocabulary = match vocab_file {
        Some(path) => vocab::load_vocabulary(&path)?,
        None => builtin::default_vocabulary()?,
    };

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let analysis = tally_core::analyze_pdf(&pdf_bytes, &extractor, &vocabulary, expected)?;

    if let Some(path) = output_file {
        // Always write JSON when saving to file
        let json = serde_json::to_string_pretty(&analysis)?;
        std::fs::write(&path, json)?;
        eprintln!(
            "Analysed {} report for {}, written to {}",
            analysis.context().report_type,
            analysis.context().store_label(),
            path.display()
        );
        let trace = analysis.trace();
        for w in &trace.warnings {
            eprintln!("  warning: {}", w.message);
        }
        if !trace.skipped_rows.is_empty() {
            eprintln!("  {} row(s) skipped during parsing", trace.skipped_rows.len());
        }
        return Ok(());
    }

    match output_format {
        "json" => output::json::print(&analysis)?,
        _ => output::table::print(&analysis),
    }

    Ok(())
}
