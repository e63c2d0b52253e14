use crate::error::ReportError;
use crate::extraction::table::detect_tables;
use crate::extraction::{DocumentContent, PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// PDF extraction backend using pdftotext and pdfinfo (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve the column alignment that table
/// detection relies on.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_document(&self, pdf_bytes: &[u8]) -> Result<DocumentContent, ReportError> {
        if !looks_like_pdf(pdf_bytes) {
            return Err(ReportError::Validation(
                "the uploaded file is not a PDF document".into(),
            ));
        }

        // The temp file is removed when `tmpfile` drops, on every return path.
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| ReportError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| ReportError::Extraction(e.to_string()))?;
        let tmp_path = tmpfile.path().to_path_buf();

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(&tmp_path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReportError::PdftotextNotFound
                } else {
                    ReportError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ReportError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let pages = split_pages(&text);
        let title = read_title(&tmp_path);

        debug!(
            pages = pages.len(),
            tables = pages.iter().map(|p| p.tables.len()).sum::<usize>(),
            title = title.as_deref().unwrap_or(""),
            "pdftotext extraction finished"
        );

        Ok(DocumentContent { title, pages })
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// PDF files start with a `%PDF-` header, possibly after a little junk.
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// Split pdftotext output into pages (form feed is the page separator).
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<String> = page_text.lines().map(|l| l.to_string()).collect();
            let tables = detect_tables(&lines);
            PageContent {
                page_number: i + 1,
                lines,
                tables,
            }
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

/// Read the document title via `pdfinfo`. A missing tool or title is not fatal.
fn read_title(pdf_path: &Path) -> Option<String> {
    let output = match Command::new("pdfinfo").arg(pdf_path).output() {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            warn!(code = o.status.code().unwrap_or(-1), "pdfinfo failed, title unavailable");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "pdfinfo not runnable, title unavailable");
            return None;
        }
    };
    parse_pdfinfo_title(&String::from_utf8_lossy(&output.stdout))
}

fn parse_pdfinfo_title(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("Title:"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
