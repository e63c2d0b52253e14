pub mod pdftotext;
pub mod table;

use crate::error::ReportError;
use crate::model::RawTable;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
    pub tables: Vec<RawTable>,
}

impl PageContent {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Everything the parsing pipeline needs from one PDF.
#[derive(Debug, Clone, Default)]
pub struct DocumentContent {
    /// `Title` entry of the document info dictionary, if any.
    pub title: Option<String>,
    pub pages: Vec<PageContent>,
}

impl DocumentContent {
    pub fn first_page(&self) -> Option<&PageContent> {
        self.pages.first()
    }

    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

/// Trait for PDF extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text and tables from PDF bytes, one PageContent per page.
    fn extract_document(&self, pdf_bytes: &[u8]) -> Result<DocumentContent, ReportError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
