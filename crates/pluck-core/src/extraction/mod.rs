pub mod pdftotext;

use crate::error::PluckError;

/// Trait for document-to-text backends.
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text as one string, pages separated by newlines.
    fn extract_text(&self, document: &[u8]) -> Result<String, PluckError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Treats the input bytes as UTF-8 text, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, document: &[u8]) -> Result<String, PluckError> {
        Ok(String::from_utf8_lossy(document).into_owned())
    }

    fn backend_name(&self) -> &str {
        "plain-text"
    }
}
