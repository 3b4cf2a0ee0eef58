pub mod amount;
pub mod assemble;
pub mod dates;
pub mod dedupe;
pub mod error;
pub mod extraction;
pub mod model;
pub mod patterns;
pub mod resolve;
pub mod rules;
pub mod summary;
pub mod trace;

pub use assemble::{Extraction, Extractor};
pub use model::{DocumentKind, ExtractOptions, ExtractionResult, TaskRecord, TransactionRecord};

use error::PluckError;
use extraction::TextExtractor;

/// Pull graded tasks out of syllabus text using the default settings.
pub fn extract_tasks(text: &str) -> Vec<TaskRecord> {
    Extractor::default().tasks(text)
}

/// Pull transactions out of bank statement text using the default sign rules.
pub fn extract_transactions(text: &str) -> Vec<TransactionRecord> {
    Extractor::default().transactions(text)
}

pub fn extract(text: &str, kind: DocumentKind) -> ExtractionResult {
    Extractor::default().extract(text, kind)
}

/// Main API entry point for whole documents: convert to text, enforce the
/// size limit, then extract with a trace.
///
/// Text that converts to nothing yields an empty result, not an error.
pub fn extract_document(
    document: &[u8],
    extractor: &dyn TextExtractor,
    kind: DocumentKind,
    engine: &Extractor,
) -> Result<Extraction, PluckError> {
    let text = extractor.extract_text(document)?;

    if let Some(limit) = engine.options().max_chars {
        let chars = text.chars().count();
        if chars > limit {
            return Err(PluckError::InputTooLarge { chars, limit });
        }
    }

    tracing::info!(
        backend = extractor.backend_name(),
        %kind,
        chars = text.len(),
        "extracting records"
    );
    Ok(engine.extract_with_trace(&text, kind))
}
