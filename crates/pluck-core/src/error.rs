use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluckError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("document has {chars} characters, limit is {limit}")]
    InputTooLarge { chars: usize, limit: usize },

    #[error("unknown document kind '{0}' (expected 'syllabus' or 'bank-statement')")]
    UnknownDocumentKind(String),

    #[error("failed to load sign rules from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid sign rules: {0}")]
    RulesetInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single pattern match did not become a record.
///
/// These never leave the extraction call; they are logged and recorded in
/// the trace, and the candidate is omitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateError {
    #[error("no match: {0}")]
    NoMatch(&'static str),

    #[error("unparseable date '{0}'")]
    DateUnparseable(String),

    #[error("unparseable amount '{0}'")]
    AmountParse(String),

    #[error("invalid description '{0}'")]
    InvalidDescription(String),
}
