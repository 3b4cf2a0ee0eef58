use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PluckError;

/// Which pattern set to run over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Syllabus,
    BankStatement,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Syllabus => write!(f, "syllabus"),
            DocumentKind::BankStatement => write!(f, "bank-statement"),
        }
    }
}

impl DocumentKind {
    pub fn from_str_loose(s: &str) -> Result<DocumentKind, PluckError> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "syllabus" => Ok(DocumentKind::Syllabus),
            "bank-statement" | "bank_statement" | "statement" | "bank" => {
                Ok(DocumentKind::BankStatement)
            }
            _ => Err(PluckError::UnknownDocumentKind(s.to_string())),
        }
    }
}

/// A graded item found in a syllabus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    /// Canonical `YYYY-MM-DD`.
    pub due: Option<String>,
    /// Percentage of the final grade, e.g. `10` for "10%".
    pub weight: Option<Decimal>,
}

/// A single line item from a bank statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Canonical `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    /// Negative for money leaving the account.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "kebab-case")]
pub enum ExtractionResult {
    Tasks(Vec<TaskRecord>),
    Transactions(Vec<TransactionRecord>),
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        match self {
            ExtractionResult::Tasks(t) => t.len(),
            ExtractionResult::Transactions(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            ExtractionResult::Tasks(_) => DocumentKind::Syllabus,
            ExtractionResult::Transactions(_) => DocumentKind::BankStatement,
        }
    }
}

/// Caller-tunable knobs for one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Year used for dates written without one. `None` means the current year.
    pub default_year: Option<i32>,
    /// Characters on each side of a transaction match searched for sign hints.
    pub context_window: usize,
    /// Reject documents longer than this many characters.
    pub max_chars: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_year: None,
            context_window: 20,
            max_chars: None,
        }
    }
}
