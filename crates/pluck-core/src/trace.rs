use serde::{Deserialize, Serialize};

use crate::error::CandidateError;
use crate::model::DocumentKind;
use crate::patterns::RawMatch;

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    Accepted,
    /// Same record as an earlier accepted match.
    Duplicate,
    Rejected,
}

/// What happened to one pattern match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub pattern_id: String,
    pub offset: usize,
    pub matched_text: String,
    pub outcome: TraceOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Recoverable problems on an accepted record (e.g. a dropped due date).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionTrace {
    pub trace_schema_version: String,
    pub document_kind: DocumentKind,
    pub entries: Vec<TraceEntry>,
}

impl ExtractionTrace {
    pub fn new(document_kind: DocumentKind) -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            document_kind,
            entries: Vec::new(),
        }
    }

    /// Record a match, returning its entry index.
    pub(crate) fn push(
        &mut self,
        text: &str,
        m: &RawMatch<'_>,
        result: Result<Option<&CandidateError>, &CandidateError>,
    ) -> usize {
        let (outcome, reason, notes) = match result {
            Ok(None) => (TraceOutcome::Accepted, None, Vec::new()),
            Ok(Some(note)) => (TraceOutcome::Accepted, None, vec![note.to_string()]),
            Err(err) => (TraceOutcome::Rejected, Some(err.to_string()), Vec::new()),
        };
        self.entries.push(TraceEntry {
            pattern_id: m.pattern_id.to_string(),
            offset: m.offset(),
            matched_text: text[m.span.clone()].to_string(),
            outcome,
            reason,
            notes,
        });
        self.entries.len() - 1
    }

    pub(crate) fn mark_duplicate(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.outcome = TraceOutcome::Duplicate;
        }
    }

    pub fn count(&self, outcome: TraceOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::FieldRole;

    fn raw_match(span: std::ops::Range<usize>) -> RawMatch<'static> {
        RawMatch {
            pattern_id: "kind-title",
            roles: &[FieldRole::Kind, FieldRole::Text],
            captures: vec![Some("Quiz"), Some("Arrays")],
            span,
        }
    }

    #[test]
    fn test_push_records_outcomes() {
        let text = "Quiz 3: Arrays";
        let mut trace = ExtractionTrace::new(DocumentKind::Syllabus);

        let accepted = trace.push(text, &raw_match(0..14), Ok(None));
        let note = CandidateError::DateUnparseable("Feb 30".into());
        trace.push(text, &raw_match(0..14), Ok(Some(&note)));
        let err = CandidateError::NoMatch("no title");
        trace.push(text, &raw_match(0..4), Err(&err));

        assert_eq!(accepted, 0);
        assert_eq!(trace.entries[0].matched_text, "Quiz 3: Arrays");
        assert_eq!(trace.entries[1].notes, vec!["unparseable date 'Feb 30'"]);
        assert_eq!(trace.entries[2].reason.as_deref(), Some("no match: no title"));
        assert_eq!(trace.count(TraceOutcome::Accepted), 2);
        assert_eq!(trace.count(TraceOutcome::Rejected), 1);
    }

    #[test]
    fn test_mark_duplicate() {
        let mut trace = ExtractionTrace::new(DocumentKind::Syllabus);
        let idx = trace.push("Quiz 3: Arrays", &raw_match(0..14), Ok(None));
        trace.mark_duplicate(idx);
        trace.mark_duplicate(99);
        assert_eq!(trace.count(TraceOutcome::Duplicate), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let mut trace = ExtractionTrace::new(DocumentKind::BankStatement);
        trace.push("Quiz 3: Arrays", &raw_match(0..4), Ok(None));
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["trace_schema_version"], TRACE_SCHEMA_VERSION);
        assert_eq!(json["document_kind"], "bank-statement");
        assert_eq!(json["entries"][0]["outcome"], "accepted");
        assert!(json["entries"][0].get("reason").is_none());
        assert!(json["entries"][0].get("notes").is_none());
    }
}
