use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::amount::{context_around, SignResolver};
use crate::dates::DateNormalizer;
use crate::dedupe::{dedupe, DedupKey};
use crate::error::CandidateError;
use crate::model::{DocumentKind, ExtractOptions, ExtractionResult, TaskRecord, TransactionRecord};
use crate::patterns::{scan, RawMatch};
use crate::resolve::{resolve, PartialRecord};
use crate::rules::builtin::default_ruleset;
use crate::rules::schema::SignRuleSet;
use crate::trace::{ExtractionTrace, TraceOutcome};

/// Records plus the per-match account of how they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub trace: ExtractionTrace,
}

/// A candidate record and the trace entry it came from.
struct Candidate<R> {
    entry: Option<usize>,
    record: R,
}

impl<R: DedupKey> DedupKey for Candidate<R> {
    type Key = R::Key;

    fn dedup_key(&self) -> Self::Key {
        self.record.dedup_key()
    }
}

/// The extraction pipeline: scan, resolve roles, normalize, dedupe.
///
/// Immutable once built, so one `Extractor` can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
    normalizer: DateNormalizer,
    signs: SignResolver,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default(), &default_ruleset())
    }
}

impl Extractor {
    pub fn new(options: ExtractOptions, sign_rules: &SignRuleSet) -> Self {
        Self {
            normalizer: DateNormalizer::new(options.default_year),
            signs: SignResolver::new(sign_rules),
            options,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn extract(&self, text: &str, kind: DocumentKind) -> ExtractionResult {
        match kind {
            DocumentKind::Syllabus => ExtractionResult::Tasks(self.tasks(text)),
            DocumentKind::BankStatement => ExtractionResult::Transactions(self.transactions(text)),
        }
    }

    pub fn extract_with_trace(&self, text: &str, kind: DocumentKind) -> Extraction {
        let mut trace = ExtractionTrace::new(kind);
        let result = match kind {
            DocumentKind::Syllabus => {
                ExtractionResult::Tasks(self.assemble(text, kind, Some(&mut trace), |_, p| {
                    self.build_task(p)
                }))
            }
            DocumentKind::BankStatement => ExtractionResult::Transactions(self.assemble(
                text,
                kind,
                Some(&mut trace),
                |m, p| self.build_transaction(text, m, p).map(|r| (r, None)),
            )),
        };
        Extraction { result, trace }
    }

    pub fn tasks(&self, text: &str) -> Vec<TaskRecord> {
        self.assemble(text, DocumentKind::Syllabus, None, |_, p| self.build_task(p))
    }

    pub fn transactions(&self, text: &str) -> Vec<TransactionRecord> {
        self.assemble(text, DocumentKind::BankStatement, None, |m, p| {
            self.build_transaction(text, m, p).map(|r| (r, None))
        })
    }

    /// Shared driver. `build` turns one resolved match into a record, or
    /// says why it can't; an `Ok` may carry a note for the trace.
    fn assemble<'t, R, F>(
        &self,
        text: &'t str,
        kind: DocumentKind,
        mut trace: Option<&mut ExtractionTrace>,
        build: F,
    ) -> Vec<R>
    where
        R: DedupKey,
        F: Fn(&RawMatch<'t>, PartialRecord<'t>) -> Result<(R, Option<CandidateError>), CandidateError>,
    {
        if text.trim().is_empty() {
            tracing::debug!(%kind, "empty input, nothing to extract");
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for m in scan(text, kind) {
            let partial = resolve(&m, kind, &self.normalizer);
            let built = build(&m, partial);

            let entry = trace.as_deref_mut().map(|t| match &built {
                Ok((_, note)) => t.push(text, &m, Ok(note.as_ref())),
                Err(err) => t.push(text, &m, Err(err)),
            });

            match built {
                Ok((record, _)) => candidates.push(Candidate { entry, record }),
                Err(err) => {
                    tracing::trace!(
                        pattern = m.pattern_id,
                        offset = m.offset(),
                        reason = %err,
                        "candidate dropped"
                    );
                }
            }
        }

        let found = candidates.len();
        let all_entries: Vec<Option<usize>> = candidates.iter().map(|c| c.entry).collect();
        let kept = dedupe(candidates);

        if let Some(trace) = trace {
            let kept_entries: HashSet<usize> = kept.iter().filter_map(|c| c.entry).collect();
            for entry in all_entries.into_iter().flatten() {
                if !kept_entries.contains(&entry) {
                    trace.mark_duplicate(entry);
                }
            }
            tracing::debug!(
                %kind,
                accepted = trace.count(TraceOutcome::Accepted),
                duplicates = trace.count(TraceOutcome::Duplicate),
                rejected = trace.count(TraceOutcome::Rejected),
                "extraction finished"
            );
        } else {
            tracing::debug!(%kind, found, kept = kept.len(), "extraction finished");
        }

        kept.into_iter().map(|c| c.record).collect()
    }

    fn build_task(
        &self,
        partial: PartialRecord<'_>,
    ) -> Result<(TaskRecord, Option<CandidateError>), CandidateError> {
        let title = partial.text.ok_or(CandidateError::NoMatch("no title"))?;
        let note = match (&partial.date, partial.unparsed_date) {
            (None, Some(raw)) => Some(CandidateError::DateUnparseable(raw.to_string())),
            _ => None,
        };
        let record = TaskRecord {
            title,
            due: partial.date,
            weight: partial.weight,
        };
        Ok((record, note))
    }

    fn build_transaction(
        &self,
        text: &str,
        m: &RawMatch<'_>,
        partial: PartialRecord<'_>,
    ) -> Result<TransactionRecord, CandidateError> {
        let date = match (partial.date, partial.unparsed_date) {
            (Some(date), _) => date,
            (None, Some(raw)) => return Err(CandidateError::DateUnparseable(raw.to_string())),
            (None, None) => return Err(CandidateError::NoMatch("no date")),
        };

        let description = partial
            .text
            .ok_or(CandidateError::NoMatch("no description"))?;
        if !is_valid_description(&description) {
            return Err(CandidateError::InvalidDescription(description));
        }

        let raw_amount = partial.amount.ok_or(CandidateError::NoMatch("no amount"))?;
        let context = context_around(text, m.span.clone(), self.options.context_window);
        let amount = self.signs.resolve(raw_amount, context, &description)?;

        Ok(TransactionRecord {
            date,
            description,
            amount,
        })
    }
}

/// At least three characters and not just a number.
fn is_valid_description(description: &str) -> bool {
    description.chars().count() >= 3
        && !description
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| c.is_ascii_digit())
}
