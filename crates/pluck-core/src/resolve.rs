use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::dates::{self, DateNormalizer};
use crate::model::DocumentKind;
use crate::patterns::{is_task_kind, FieldRole, RawMatch};

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)[ \t]*%").expect("percent pattern is valid")
});

static AMOUNT_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-+]?\$?[-+]?\d[\d,]*(?:\.\d+)?|\(\$?\d[\d,]*(?:\.\d+)?\))$")
        .expect("amount literal pattern is valid")
});

/// Words that can end up alone in a title slot when the real title is missing.
const TITLE_FILLERS: &[&str] = &["due", "by", "on", "and"];

/// The slots filled from one match. Nothing here is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord<'t> {
    /// Title (tasks) or description (transactions), already cleaned.
    pub text: Option<String>,
    /// Canonical date.
    pub date: Option<String>,
    /// A date-shaped capture the normalizer rejected.
    pub unparsed_date: Option<&'t str>,
    pub weight: Option<Decimal>,
    /// Raw amount literal, signed later with its context.
    pub amount: Option<&'t str>,
    /// A task type keyword was seen.
    pub tagged: bool,
}

impl<'t> PartialRecord<'t> {
    fn set_date(&mut self, raw: &'t str, normalizer: &DateNormalizer) {
        if self.date.is_some() {
            return;
        }
        match normalizer.normalize(raw) {
            Some(d) => self.date = Some(d),
            None => self.unparsed_date = Some(raw),
        }
    }
}

/// Assign each non-empty capture of `m` to a slot.
///
/// The descriptor's role table says where a capture is meant to go. `Text`
/// captures are additionally tested by content, in order: task keyword,
/// date-shaped, percentage (syllabus) or bare money literal (statement),
/// and only then title/description. Slots keep their first value.
pub fn resolve<'t>(
    m: &RawMatch<'t>,
    kind: DocumentKind,
    normalizer: &DateNormalizer,
) -> PartialRecord<'t> {
    let mut partial = PartialRecord::default();

    for (role, capture) in m.fields() {
        match role {
            FieldRole::Kind => partial.tagged = true,
            FieldRole::Date => partial.set_date(capture.trim(), normalizer),
            FieldRole::Weight => {
                if partial.weight.is_none() {
                    partial.weight = parse_weight(capture);
                }
            }
            FieldRole::Amount => {
                if partial.amount.is_none() {
                    partial.amount = Some(capture.trim());
                }
            }
            FieldRole::Ignore => {}
            FieldRole::Text => match kind {
                DocumentKind::Syllabus => resolve_task_text(&mut partial, capture, normalizer),
                DocumentKind::BankStatement => {
                    resolve_statement_text(&mut partial, capture, normalizer)
                }
            },
        }
    }

    partial
}

fn resolve_task_text<'t>(
    partial: &mut PartialRecord<'t>,
    capture: &'t str,
    normalizer: &DateNormalizer,
) {
    if is_task_kind(capture) {
        partial.tagged = true;
    } else if dates::contains_date(capture) {
        partial.set_date(capture, normalizer);
    } else if capture.contains('%') {
        if partial.weight.is_none() {
            partial.weight = parse_weight(capture);
        }
    } else if partial.text.is_none() {
        let title = clean_title(capture);
        if !title.is_empty() {
            partial.text = Some(title);
        }
    }
}

fn resolve_statement_text<'t>(
    partial: &mut PartialRecord<'t>,
    capture: &'t str,
    normalizer: &DateNormalizer,
) {
    let trimmed = capture.trim();
    if dates::is_date(trimmed) {
        partial.set_date(trimmed, normalizer);
    } else if AMOUNT_LITERAL_RE.is_match(trimmed) {
        if partial.amount.is_none() {
            partial.amount = Some(trimmed);
        }
    } else if partial.text.is_none() {
        let description = clean_description(capture);
        if !description.is_empty() {
            partial.text = Some(description);
        }
    }
}

/// The first `N%` or `N.N%` in `s`.
pub fn parse_weight(s: &str) -> Option<Decimal> {
    let caps = PERCENT_RE.captures(s)?;
    Decimal::from_str(&caps[1]).ok()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace and strip leading/trailing `*`, `#`, `:` and `-`.
/// A leftover filler word ("due") is not a title.
pub fn clean_title(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let title = collapsed
        .trim_matches(|c: char| matches!(c, '*' | '#' | ':' | '-') || c.is_whitespace())
        .to_string();
    if TITLE_FILLERS.contains(&title.to_lowercase().as_str()) {
        String::new()
    } else {
        title
    }
}

/// Drop every `*`/`#` and collapse whitespace: "SQ *BLUE  BOTTLE #12" -> "SQ BLUE BOTTLE 12".
pub fn clean_description(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '*' | '#')).collect();
    collapse_whitespace(&stripped)
}
