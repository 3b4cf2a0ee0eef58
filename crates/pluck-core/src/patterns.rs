use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::dates::{ISO_DATE, MONTH_DAY, NUMERIC_DATE};
use crate::model::DocumentKind;

/// The slot a capture group feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Task type keyword ("quiz", "midterm"); confirms relevance, fills nothing.
    Kind,
    Date,
    /// Title or description, subject to content tests.
    Text,
    Weight,
    Amount,
    /// Captured only to anchor the pattern (e.g. a running balance).
    Ignore,
}

/// One template in a cascade. `roles[i]` is the role of capture group `i + 1`.
#[derive(Debug)]
pub struct PatternDescriptor {
    pub id: &'static str,
    pub regex: Regex,
    pub roles: &'static [FieldRole],
}

/// One successful pattern application, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch<'t> {
    pub pattern_id: &'static str,
    pub roles: &'static [FieldRole],
    /// One entry per role; `None` where an optional group did not take part.
    pub captures: Vec<Option<&'t str>>,
    /// Byte range of the whole match in the source text.
    pub span: Range<usize>,
}

impl<'t> RawMatch<'t> {
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Non-empty captures paired with their roles, in group order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldRole, &'t str)> + '_ {
        self.roles
            .iter()
            .zip(self.captures.iter())
            .filter_map(|(role, cap)| match cap {
                Some(s) if !s.trim().is_empty() => Some((*role, *s)),
                _ => None,
            })
    }
}

/// Task type vocabulary, compound forms first so "final exam" wins over "final".
pub const TASK_KINDS: &[&str] = &[
    "final exam",
    "final project",
    "midterm exam",
    "assignment",
    "project",
    "quiz",
    "midterm",
    "final",
    "exam",
    "homework",
    "hw",
];

/// True if `s` is exactly one of the task type keywords.
pub fn is_task_kind(s: &str) -> bool {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    TASK_KINDS.contains(&normalized.as_str())
}

static KIND: LazyLock<String> = LazyLock::new(|| {
    let alternatives: Vec<String> = TASK_KINDS
        .iter()
        .map(|k| k.replace(' ', r"[ \t]+"))
        .collect();
    format!(r"\b({})\b(?:[ \t]*#?\d+\b)?", alternatives.join("|"))
});

static ANY_DATE: LazyLock<String> =
    LazyLock::new(|| format!("{}|{}|{}", *MONTH_DAY, NUMERIC_DATE, ISO_DATE));

const TITLE: &str = r"([^,\n]+?)";
const WEIGHT: &str = r"(\d+(?:\.\d+)?[ \t]*%)";
const SEP: &str = r"[ \t]*[:\-]?[ \t]*";
const EOL: &str = r"[ \t\r]*$";
/// Optional indentation and bullet before a line-leading task kind.
const LINE_START: &str = r"^[ \t]*(?:[-*\x{2022}][ \t]*)?";

/// `$` or cents are required so bare reference numbers aren't read as money.
/// Accounting parentheses, `(23.50)`, mark a debit.
const AMOUNT: &str = r"((?:[-+]?\$[-+]?\d[\d,]*(?:\.\d{1,2})?|[-+]?\d[\d,]*\.\d{2})\b|\(\$?\d[\d,]*\.\d{2}\))";
/// Lazy, single line, must start with something that can't be a sign.
const DESC: &str = r"([A-Za-z0-9*#][A-Za-z0-9 \t*#&.'/-]*?)";
const DESC_TO_EOL: &str = r"([A-Za-z*#][A-Za-z0-9 \t*#&.'/-]*?)[ \t\r]*$";

/// A second numeric date after the transaction date is the posting date.
static POSTED: LazyLock<String> = LazyLock::new(|| format!(r"(?:[ \t]+({NUMERIC_DATE}))?"));

fn compile(id: &'static str, pattern: &str, roles: &'static [FieldRole]) -> PatternDescriptor {
    let regex = Regex::new(&format!("(?im){pattern}"))
        .unwrap_or_else(|e| panic!("pattern '{id}' failed to compile: {e}"));
    debug_assert_eq!(regex.captures_len() - 1, roles.len(), "role table for '{id}'");
    PatternDescriptor { id, regex, roles }
}

static SYLLABUS: LazyLock<Vec<PatternDescriptor>> = LazyLock::new(|| {
    use FieldRole::*;
    let kind = &*KIND;
    let date = &*ANY_DATE;
    vec![
        compile(
            "kind-title-date",
            &format!(
                r"{kind}{SEP}{TITLE}[ \t]*,?[ \t]*(?:due{SEP})?({date})(?:[ \t]*[,\-]?[ \t]*{WEIGHT})?"
            ),
            &[Kind, Text, Date, Weight],
        ),
        compile(
            "date-kind-title",
            &format!(
                r"(?:due{SEP})?({date}){SEP}{kind}{SEP}{TITLE}(?:[ \t]*[,\-][ \t]*{WEIGHT}|{EOL})"
            ),
            &[Date, Kind, Text, Weight],
        ),
        compile(
            "date-title-kind",
            &format!(r"({date}){SEP}{TITLE}{SEP}{kind}(?:[ \t]*[,\-]?[ \t]*{WEIGHT})?"),
            &[Date, Text, Kind, Weight],
        ),
        compile(
            "kind-title-weight",
            &format!(r"{LINE_START}{kind}{SEP}{TITLE}[ \t]*[,\-]?[ \t]*{WEIGHT}"),
            &[Kind, Text, Weight],
        ),
        compile(
            "kind-title",
            &format!(r"{LINE_START}{kind}[ \t]*[:\-][ \t]*{TITLE}{EOL}"),
            &[Kind, Text],
        ),
    ]
});

static BANK_STATEMENT: LazyLock<Vec<PatternDescriptor>> = LazyLock::new(|| {
    use FieldRole::*;
    let month_day = &*MONTH_DAY;
    let posted = &*POSTED;
    vec![
        compile(
            "numeric-date-desc-amount",
            &format!(r"({NUMERIC_DATE}){posted}[ \t]+{DESC}[ \t]+{AMOUNT}"),
            &[Date, Ignore, Text, Amount],
        ),
        compile(
            "numeric-date-amount-desc",
            &format!(r"({NUMERIC_DATE}){posted}[ \t]+{AMOUNT}[ \t]+{DESC_TO_EOL}"),
            &[Date, Ignore, Amount, Text],
        ),
        compile(
            "month-day-desc-amount",
            &format!(r"({month_day})[ \t]+{DESC}[ \t]+{AMOUNT}"),
            &[Date, Text, Amount],
        ),
        compile(
            "iso-date-desc-amount",
            &format!(r"({ISO_DATE})[ \t]+{DESC}[ \t]+{AMOUNT}"),
            &[Date, Text, Amount],
        ),
        compile(
            "numeric-date-desc-amount-balance",
            &format!(
                r"({NUMERIC_DATE}){posted}[ \t]+{DESC}[ \t]+{AMOUNT}[ \t]+{AMOUNT}{EOL}"
            ),
            &[Date, Ignore, Text, Amount, Ignore],
        ),
    ]
});

/// The ordered cascade for a document kind.
pub fn cascade(kind: DocumentKind) -> &'static [PatternDescriptor] {
    match kind {
        DocumentKind::Syllabus => &SYLLABUS,
        DocumentKind::BankStatement => &BANK_STATEMENT,
    }
}

/// Run every pattern of the cascade over `text`.
///
/// Results are grouped by pattern in declaration order, then by position.
/// The same span may be reported by several patterns.
pub fn scan(text: &str, kind: DocumentKind) -> Vec<RawMatch<'_>> {
    let mut matches = Vec::new();

    for descriptor in cascade(kind) {
        let before = matches.len();
        for caps in descriptor.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let captures = (1..=descriptor.roles.len())
                .map(|i| caps.get(i).map(|m| m.as_str()))
                .collect();
            matches.push(RawMatch {
                pattern_id: descriptor.id,
                roles: descriptor.roles,
                captures,
                span: whole.range(),
            });
        }
        tracing::debug!(
            pattern = descriptor.id,
            count = matches.len() - before,
            "pattern scanned"
        );
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'t>(m: &RawMatch<'t>) -> Vec<(FieldRole, &'t str)> {
        m.fields().collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(cascade(DocumentKind::Syllabus).len(), 5);
        assert_eq!(cascade(DocumentKind::BankStatement).len(), 5);
    }

    #[test]
    fn test_kind_title_date_weight() {
        let matches = scan("Assignment 1: Essay due Jan 15, 10%", DocumentKind::Syllabus);
        let first = &matches[0];
        assert_eq!(first.pattern_id, "kind-title-date");
        assert_eq!(
            fields(first),
            vec![
                (FieldRole::Kind, "Assignment"),
                (FieldRole::Text, "Essay"),
                (FieldRole::Date, "Jan 15"),
                (FieldRole::Weight, "10%"),
            ]
        );
    }

    #[test]
    fn test_date_kind_title() {
        let matches = scan("Feb 3: Quiz 2 - Loops and recursion", DocumentKind::Syllabus);
        let m = matches
            .iter()
            .find(|m| m.pattern_id == "date-kind-title")
            .unwrap();
        assert_eq!(
            fields(m),
            vec![
                (FieldRole::Date, "Feb 3"),
                (FieldRole::Kind, "Quiz"),
                (FieldRole::Text, "Loops and recursion"),
            ]
        );
    }

    #[test]
    fn test_date_title_kind() {
        let matches = scan("March 10 Chapter 4 quiz, 5%", DocumentKind::Syllabus);
        let m = matches
            .iter()
            .find(|m| m.pattern_id == "date-title-kind")
            .unwrap();
        assert_eq!(
            fields(m),
            vec![
                (FieldRole::Date, "March 10"),
                (FieldRole::Text, "Chapter 4"),
                (FieldRole::Kind, "quiz"),
                (FieldRole::Weight, "5%"),
            ]
        );
    }

    #[test]
    fn test_compound_kind() {
        let matches = scan("Final Exam: Comprehensive, 30%", DocumentKind::Syllabus);
        let m = matches
            .iter()
            .find(|m| m.pattern_id == "kind-title-weight")
            .unwrap();
        assert_eq!(m.captures[0], Some("Final Exam"));
        assert_eq!(m.captures[1], Some("Comprehensive"));
    }

    #[test]
    fn test_patterns_do_not_cross_lines() {
        let matches = scan("Quiz 1: Syntax\nJan 20", DocumentKind::Syllabus);
        assert!(matches.iter().all(|m| !m.captures.iter().flatten().any(|c| c.contains('\n'))));
        assert!(matches.iter().all(|m| m.pattern_id != "kind-title-date"));
    }

    #[test]
    fn test_statement_date_desc_amount() {
        let matches = scan("01/15/2024 STARBUCKS COFFEE -$5.50", DocumentKind::BankStatement);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            fields(&matches[0]),
            vec![
                (FieldRole::Date, "01/15/2024"),
                (FieldRole::Text, "STARBUCKS COFFEE"),
                (FieldRole::Amount, "-$5.50"),
            ]
        );
    }

    #[test]
    fn test_statement_date_amount_desc() {
        let matches = scan("01/15/2024 -$5.50 STARBUCKS COFFEE", DocumentKind::BankStatement);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern_id, "numeric-date-amount-desc");
        assert_eq!(matches[0].captures[3], Some("STARBUCKS COFFEE"));
    }

    #[test]
    fn test_statement_month_day_and_iso() {
        let text = "JAN 15 UBER TRIP $12.40\n2024-01-16 WHOLE FOODS $80.00";
        let ids: Vec<_> = scan(text, DocumentKind::BankStatement)
            .iter()
            .map(|m| m.pattern_id)
            .collect();
        assert_eq!(ids, vec!["month-day-desc-amount", "iso-date-desc-amount"]);
    }

    #[test]
    fn test_balance_line_matches_twice() {
        let text = "01/15/2024 COFFEE SHOP -$5.50 $1,234.00";
        let matches = scan(text, DocumentKind::BankStatement);
        let ids: Vec<_> = matches.iter().map(|m| m.pattern_id).collect();
        assert_eq!(
            ids,
            vec!["numeric-date-desc-amount", "numeric-date-desc-amount-balance"]
        );
        assert!(matches.iter().all(|m| m.captures[3] == Some("-$5.50")));
    }

    #[test]
    fn test_posting_date_is_not_description() {
        let matches = scan("01/15/2024 01/16/2024 AMAZON $5.00", DocumentKind::BankStatement);
        assert_eq!(
            fields(&matches[0]),
            vec![
                (FieldRole::Date, "01/15/2024"),
                (FieldRole::Ignore, "01/16/2024"),
                (FieldRole::Text, "AMAZON"),
                (FieldRole::Amount, "$5.00"),
            ]
        );
    }

    #[test]
    fn test_parenthesized_amount() {
        let matches = scan("01/15/2024 GROCERY OUTLET (23.50)", DocumentKind::BankStatement);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].captures[3], Some("(23.50)"));
        assert_eq!(matches[0].captures[2], Some("GROCERY OUTLET"));
    }

    #[test]
    fn test_plain_integers_are_not_amounts() {
        assert!(scan("01/15/2024 CHECK 1042", DocumentKind::BankStatement).is_empty());
    }

    #[test]
    fn test_no_matches_in_prose() {
        assert!(scan("Welcome to the course.", DocumentKind::Syllabus).is_empty());
        assert!(scan("", DocumentKind::BankStatement).is_empty());
    }

    #[test]
    fn test_line_leading_patterns_need_line_start() {
        let text = "Feb 3: Quiz 2 - Loops\r\nQuiz 3: Arrays\r\n";
        let matches = scan(text, DocumentKind::Syllabus);
        let titles: Vec<_> = matches
            .iter()
            .filter(|m| m.pattern_id == "kind-title")
            .map(|m| m.captures[1])
            .collect();
        assert_eq!(titles, vec![Some("Arrays")]);
    }

    #[test]
    fn test_is_task_kind() {
        assert!(is_task_kind("Quiz"));
        assert!(is_task_kind("final   exam"));
        assert!(!is_task_kind("Essay"));
        assert!(!is_task_kind("quizzes"));
    }
}
