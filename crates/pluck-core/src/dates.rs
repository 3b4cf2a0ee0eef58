use chrono::{Datelike, Local, NaiveDate};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Month name or abbreviation, optionally followed by a period.
pub(crate) const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// "Jan 15", "March 3rd", "Sept. 9, 2024"
pub(crate) static MONTH_DAY: LazyLock<String> = LazyLock::new(|| {
    format!(r"\b{MONTH}[ \t]+\d{{1,2}}(?:st|nd|rd|th)?\b(?:,?[ \t]*\d{{4}}\b)?")
});

/// "1/15/24", "01-15-2024"
pub(crate) const NUMERIC_DATE: &str = r"\b\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2})\b";

/// "2024-01-15", "2024/1/5"
pub(crate) const ISO_DATE: &str = r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b";

static MONTH_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b({MONTH})[ \t]+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?[ \t]*(\d{{4}})\b)?"
    );
    Regex::new(&pattern).expect("month-name date pattern is valid")
});

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})\b")
        .expect("numeric date pattern is valid")
});

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})[/-](\d{1,2})[/-](\d{1,2})\b").expect("ISO date pattern is valid")
});

/// Converts the date spellings found in syllabi and statements into
/// canonical `YYYY-MM-DD`.
///
/// Rules are tried in order and the first one whose shape is found in the
/// input decides the outcome, even if it names an impossible day:
///
/// 1. month name + day, with an optional year (defaults to `default_year`)
/// 2. numeric `M/D/Y` or `M-D-Y`; two-digit years `>= 50` are 19xx, else 20xx
/// 3. ISO-like `Y-M-D` or `Y/M/D`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    default_year: i32,
}

impl DateNormalizer {
    /// `None` falls back to the current local calendar year.
    pub fn new(default_year: Option<i32>) -> Self {
        Self {
            default_year: default_year.unwrap_or_else(|| Local::now().year()),
        }
    }

    /// Returns the canonical date, or `None` if no rule matches or the
    /// matched month/day is not a real calendar date.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let date = if let Some(caps) = MONTH_NAME_RE.captures(raw) {
            self.from_month_name(&caps)
        } else if let Some(caps) = NUMERIC_RE.captures(raw) {
            from_numeric(&caps)
        } else if let Some(caps) = ISO_RE.captures(raw) {
            from_iso(&caps)
        } else {
            None
        }?;
        Some(date.format("%Y-%m-%d").to_string())
    }

    fn from_month_name(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => self.default_year,
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(None)
    }
}

fn from_numeric(caps: &Captures<'_>) -> Option<NaiveDate> {
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year = expand_year(&caps[3])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn from_iso(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years pivot at 50: "99" -> 1999, "24" -> 2024.
fn expand_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        Some(if year >= 50 { 1900 + year } else { 2000 + year })
    } else {
        Some(year)
    }
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.to_lowercase().chars().take(3).collect();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// True if a date-shaped token appears anywhere in `s`.
pub(crate) fn contains_date(s: &str) -> bool {
    MONTH_NAME_RE.is_match(s) || NUMERIC_RE.is_match(s) || ISO_RE.is_match(s)
}

/// True if the whole of `s` (ignoring surrounding whitespace) is one date.
pub(crate) fn is_date(s: &str) -> bool {
    let s = s.trim();
    [&*MONTH_NAME_RE, &*NUMERIC_RE, &*ISO_RE]
        .iter()
        .any(|re| re.find(s).is_some_and(|m| m.start() == 0 && m.end() == s.len()))
}
