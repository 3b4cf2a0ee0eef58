use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;

use crate::error::CandidateError;
use crate::rules::schema::{Polarity, RuleScope, SignRuleSet};

/// A monetary literal with its formatting noise removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAmount {
    pub value: Decimal,
    /// The literal carried its own `+`/`-` or accounting parentheses.
    pub explicit_sign: bool,
}

/// Parse a statement amount such as `-$1,234.50`, `$-5`, `+12.00` or `(7.25)`.
pub fn parse_amount(raw: &str) -> Result<ParsedAmount, CandidateError> {
    let s = raw.trim();
    let (s, parenthesized) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (s, false),
    };

    let negative = parenthesized || s.contains('-');
    let explicit_sign = negative || s.contains('+');

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '+' | '-') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(CandidateError::AmountParse(raw.to_string()));
    }

    let magnitude =
        Decimal::from_str(&cleaned).map_err(|_| CandidateError::AmountParse(raw.to_string()))?;
    let value = if negative { -magnitude } else { magnitude };

    Ok(ParsedAmount {
        value,
        explicit_sign,
    })
}

/// The slice of `text` covering `span` widened by `window` characters on
/// each side, clamped to char boundaries and to the line(s) the span is on.
///
/// Neighbouring statement rows never leak into each other's sign hints.
pub fn context_around(text: &str, span: Range<usize>, window: usize) -> &str {
    let line_start = text[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[span.end..]
        .find('\n')
        .map_or(text.len(), |i| span.end + i);

    let start = text[..span.start]
        .char_indices()
        .rev()
        .nth(window.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let start = if window == 0 { span.start } else { start };

    let end = text[span.end..]
        .char_indices()
        .nth(window)
        .map(|(i, _)| span.end + i)
        .unwrap_or(text.len());

    &text[start.max(line_start)..end.min(line_end)]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    scope: RuleScope,
    sign: Polarity,
    terms: Vec<Vec<String>>,
}

/// Applies an ordered [`SignRuleSet`] to amounts written without a sign.
///
/// Precedence: an explicit sign on the literal always wins; otherwise the
/// first rule with a term present in its scope forces the sign; otherwise
/// the literal is kept as written. This is a best-effort heuristic, not a
/// guarantee that debits and credits come out right.
#[derive(Debug, Clone)]
pub struct SignResolver {
    rules: Vec<CompiledRule>,
}

impl SignResolver {
    pub fn new(ruleset: &SignRuleSet) -> Self {
        let rules = ruleset
            .rules
            .iter()
            .map(|r| CompiledRule {
                scope: r.scope,
                sign: r.sign,
                terms: r
                    .terms
                    .iter()
                    .map(|t| tokenize(t))
                    .filter(|t| !t.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Parse `raw` and settle its sign.
    pub fn resolve(
        &self,
        raw: &str,
        context: &str,
        description: &str,
    ) -> Result<Decimal, CandidateError> {
        let parsed = parse_amount(raw)?;
        if parsed.explicit_sign {
            return Ok(parsed.value);
        }

        Ok(match self.infer(context, description) {
            Some(Polarity::Negative) => -parsed.value.abs(),
            Some(Polarity::Positive) => parsed.value.abs(),
            None => parsed.value,
        })
    }

    /// The polarity forced by the first matching rule, if any.
    pub fn infer(&self, context: &str, description: &str) -> Option<Polarity> {
        let context_tokens = tokenize(context);
        let description_tokens = tokenize(description);

        self.rules.iter().find_map(|rule| {
            let tokens = match rule.scope {
                RuleScope::Context => &context_tokens,
                RuleScope::Description => &description_tokens,
            };
            rule.terms
                .iter()
                .any(|term| contains_sequence(tokens, term))
                .then_some(rule.sign)
        })
    }
}

/// Lowercase alphanumeric words, plus `-` for each minus sign that does not
/// directly follow a letter or digit (so dates and "H-E-B" don't count).
fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut prev_alnum = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            prev_alnum = true;
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if c == '-' && !prev_alnum {
            tokens.push("-".to_string());
        }
        prev_alnum = false;
    }
    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

fn contains_sequence(tokens: &[String], term: &[String]) -> bool {
    !term.is_empty() && tokens.windows(term.len()).any(|w| w == term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::{conservative_ruleset, default_ruleset};
    use rust_decimal_macros::dec;

    fn resolver() -> SignResolver {
        SignResolver::new(&default_ruleset())
    }

    #[test]
    fn test_parse_plain_and_currency() {
        assert_eq!(parse_amount("5.50").unwrap().value, dec!(5.50));
        assert_eq!(parse_amount("$1,234.56").unwrap().value, dec!(1234.56));
        assert!(!parse_amount("$1,234.56").unwrap().explicit_sign);
    }

    #[test]
    fn test_parse_explicit_signs() {
        let neg = parse_amount("-$5.50").unwrap();
        assert_eq!(neg.value, dec!(-5.50));
        assert!(neg.explicit_sign);

        assert_eq!(parse_amount("$-5").unwrap().value, dec!(-5));
        assert_eq!(parse_amount("(7.25)").unwrap().value, dec!(-7.25));

        let pos = parse_amount("+12.00").unwrap();
        assert_eq!(pos.value, dec!(12.00));
        assert!(pos.explicit_sign);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            parse_amount("$"),
            Err(CandidateError::AmountParse(_))
        ));
        assert!(parse_amount("12.3.4").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_explicit_sign_beats_context() {
        let amt = resolver()
            .resolve("+$20.00", "REFUND FEE +$20.00", "REFUND FEE")
            .unwrap();
        assert_eq!(amt, dec!(20.00));
    }

    #[test]
    fn test_debit_context_forces_negative() {
        let amt = resolver()
            .resolve("$40.00", "01/15/2024 ATM WITHDRAWAL $40.00", "ATM WITHDRAWAL")
            .unwrap();
        assert_eq!(amt, dec!(-40.00));
    }

    #[test]
    fn test_debit_checked_before_credit() {
        let amt = resolver()
            .resolve("$3.00", "CREDIT CARD FEE $3.00", "CREDIT CARD FEE")
            .unwrap();
        assert_eq!(amt, dec!(-3.00));
    }

    #[test]
    fn test_credit_context_forces_positive() {
        let amt = resolver()
            .resolve("$1200.00", "01/15/2024 DEPOSIT PAYROLL $1200.00", "DEPOSIT PAYROLL")
            .unwrap();
        assert_eq!(amt, dec!(1200.00));
    }

    #[test]
    fn test_multi_word_credit_term() {
        let r = resolver();
        assert_eq!(
            r.infer("PAYMENT RECEIVED THANK YOU", "PAYMENT RECEIVED"),
            Some(Polarity::Positive)
        );
        assert_eq!(r.infer("PAYMENT SENT", "PAYMENT SENT"), None);
    }

    #[test]
    fn test_expense_keyword_in_description() {
        let amt = resolver()
            .resolve("$5.50", "01/15/2024 BLUE BOTTLE COFFEE $5.50", "BLUE BOTTLE COFFEE")
            .unwrap();
        assert_eq!(amt, dec!(-5.50));
    }

    #[test]
    fn test_no_hint_keeps_literal() {
        let amt = resolver()
            .resolve("$75.00", "01/15/2024 TRANSFER $75.00", "TRANSFER")
            .unwrap();
        assert_eq!(amt, dec!(75.00));
    }

    #[test]
    fn test_conservative_ignores_description() {
        let r = SignResolver::new(&conservative_ruleset());
        assert_eq!(r.infer("BLUE BOTTLE COFFEE", "BLUE BOTTLE COFFEE"), None);
    }

    #[test]
    fn test_terms_match_whole_words() {
        // "fee" inside "coffee" is not a fee.
        let r = SignResolver::new(&conservative_ruleset());
        assert_eq!(r.infer("STARBUCKS COFFEE", "STARBUCKS COFFEE"), None);
    }

    #[test]
    fn test_minus_inside_dates_and_names_is_not_bare() {
        let r = resolver();
        assert_eq!(r.infer("01-15-2024 H-E-B $5.82", "H-E-B"), None);
        assert_eq!(r.infer("TRANSFER - $5.82", "TRANSFER"), Some(Polarity::Negative));
    }

    #[test]
    fn test_context_around_clamps() {
        let text = "abcdefghij0123456789XYZ";
        assert_eq!(context_around(text, 10..20, 3), "hij0123456789XYZ");
        assert_eq!(context_around(text, 0..3, 5), "abcdefgh");
        assert_eq!(context_around(text, 20..23, 50), text);
        assert_eq!(context_around(text, 5..6, 0), "f");
    }

    #[test]
    fn test_context_around_stays_on_line() {
        let text = "01/14/2024 REFUND $9.00\n01/15/2024 SHOP $5.00\nFEE";
        let start = text.find("01/15").unwrap();
        let end = text.find("\nFEE").unwrap();
        assert_eq!(context_around(text, start..end, 20), "01/15/2024 SHOP $5.00");
    }

    #[test]
    fn test_context_around_respects_char_boundaries() {
        let text = "ééé $5.00 ééé";
        let start = text.find('$').unwrap();
        let ctx = context_around(text, start..start + 5, 2);
        assert_eq!(ctx, "é $5.00 é");
    }
}
