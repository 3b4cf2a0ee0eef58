use crate::error::PluckError;
use crate::rules::schema::{Polarity, RuleScope, SignRuleDef, SignRuleSet};

/// Available predefined sign rule tables.
pub const PRESETS: &[&str] = &["default", "conservative"];

const DEBIT_TERMS: &[&str] = &["-", "debit", "withdrawal", "purchase", "fee"];
const CREDIT_TERMS: &[&str] = &["credit", "deposit", "payment received", "refund"];
const EXPENSE_KEYWORDS: &[&str] = &[
    "coffee",
    "gas",
    "grocery",
    "uber",
    "amazon",
    "store",
    "restaurant",
];

fn rule(scope: RuleScope, sign: Polarity, terms: &[&str], note: &str) -> SignRuleDef {
    SignRuleDef {
        scope,
        sign,
        terms: terms.iter().map(|t| t.to_string()).collect(),
        note: Some(note.to_string()),
    }
}

/// Debit words, then credit words, then expense categories in the description.
pub fn default_ruleset() -> SignRuleSet {
    SignRuleSet {
        name: "default".into(),
        description: Some(
            "Context debit/credit words, then common expense categories in the description".into(),
        ),
        version: "1.0".into(),
        rules: vec![
            rule(
                RuleScope::Context,
                Polarity::Negative,
                DEBIT_TERMS,
                "money leaving the account",
            ),
            rule(
                RuleScope::Context,
                Polarity::Positive,
                CREDIT_TERMS,
                "money entering the account",
            ),
            rule(
                RuleScope::Description,
                Polarity::Negative,
                EXPENSE_KEYWORDS,
                "purchases with no sign are assumed to be spending",
            ),
        ],
    }
}

/// Like `default`, without guessing from the description.
pub fn conservative_ruleset() -> SignRuleSet {
    let mut set = default_ruleset();
    set.name = "conservative".into();
    set.description = Some("Context debit/credit words only".into());
    set.rules.retain(|r| r.scope == RuleScope::Context);
    set
}

/// Load a predefined sign rule table by name.
pub fn load_preset(name: &str) -> Result<SignRuleSet, PluckError> {
    match name {
        "default" => Ok(default_ruleset()),
        "conservative" => Ok(conservative_ruleset()),
        _ => Err(PluckError::RulesetInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::validate_ruleset;

    #[test]
    fn test_load_default_preset() {
        let rs = load_preset("default").unwrap();
        assert_eq!(rs.rules.len(), 3);
        assert_eq!(rs.rules[0].sign, Polarity::Negative);
        assert_eq!(rs.rules[2].scope, RuleScope::Description);
    }

    #[test]
    fn test_conservative_has_no_description_rules() {
        let rs = load_preset("conservative").unwrap();
        assert!(rs.rules.iter().all(|r| r.scope == RuleScope::Context));
        assert_eq!(rs.rules.len(), 2);
    }

    #[test]
    fn test_presets_are_valid() {
        for name in PRESETS {
            validate_ruleset(&load_preset(name).unwrap()).unwrap();
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}
