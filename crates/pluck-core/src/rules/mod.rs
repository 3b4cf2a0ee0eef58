pub mod builtin;
pub mod schema;

use crate::error::PluckError;
use schema::SignRuleSet;
use std::path::Path;

/// Load a sign rule table from a JSON file.
pub fn load_ruleset(path: &Path) -> Result<SignRuleSet, PluckError> {
    let content = std::fs::read_to_string(path).map_err(|e| PluckError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_ruleset(&content, path)
}

/// Parse a sign rule table from a JSON string.
pub fn parse_ruleset(json: &str, source: &Path) -> Result<SignRuleSet, PluckError> {
    let ruleset: SignRuleSet = serde_json::from_str(json).map_err(|e| PluckError::RulesetLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Parse a sign rule table from a JSON string (no file path context).
pub fn parse_ruleset_str(json: &str) -> Result<SignRuleSet, PluckError> {
    let ruleset: SignRuleSet = serde_json::from_str(json).map_err(PluckError::Json)?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Validate that a sign rule table is well-formed.
///
/// Every term must be able to match something: words made of letters,
/// digits and spaces, or a lone `-`.
pub fn validate_ruleset(ruleset: &SignRuleSet) -> Result<(), PluckError> {
    if ruleset.name.trim().is_empty() {
        return Err(PluckError::RulesetInvalid("name must not be empty".into()));
    }

    for (idx, rule) in ruleset.rules.iter().enumerate() {
        if rule.terms.is_empty() {
            return Err(PluckError::RulesetInvalid(format!(
                "rule {} has no terms",
                idx + 1
            )));
        }

        for term in &rule.terms {
            let trimmed = term.trim();
            if trimmed.is_empty() {
                return Err(PluckError::RulesetInvalid(format!(
                    "rule {} has an empty term",
                    idx + 1
                )));
            }
            if trimmed != "-"
                && !trimmed
                    .chars()
                    .all(|c| c.is_alphanumeric() || c.is_whitespace())
            {
                return Err(PluckError::RulesetInvalid(format!(
                    "rule {} term '{}' can never match (use letters, digits and spaces, or a lone '-')",
                    idx + 1,
                    term
                )));
            }
        }
    }

    Ok(())
}
