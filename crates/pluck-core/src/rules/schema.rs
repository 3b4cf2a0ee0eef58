use serde::{Deserialize, Serialize};

/// Where a sign rule looks for its terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// The match plus the context window around it, within its line.
    Context,
    /// The cleaned transaction description only.
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Negative,
    Positive,
}

/// An ordered table of sign inference rules. The first rule with a matching
/// term decides the sign of an amount written without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRuleSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub rules: Vec<SignRuleDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRuleDef {
    pub scope: RuleScope,
    pub sign: Polarity,
    /// Whole words or word sequences, matched case-insensitively. A lone
    /// `-` matches a minus sign that does not follow a letter or digit.
    pub terms: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}
