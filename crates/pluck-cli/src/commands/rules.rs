use pluck_core::error::PluckError;
use pluck_core::rules::builtin;
use pluck_core::rules::schema::{Polarity, RuleScope, SignRuleSet};
use std::collections::HashMap;
use std::path::Path;

pub fn list() -> Result<(), PluckError> {
    println!("Available predefined sign rules:\n");
    for name in builtin::PRESETS {
        let rs = builtin::load_preset(name)?;
        println!("  {:<13} {} (v{}, {} rules)", name, rs.name, rs.version, rs.rules.len());
        if let Some(ref desc) = rs.description {
            println!("                {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), PluckError> {
    let rs = builtin::load_preset(preset)?;

    println!("{} (version {})\n", rs.name, rs.version);
    if let Some(ref desc) = rs.description {
        println!("{}\n", desc);
    }

    println!("An amount written with its own sign keeps it. Otherwise the");
    println!("first rule below with a matching term decides:\n");

    for (i, rule) in rs.rules.iter().enumerate() {
        let scope = match rule.scope {
            RuleScope::Context => "line around the amount",
            RuleScope::Description => "description",
        };
        let sign = match rule.sign {
            Polarity::Negative => "negative",
            Polarity::Positive => "positive",
        };
        println!("  {}. {} contains any of -> {}", i + 1, scope, sign);
        println!("       {}", rule.terms.join(", "));
        if let Some(ref note) = rule.note {
            println!("       ({})", note);
        }
        println!();
    }

    println!("If no rule matches, the amount is kept as written.\n");
    Ok(())
}

pub fn schema() -> Result<(), PluckError> {
    let example = serde_json::to_string_pretty(&builtin::default_ruleset())?;
    print!(
        r#"JSON Sign Rule Schema
=====================

A sign rule file decides whether an amount printed without a sign on a
bank statement is money leaving (negative) or entering (positive) the
account. Rules are tried in order and the first one that matches wins.

Top-level fields:
  name          (string, required)  Human-readable name of the rule table
  description   (string, optional)  What this rule table is for
  version       (string, required)  Version identifier (e.g., "1.0")
  rules         (array, required)   Ordered list of rules (see below)

Each rule in the "rules" array:
  scope         (string, required)  Where to look for the terms:
                                    "context"     the statement line around
                                                  the amount (20 characters
                                                  each side by default)
                                    "description" the cleaned description
  sign          (string, required)  "negative" or "positive"
  terms         (array, required)   Words or phrases, matched as whole words
                                    without regard to case. "-" matches a
                                    minus sign that does not follow a letter
                                    or digit.
  note          (string, optional)  Explanation shown by `pluck rules show`.

Example (the built-in "default" preset):
{example}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), PluckError> {
    let rs = pluck_core::rules::load_ruleset(file)?;

    println!("Sign rules '{}' (v{}) are valid.", rs.name, rs.version);
    println!("  Rules: {}", rs.rules.len());

    let warnings = shadowed_terms(&rs);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

/// Terms that can never decide anything because an earlier rule with the
/// same scope already matches them.
fn shadowed_terms(rs: &SignRuleSet) -> Vec<String> {
    let mut seen: HashMap<(RuleScope, String), usize> = HashMap::new();
    let mut warnings = Vec::new();

    for (idx, rule) in rs.rules.iter().enumerate() {
        for term in &rule.terms {
            let key = (rule.scope, term.trim().to_lowercase());
            match seen.get(&key) {
                Some(&first) if first != idx => warnings.push(format!(
                    "term '{}' in rule {} is already matched by rule {}",
                    term,
                    idx + 1,
                    first + 1
                )),
                Some(_) => {}
                None => {
                    seen.insert(key, idx);
                }
            }
        }
    }

    warnings
}
