//! Rule compilation and ordered application.

use regex::Regex;

use crate::config::{PatternMode, RewriteRule};

/// An ordered list of compiled rewrite rules.
///
/// Rules apply in declaration order and each rule rewrites the previous
/// rule's output, so later rules observe earlier substitutions.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

/// A single compiled rule.
#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Pattern,
    replace: String,
}

#[derive(Debug, Clone)]
enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl RuleSet {
    /// Compile a rule list from configuration.
    ///
    /// Invalid regex patterns fail here, not at application time.
    pub fn compile(rules: &[RewriteRule]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Compile a rule list, returning `None` when the list is empty.
    pub fn compile_opt(rules: &[RewriteRule]) -> Result<Option<Self>, RuleError> {
        if rules.is_empty() {
            Ok(None)
        } else {
            Self::compile(rules).map(Some)
        }
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order and return the rewritten text.
    ///
    /// A pattern that matches nothing leaves the text unchanged.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule.apply(&current);
        }
        current
    }
}

impl CompiledRule {
    fn compile(rule: &RewriteRule) -> Result<Self, RuleError> {
        let pattern = match rule.mode {
            PatternMode::Literal => Pattern::Literal(rule.pattern.clone()),
            PatternMode::Regex => {
                let regex =
                    Regex::new(&rule.pattern).map_err(|source| RuleError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
                Pattern::Regex(regex)
            }
        };

        Ok(Self {
            pattern,
            replace: rule.replace.clone(),
        })
    }

    /// Replace all occurrences of the pattern.
    fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Pattern::Literal(pattern) => text.replace(pattern.as_str(), &self.replace),
            Pattern::Regex(regex) => regex.replace_all(text, self.replace.as_str()).into_owned(),
        }
    }
}

/// Errors that can occur during rule compilation.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid regex pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
