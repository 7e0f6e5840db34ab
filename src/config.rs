//! Configuration types for the rewrite interceptors.

use serde::{Deserialize, Serialize};

use crate::rule::RuleError;

/// Rewrite rules for both directions of the execution path.
///
/// `commands` applies to outgoing command text before execution; `outputs`
/// applies to captured output text before it re-enters the agent's
/// conversation. Either list may be empty, leaving that direction untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Rules applied to command text (evaluated in order)
    pub commands: Vec<RewriteRule>,
    /// Rules applied to output text (evaluated in order)
    pub outputs: Vec<RewriteRule>,
}

impl RewriteConfig {
    /// Check if neither direction carries rules.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.outputs.is_empty()
    }
}

/// A single pattern -> replacement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// The pattern to search for
    pub pattern: String,
    /// Replacement text; regex rules may reference captures as `$1` or `${name}`
    #[serde(default)]
    pub replace: String,
    /// How the pattern is interpreted
    #[serde(default)]
    pub mode: PatternMode,
}

impl RewriteRule {
    /// Create a regex rule (the default mode).
    pub fn regex(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replace: replace.into(),
            mode: PatternMode::Regex,
        }
    }

    /// Create a literal substring rule.
    pub fn literal(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replace: replace.into(),
            mode: PatternMode::Literal,
        }
    }
}

/// Pattern matching mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    /// Plain substring, every occurrence replaced
    Literal,
    /// Regular expression, replaced globally
    #[default]
    Regex,
}

/// Errors from building an interceptor out of serialized configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}
