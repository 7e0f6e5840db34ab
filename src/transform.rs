//! Staged payload rewriting: rules first, then an optional callback.

use crate::config::RewriteRule;
use crate::context::TransformContext;
use crate::message::{Action, Output};
use crate::rule::{RuleError, RuleSet};

/// Caller-supplied rewrite stage.
///
/// Receives the in-flight payload and the interception context, returns the
/// payload to carry forward.
pub type TransformFn<P> = Box<dyn Fn(P, &TransformContext<'_>) -> P + Send + Sync>;

/// A payload with one rewritable text field.
pub trait Rewritable {
    /// The text the rule stage operates on.
    fn text_mut(&mut self) -> &mut String;
}

impl Rewritable for Action {
    fn text_mut(&mut self) -> &mut String {
        &mut self.command
    }
}

impl Rewritable for Output {
    fn text_mut(&mut self) -> &mut String {
        &mut self.output
    }
}

/// A compiled rewrite stage for one payload kind.
///
/// The rule set runs first and the callback second; the order is fixed, so
/// callbacks always observe rule-rewritten payloads. Fields other than the
/// payload's text are never touched by the rule stage.
pub struct Transform<P> {
    rules: Option<RuleSet>,
    callback: Option<TransformFn<P>>,
}

impl<P> Default for Transform<P> {
    fn default() -> Self {
        Self {
            rules: None,
            callback: None,
        }
    }
}

impl<P: Rewritable> Transform<P> {
    /// Compile a transform from a rule list.
    ///
    /// Returns `None` for an empty list, so an unconfigured direction costs
    /// nothing at application time.
    pub fn from_rules(rules: &[RewriteRule]) -> Result<Option<Self>, RuleError> {
        Ok(RuleSet::compile_opt(rules)?.map(|rules| Self {
            rules: Some(rules),
            callback: None,
        }))
    }

    /// Attach a callback to run after the rule stage.
    pub fn with_callback(mut self, callback: TransformFn<P>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Number of compiled rules.
    pub fn rule_count(&self) -> usize {
        self.rules.as_ref().map_or(0, RuleSet::len)
    }

    /// Rewrite one payload.
    pub fn apply(&self, mut payload: P, ctx: &TransformContext<'_>) -> P {
        if let Some(rules) = &self.rules {
            let rewritten = rules.apply(payload.text_mut());
            *payload.text_mut() = rewritten;
        }
        if let Some(callback) = &self.callback {
            payload = callback(payload, ctx);
        }
        payload
    }
}
