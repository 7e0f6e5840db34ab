//! Message, action, and output payloads crossing the interception points.
//!
//! Each type names the one field the rewrite layer operates on and preserves
//! everything else in a flattened map, so fields this crate does not know
//! about survive the round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Template variables supplied by the agent for observation formatting.
pub type TemplateVars = Map<String, Value>;

/// A single action proposed by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Shell command to execute
    #[serde(default)]
    pub command: String,
    /// Any additional fields, passed through unmodified
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Action {
    /// Create an action from a command string.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            other: Map::new(),
        }
    }

    /// Attach an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.other.insert(key.into(), value);
        self
    }
}

impl From<&str> for Action {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for Action {
    fn from(command: String) -> Self {
        Self::new(command)
    }
}

/// The result of executing one action.
///
/// `output` defaults to the empty string, so results that carry no output
/// field still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Captured output text
    #[serde(default)]
    pub output: String,
    /// Any additional fields (exit status, timing), passed through unmodified
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Output {
    /// Create an output from captured text.
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            other: Map::new(),
        }
    }

    /// Attach an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.other.insert(key.into(), value);
        self
    }
}

/// One conversation message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role ("assistant", "user", ...)
    #[serde(default)]
    pub role: String,
    /// Message text
    #[serde(default)]
    pub content: String,
    /// Structured fields attached to the message, including parsed actions
    #[serde(default, skip_serializing_if = "MessageExtra::is_empty")]
    pub extra: MessageExtra,
    /// Any additional fields, passed through unmodified
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Message {
    /// Create a message with no actions.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            extra: MessageExtra::default(),
            other: Map::new(),
        }
    }

    /// Attach parsed actions.
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.extra.actions = actions;
        self
    }
}

/// Structured fields nested under a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageExtra {
    /// Actions parsed out of the message, executed in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// Any additional fields, passed through unmodified
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl MessageExtra {
    /// Check if no structured fields are present.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.other.is_empty()
    }
}
