//! Context handed to rewrite callbacks.

use std::fmt;

use crate::agent::Agent;
use crate::message::Message;

/// Read-only view of the interception site, passed to rewrite callbacks.
///
/// Borrows the wrapped agent and the message whose actions are being
/// executed. During the action rewrite the message still carries the
/// original actions; during the output rewrite it carries the rewritten
/// ones. The context lives only for the duration of one callback.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    /// The agent whose execution path is being intercepted
    pub agent: &'a dyn Agent,
    /// The message carrying the actions
    pub message: &'a Message,
}

impl<'a> TransformContext<'a> {
    /// Create a new transform context.
    pub fn new(agent: &'a dyn Agent, message: &'a Message) -> Self {
        Self { agent, message }
    }
}

impl fmt::Debug for TransformContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
