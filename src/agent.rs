//! Action-layer interception.

use async_trait::async_trait;
use tracing::{debug, info, trace};

use crate::config::{ConfigError, RewriteConfig};
use crate::context::TransformContext;
use crate::env::Environment;
use crate::message::{Action, Message, Output, TemplateVars};
use crate::rule::RuleError;
use crate::transform::{Transform, TransformFn};

/// Agent capabilities the action layer builds on.
///
/// `execute_actions` is the operation the interceptor overrides. The
/// provided body is the plain path: run each of the message's actions in
/// order through the environment, then format the outputs as observation
/// messages and append them to the conversation.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The execution environment actions run in.
    fn env(&self) -> &dyn Environment;

    /// Template variables for observation formatting.
    fn template_vars(&self) -> TemplateVars;

    /// Render execution outputs as observation messages.
    fn format_observation_messages(
        &self,
        message: &Message,
        outputs: &[Output],
        vars: &TemplateVars,
    ) -> Vec<Message>;

    /// Append messages to the conversation, returning the appended messages.
    fn append_messages(&mut self, messages: Vec<Message>) -> Vec<Message>;

    /// Execute the actions of one message and fold the outputs into the
    /// conversation.
    async fn execute_actions(&mut self, message: &Message) -> anyhow::Result<Vec<Message>> {
        let mut outputs = Vec::with_capacity(message.extra.actions.len());
        for action in &message.extra.actions {
            outputs.push(self.env().execute(action.clone()).await?);
        }

        let vars = self.template_vars();
        let observations = self.format_observation_messages(message, &outputs, &vars);
        Ok(self.append_messages(observations))
    }
}

/// Decorator that rewrites action commands and execution outputs around an
/// agent's `execute_actions`.
///
/// Actions are rewritten in message order and executed strictly
/// sequentially through the wrapped agent's environment; their outputs are
/// rewritten in the same order. Formatting and the conversation append stay
/// with the wrapped agent, whose own state the interceptor never touches
/// beyond delegation.
///
/// Nesting two `ActionInterceptor`s is unsupported: the outer one drives the
/// wrapped agent's environment and formatting directly, so an inner
/// interceptor's `execute_actions` override never runs. Stack rewrites at
/// the environment layer instead.
pub struct ActionInterceptor<A> {
    agent: A,
    actions: Option<Transform<Action>>,
    outputs: Option<Transform<Output>>,
}

impl<A: Agent> ActionInterceptor<A> {
    /// Wrap an agent with the given rewrite rules.
    ///
    /// Invalid regex patterns are rejected here, before anything executes.
    pub fn new(agent: A, config: &RewriteConfig) -> Result<Self, RuleError> {
        let actions = Transform::from_rules(&config.commands)?;
        let outputs = Transform::from_rules(&config.outputs)?;

        info!(
            action_rules = actions.as_ref().map_or(0, Transform::rule_count),
            output_rules = outputs.as_ref().map_or(0, Transform::rule_count),
            "Action interceptor installed"
        );

        Ok(Self {
            agent,
            actions,
            outputs,
        })
    }

    /// Wrap an agent with rules parsed from a YAML string.
    pub fn from_yaml(agent: A, yaml: &str) -> Result<Self, ConfigError> {
        let config: RewriteConfig = serde_yaml::from_str(yaml)?;
        Self::new(agent, &config).map_err(ConfigError::from)
    }

    /// Wrap an agent with rules parsed from a JSON string.
    pub fn from_json(agent: A, json: &str) -> Result<Self, ConfigError> {
        let config: RewriteConfig = serde_json::from_str(json)?;
        Self::new(agent, &config).map_err(ConfigError::from)
    }

    /// Attach a callback that runs on each action after the rule stage.
    pub fn with_action_callback(mut self, callback: TransformFn<Action>) -> Self {
        let transform = self.actions.take().unwrap_or_default();
        self.actions = Some(transform.with_callback(callback));
        self
    }

    /// Attach a callback that runs on each output after the rule stage.
    pub fn with_output_callback(mut self, callback: TransformFn<Output>) -> Self {
        let transform = self.outputs.take().unwrap_or_default();
        self.outputs = Some(transform.with_callback(callback));
        self
    }

    /// The wrapped agent.
    pub fn inner(&self) -> &A {
        &self.agent
    }

    /// Unwrap, returning the agent.
    pub fn into_inner(self) -> A {
        self.agent
    }
}

#[async_trait]
impl<A: Agent> Agent for ActionInterceptor<A> {
    fn env(&self) -> &dyn Environment {
        self.agent.env()
    }

    fn template_vars(&self) -> TemplateVars {
        self.agent.template_vars()
    }

    fn format_observation_messages(
        &self,
        message: &Message,
        outputs: &[Output],
        vars: &TemplateVars,
    ) -> Vec<Message> {
        self.agent.format_observation_messages(message, outputs, vars)
    }

    fn append_messages(&mut self, messages: Vec<Message>) -> Vec<Message> {
        self.agent.append_messages(messages)
    }

    async fn execute_actions(&mut self, message: &Message) -> anyhow::Result<Vec<Message>> {
        // Work on a copy; the caller's message stays untouched.
        let mut msg = message.clone();

        if let Some(transform) = &self.actions {
            // Callbacks see the message with its original actions; the
            // rewritten list is written back only after the whole pass.
            let rewritten: Vec<Action> = {
                let ctx = TransformContext::new(&self.agent, &msg);
                msg.extra
                    .actions
                    .iter()
                    .map(|action| transform.apply(action.clone(), &ctx))
                    .collect()
            };

            let changed = rewritten
                .iter()
                .zip(&msg.extra.actions)
                .filter(|(new, old)| new.command != old.command)
                .count();
            if changed > 0 {
                debug!(
                    actions = rewritten.len(),
                    changed, "Rewrote action commands"
                );
            } else {
                trace!(actions = rewritten.len(), "Actions unchanged");
            }

            msg.extra.actions = rewritten;
        }

        // One action at a time; later actions may depend on earlier side
        // effects, and outputs must line up with actions by index.
        let mut outputs = Vec::with_capacity(msg.extra.actions.len());
        for action in &msg.extra.actions {
            outputs.push(self.agent.env().execute(action.clone()).await?);
        }

        if let Some(transform) = &self.outputs {
            let ctx = TransformContext::new(&self.agent, &msg);
            outputs = outputs
                .into_iter()
                .map(|output| transform.apply(output, &ctx))
                .collect();
        }

        let vars = self.agent.template_vars();
        let observations = self.agent.format_observation_messages(&msg, &outputs, &vars);
        Ok(self.agent.append_messages(observations))
    }
}
