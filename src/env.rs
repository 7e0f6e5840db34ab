//! Environment-layer interception.

use async_trait::async_trait;
use tracing::{debug, info, trace};

use crate::config::{ConfigError, RewriteConfig};
use crate::message::{Action, Output};
use crate::rule::{RuleError, RuleSet};

/// Sandboxed execution capability of the wrapped system.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Execute one action and return its captured output.
    async fn execute(&self, action: Action) -> anyhow::Result<Output>;
}

/// Decorator that rewrites commands and outputs around a single environment
/// `execute` call.
///
/// This layer is rule-only: unlike [`ActionInterceptor`] it has no callback
/// slots, and it sees one action at a time with no surrounding message.
/// Wrapping an already wrapped environment is well defined; the outer
/// command rules run first and the outer output rules run last.
///
/// [`ActionInterceptor`]: crate::agent::ActionInterceptor
pub struct EnvInterceptor<E> {
    env: E,
    commands: Option<RuleSet>,
    outputs: Option<RuleSet>,
}

impl<E: Environment> EnvInterceptor<E> {
    /// Wrap an environment with the given rewrite rules.
    ///
    /// Invalid regex patterns are rejected here, before anything executes.
    pub fn new(env: E, config: &RewriteConfig) -> Result<Self, RuleError> {
        let commands = RuleSet::compile_opt(&config.commands)?;
        let outputs = RuleSet::compile_opt(&config.outputs)?;

        info!(
            command_rules = commands.as_ref().map_or(0, RuleSet::len),
            output_rules = outputs.as_ref().map_or(0, RuleSet::len),
            "Environment interceptor installed"
        );

        Ok(Self {
            env,
            commands,
            outputs,
        })
    }

    /// Wrap an environment with rules parsed from a YAML string.
    pub fn from_yaml(env: E, yaml: &str) -> Result<Self, ConfigError> {
        let config: RewriteConfig = serde_yaml::from_str(yaml)?;
        Self::new(env, &config).map_err(ConfigError::from)
    }

    /// Wrap an environment with rules parsed from a JSON string.
    pub fn from_json(env: E, json: &str) -> Result<Self, ConfigError> {
        let config: RewriteConfig = serde_json::from_str(json)?;
        Self::new(env, &config).map_err(ConfigError::from)
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Unwrap, returning the environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

#[async_trait]
impl<E: Environment> Environment for EnvInterceptor<E> {
    async fn execute(&self, mut action: Action) -> anyhow::Result<Output> {
        if let Some(rules) = &self.commands {
            let rewritten = rules.apply(&action.command);
            if rewritten != action.command {
                debug!(
                    command = %action.command,
                    rewritten = %rewritten,
                    "Rewrote command"
                );
            } else {
                trace!(command = %action.command, "Command unchanged");
            }
            action.command = rewritten;
        }

        let mut output = self.env.execute(action).await?;

        if let Some(rules) = &self.outputs {
            let rewritten = rules.apply(&output.output);
            if rewritten != output.output {
                debug!(
                    before = output.output.len(),
                    after = rewritten.len(),
                    "Rewrote output"
                );
            } else {
                trace!(len = output.output.len(), "Output unchanged");
            }
            output.output = rewritten;
        }

        Ok(output)
    }
}
