//! Rule-driven rewriting of agent commands and execution outputs.
//!
//! Benchmark runs often need the commands a model proposes normalized before
//! they reach the sandbox, and the sandbox output sanitized before it
//! re-enters the model's context. This crate wraps the two seams of the
//! execution path with ordered pattern -> replacement rules:
//!
//! - [`ActionInterceptor`] decorates an agent's "execute this message's
//!   actions" operation: every action's command is rewritten, the actions run
//!   in order through the agent's environment, and the outputs are rewritten
//!   before the agent formats and appends them. Optional callbacks run after
//!   the rule stage on either side.
//! - [`EnvInterceptor`] decorates a single environment `execute` call with
//!   the same rules and no callbacks.
//!
//! Rules are regex by default, literal on request:
//!
//! ```yaml
//! commands:
//!   - pattern: "pip install"
//!     replace: "uv pip install"
//!     mode: literal
//! outputs:
//!   - pattern: "/tmp/tmp[A-Za-z0-9]+"
//!     replace: "/tmp/SCRATCH"
//! ```
//!
//! The wrapped agent and environment stay unmodified, and errors from them
//! propagate through the interceptors unchanged.

pub mod agent;
pub mod config;
pub mod context;
pub mod env;
pub mod message;
pub mod rule;
pub mod transform;

pub use agent::{ActionInterceptor, Agent};
pub use config::{ConfigError, PatternMode, RewriteConfig, RewriteRule};
pub use context::TransformContext;
pub use env::{EnvInterceptor, Environment};
pub use message::{Action, Message, MessageExtra, Output, TemplateVars};
pub use rule::{RuleError, RuleSet};
pub use transform::{Transform, TransformFn};
