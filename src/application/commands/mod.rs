//! Command hierarchy and execution
//!
//! Commands are a tagged hierarchy: a [`CommandVariant`] is either a leaf that
//! runs directly or a parent that delegates to one of its subcommands.

pub mod context;
pub mod index;
pub mod usage;
pub mod variant;

pub use context::{CommandContext, Outcome};
pub use index::CommandIndex;
pub use variant::{
    CommandHandler, CommandRef, CommandVariant, LeafCommand, ParentCommand, ParentInvocation, SubCommand,
};

use crate::application::errors::BotError;

/// Branch of the hierarchy an invocation went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPath {
    Leaf,
    /// Canonical name of the subcommand that ran
    Sub(String),
    /// No subcommand matched; the parent's usage was shown
    Usage,
}

/// Execute `command` for the invocation held by `ctx`
pub async fn execute(command: &CommandVariant, ctx: &mut CommandContext) -> Result<ExecutionPath, BotError> {
    match command {
        CommandVariant::Leaf(leaf) => {
            leaf.handler().execute(ctx).await?;
            Ok(ExecutionPath::Leaf)
        }
        CommandVariant::Parent(parent) => {
            let invocation = ParentInvocation::new(parent);
            let token = ctx.options().subcommand().map(str::to_string);
            match invocation.subcommand(token.as_deref()) {
                Some(sub) => {
                    tracing::debug!("{} -> {}", parent.descriptor().canonical_name(), sub.name());
                    ctx.delegate(sub);
                    sub.handler().execute(ctx).await?;
                    Ok(ExecutionPath::Sub(sub.name().to_string()))
                }
                None => {
                    ctx.send_usage().await?;
                    Ok(ExecutionPath::Usage)
                }
            }
        }
    }
}
