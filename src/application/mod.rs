//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Commands: the command hierarchy, its index and per-invocation context
//! - Messaging: invocation sources, permission gate, responses, dispatching
//! - Errors: Domain-specific errors

pub mod commands;
pub mod context;
pub mod errors;
pub mod messaging;

pub use context::BotContext;
