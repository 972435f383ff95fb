//! Message handling - invocation sources, permission gate, responses and dispatch

pub mod dispatcher;
pub mod mentions;
pub mod parser;
pub mod permission;
pub mod response;
pub mod source;

pub use dispatcher::{DispatchOutcome, Dispatcher, INTERACTION_PREFIX};
pub use parser::{ArgumentParser, MessageParser, ParsedCommand, PositionalArgumentParser};
pub use permission::{can_member_execute, rejection_payload, DenialReason, PermissionCheck};
pub use response::{assemble, send_temporal, TEMPORAL_DELETE_DELAY};
pub use source::{CommandSource, Invocation};
