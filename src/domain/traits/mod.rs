//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod store;

pub use bot::{BotInfo, InteractionRef, ManifestCommand, ManifestOption, Platform};
pub use store::{Cache, Datastore};
