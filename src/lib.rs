//! nyx-bot - a plugin-driven chat bot framework
//!
//! Commands and schedules are compiled in and enabled through unit manifests
//! on disk. Inbound events go through the permission gate before the command
//! hierarchy runs them.

pub mod application;
pub mod bot;
pub mod domain;
pub mod infrastructure;
pub mod plugins;

pub use bot::Bot;
