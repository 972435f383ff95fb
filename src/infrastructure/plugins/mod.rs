//! Plugin discovery for nyx-bot
//!
//! Plugins are compiled into the binary and listed in a [`PluginTable`].
//! The plugin directories only hold small YAML unit manifests naming the
//! symbol to construct, so discovery never loads code at runtime.

pub mod loader;
pub mod manifest;
pub mod registry;

pub use loader::{
    CommandConstructor, DiscoveryReport, PluginLoader, PluginTable, ScheduleConstructor, UnitEntry, UnitFailure,
};
pub use manifest::UnitManifest;
pub use registry::CommandRegistry;
