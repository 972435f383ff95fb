//! Built-in plugins for nyx-bot
//!
//! Every plugin the binary ships is listed in [`builtin_table`]; unit
//! manifests under the plugin directories decide which ones are loaded.

pub mod commands;
pub mod schedules;

use crate::infrastructure::plugins::PluginTable;

/// Constructor table for every built-in command and schedule
pub fn builtin_table() -> PluginTable {
    PluginTable::new()
        .command("ping", commands::general::ping)
        .command("help", commands::general::help)
        .command("cache", commands::storage::cache)
        .schedule("heartbeat", schedules::heartbeat::heartbeat)
}
