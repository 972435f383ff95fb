//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Logging: Log line formatting
//! - Plugins: Command discovery from unit manifests
//! - Schedules: Cron-driven jobs
//! - Storage / Database: Cache and datastore implementations
//! - Adapters: Platform integrations

pub mod adapters;
pub mod config;
pub mod database;
pub mod logging;
pub mod plugins;
pub mod schedules;
pub mod storage;
