//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("There's no response to edit")]
    MissingResponseTarget,

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Startup failed: {0}")]
    Startup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Per-unit plugin discovery errors. Never fatal to the scan.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("No constructor registered for symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Constructor for '{symbol}' failed: {reason}")]
    Construction { symbol: String, reason: String },

    #[error("Schedule '{0}' is already registered")]
    DuplicateSchedule(String),
}

/// Schedule lifecycle errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid interval '{expr}': {reason}")]
    InvalidInterval { expr: String, reason: String },

    #[error("Schedule not found: {0}")]
    NotFound(String),

    #[error("Schedule '{0}' is already running")]
    AlreadyRunning(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Not connected")]
    NotConnected,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
