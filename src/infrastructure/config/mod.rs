//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub paths: PathsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    /// Title used in log lines
    pub name: String,
    pub token: Option<String>,
    /// Guild the command manifest is published to
    pub guild_id: Option<String>,
    /// Text prefixes, tried in order
    pub prefixes: Vec<String>,
    /// Publish the command manifest after discovery
    pub load_application: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PathsConfig {
    pub commands: PathBuf,
    pub schedules: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CacheConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingConfig {
    /// chrono format string for the log timestamp
    pub date_format: String,
    /// Default filter when RUST_LOG is not set
    pub level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Nyx".to_string(),
            token: None,
            guild_id: None,
            prefixes: vec!["!".to_string()],
            load_application: true,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            commands: PathBuf::from("./plugins/commands"),
            schedules: PathBuf::from("./plugins/schedules"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "nyx.db".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "memory://".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            date_format: "%H:%M".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise; environment overrides apply on top
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Config::default()
        };
        Ok(config.apply_env())
    }

    pub fn load_env() -> Self {
        Config::default().apply_env()
    }

    /// Apply BOT_TOKEN, GUILD_ID and BOT_PREFIXES (comma separated)
    pub fn apply_env(mut self) -> Self {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.bot.token = Some(token);
        }

        if let Ok(guild) = std::env::var("GUILD_ID") {
            self.bot.guild_id = Some(guild);
        }

        if let Ok(prefixes) = std::env::var("BOT_PREFIXES") {
            let prefixes: Vec<String> = prefixes
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !prefixes.is_empty() {
                self.bot.prefixes = prefixes;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefixes.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::MissingField("bot.prefixes".to_string()));
        }
        if self.bot.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
