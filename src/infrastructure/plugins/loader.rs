//! Plugin loader - resolves unit manifests against a compile-time constructor table

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::manifest::UnitManifest;
use crate::application::commands::CommandVariant;
use crate::application::context::BotContext;
use crate::application::errors::{BotError, DiscoveryError};
use crate::infrastructure::schedules::Schedule;

/// Builds a command plugin
pub type CommandConstructor = Box<dyn Fn() -> Result<CommandVariant, BotError> + Send + Sync>;

/// Builds a schedule plugin bound to the bot context
pub type ScheduleConstructor = Box<dyn Fn(&BotContext) -> Result<Box<dyn Schedule>, BotError> + Send + Sync>;

/// Every plugin compiled into the binary, keyed by symbol
#[derive(Default)]
pub struct PluginTable {
    commands: HashMap<String, CommandConstructor>,
    schedules: HashMap<String, ScheduleConstructor>,
}

impl PluginTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command<F>(mut self, symbol: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<CommandVariant, BotError> + Send + Sync + 'static,
    {
        self.commands.insert(symbol.into(), Box::new(constructor));
        self
    }

    pub fn schedule<F>(mut self, symbol: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&BotContext) -> Result<Box<dyn Schedule>, BotError> + Send + Sync + 'static,
    {
        self.schedules.insert(symbol.into(), Box::new(constructor));
        self
    }

    pub fn command_constructor(&self, symbol: &str) -> Option<&CommandConstructor> {
        self.commands.get(symbol)
    }

    pub fn schedule_constructor(&self, symbol: &str) -> Option<&ScheduleConstructor> {
        self.schedules.get(symbol)
    }

    pub fn command_symbols(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn schedule_symbols(&self) -> impl Iterator<Item = &str> {
        self.schedules.keys().map(String::as_str)
    }
}

/// A manifest that passed parsing and is enabled
#[derive(Debug, Clone)]
pub struct UnitEntry {
    pub path: PathBuf,
    pub symbol: String,
}

/// A unit that failed to load
#[derive(Debug)]
pub struct UnitFailure {
    pub path: PathBuf,
    pub error: DiscoveryError,
}

/// What a discovery pass found
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub categories: usize,
    pub loaded: usize,
    pub failures: Vec<UnitFailure>,
    /// Names taken over by a later registration
    pub duplicates: Vec<String>,
}

impl DiscoveryReport {
    pub(crate) fn fail(&mut self, path: &Path, error: DiscoveryError) {
        tracing::error!("Failed to load {}: {}", path.display(), error);
        self.failures.push(UnitFailure {
            path: path.to_path_buf(),
            error,
        });
    }
}

/// Walks a plugin directory. Entries are visited in sorted order; hidden ones are skipped.
pub struct PluginLoader {
    root: PathBuf,
}

impl PluginLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Category folders under the root. A missing root has none.
    pub fn categories(&self) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
        if !self.root.exists() {
            tracing::warn!("Plugin directory does not exist: {}", self.root.display());
            return Ok(Vec::new());
        }

        Ok(sorted_entries(&self.root)?
            .into_iter()
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect())
    }

    /// Unit manifests directly under the root
    pub fn root_units(&self) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !self.root.exists() {
            tracing::warn!("Plugin directory does not exist: {}", self.root.display());
            return Ok(Vec::new());
        }
        self.units(&self.root)
    }

    /// Unit manifests (`.yaml` / `.yml`) in `dir`
    pub fn units(&self, dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        Ok(sorted_entries(dir)?
            .into_iter()
            .filter(|path| path.is_file() && is_manifest(path))
            .collect())
    }

    /// Read a unit manifest. Disabled units resolve to `None`.
    pub fn read_unit(&self, path: &Path) -> Result<Option<UnitEntry>, DiscoveryError> {
        let manifest = UnitManifest::from_file(path)?;
        if !manifest.enabled {
            tracing::debug!("Skipping disabled unit {}", path.display());
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DiscoveryError::Manifest {
                path: path.to_path_buf(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;

        Ok(Some(UnitEntry {
            path: path.to_path_buf(),
            symbol: manifest.symbol_or(stem).to_string(),
        }))
    }
}

fn is_manifest(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if !hidden {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
