//! Command registry - builds the command index from the plugin directory

use std::path::Path;

use super::loader::{DiscoveryReport, PluginLoader, PluginTable};
use crate::application::commands::{CommandIndex, CommandVariant};
use crate::application::errors::DiscoveryError;
use crate::domain::traits::Platform;

pub struct CommandRegistry;

impl CommandRegistry {
    /// Scan `root/<category>/<unit>.yaml` and build the index.
    ///
    /// A unit that fails to load is logged and skipped; the scan always completes.
    pub fn discover(root: impl AsRef<Path>, table: &PluginTable) -> (CommandIndex, DiscoveryReport) {
        let loader = PluginLoader::new(root.as_ref());
        let mut index = CommandIndex::new();
        let mut report = DiscoveryReport::default();

        let categories = match loader.categories() {
            Ok(categories) => categories,
            Err(e) => {
                report.fail(loader.root(), e);
                return (index, report);
            }
        };

        for (category, dir) in categories {
            index.add_category(&category);

            let units = match loader.units(&dir) {
                Ok(units) => units,
                Err(e) => {
                    report.fail(&dir, e);
                    continue;
                }
            };

            for path in units {
                let command = match Self::load_unit(&loader, table, &path) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        report.fail(&path, e);
                        continue;
                    }
                };

                let name = command.canonical_name().to_string();
                for duplicate in index.register(&category, command) {
                    tracing::error!(
                        "Command name '{}' is already taken, '{}' from {} replaces it",
                        duplicate,
                        name,
                        path.display()
                    );
                    report.duplicates.push(duplicate);
                }
                tracing::debug!("Loaded command {} ({})", name, category);
            }
        }

        report.categories = index.category_count();
        report.loaded = index.len();
        tracing::info!(
            "Loaded {} commands from {} categories",
            report.loaded,
            report.categories
        );
        (index, report)
    }

    fn load_unit(loader: &PluginLoader, table: &PluginTable, path: &Path) -> Result<Option<CommandVariant>, DiscoveryError> {
        let Some(entry) = loader.read_unit(path)? else {
            return Ok(None);
        };
        let constructor = table
            .command_constructor(&entry.symbol)
            .ok_or_else(|| DiscoveryError::UnknownSymbol(entry.symbol.clone()))?;
        let command = constructor().map_err(|e| DiscoveryError::Construction {
            symbol: entry.symbol.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(command))
    }

    /// Submit the guild-scoped manifest. Failures are logged, never returned.
    pub async fn publish_remote_manifest(index: &CommandIndex, platform: &dyn Platform, guild_id: Option<&str>) -> bool {
        let Some(guild_id) = guild_id else {
            tracing::warn!("No guild configured, skipping command manifest");
            return false;
        };

        let manifest = index.manifest();
        match platform.register_guild_commands(guild_id, &manifest).await {
            Ok(()) => {
                tracing::info!("Published {} commands to guild {}", manifest.len(), guild_id);
                true
            }
            Err(e) => {
                tracing::error!("Failed to publish command manifest: {}", e);
                false
            }
        }
    }
}
