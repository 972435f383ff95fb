//! Schedule registry - discovers schedule units and owns their jobs

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::interval::Clock;
use super::job::{Job, JobBuilder, JobState, ScheduleContext};
use crate::application::context::BotContext;
use crate::application::errors::{BotError, DiscoveryError, ScheduleError};
use crate::infrastructure::plugins::{DiscoveryReport, PluginLoader, PluginTable};

/// Every running job, keyed by name
#[derive(Default)]
pub struct ScheduleRegistry {
    jobs: BTreeMap<String, Arc<Job>>,
}

impl ScheduleRegistry {
    /// Scan `root/<unit>.yaml`, build a job per unit and start it.
    ///
    /// Units with `run_on_load` run once before their job starts. A unit that
    /// fails to load is logged and skipped.
    pub async fn discover(root: impl AsRef<Path>, table: &PluginTable, bot: &BotContext) -> (Self, DiscoveryReport) {
        let loader = PluginLoader::new(root.as_ref());
        let clock = Clock::new();
        let mut registry = Self::default();
        let mut report = DiscoveryReport::default();

        let units = match loader.root_units() {
            Ok(units) => units,
            Err(e) => {
                report.fail(loader.root(), e);
                return (registry, report);
            }
        };

        for path in units {
            match registry.load_unit(&loader, table, bot, clock, &path).await {
                Ok(Some(job)) => {
                    job.start();
                    tracing::debug!("Started schedule {}", job.name());
                    registry.jobs.insert(job.name().to_string(), job);
                }
                Ok(None) => {}
                Err(e) => report.fail(&path, e),
            }
        }

        report.loaded = registry.len();
        tracing::info!("Loaded {} schedules", report.loaded);
        (registry, report)
    }

    async fn load_unit(
        &self,
        loader: &PluginLoader,
        table: &PluginTable,
        bot: &BotContext,
        clock: Clock,
        path: &Path,
    ) -> Result<Option<Arc<Job>>, DiscoveryError> {
        let Some(entry) = loader.read_unit(path)? else {
            return Ok(None);
        };
        if self.jobs.contains_key(&entry.symbol) {
            return Err(DiscoveryError::DuplicateSchedule(entry.symbol));
        }

        let construction = |reason: String| DiscoveryError::Construction {
            symbol: entry.symbol.clone(),
            reason,
        };
        let constructor = table
            .schedule_constructor(&entry.symbol)
            .ok_or_else(|| DiscoveryError::UnknownSymbol(entry.symbol.clone()))?;
        let schedule = constructor(bot).map_err(|e| construction(e.to_string()))?;

        let context = ScheduleContext::new(bot.clone(), &entry.symbol);
        let job = JobBuilder::new(&entry.symbol, schedule, context)
            .and_then(|builder| builder.clock(clock).build())
            .map_err(|e| construction(e.to_string()))?;

        if job.run_on_load() {
            if let Err(e) = job.fire().await {
                tracing::error!("Initial run of schedule {} failed: {}", job.name(), e);
            }
        }
        Ok(Some(job))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Job>> {
        self.jobs.get(name)
    }

    /// Trigger a job outside its interval. `Ok(false)` when it was already running.
    pub async fn run_now(&self, name: &str) -> Result<bool, BotError> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| ScheduleError::NotFound(name.to_string()))?;
        job.fire().await
    }

    pub async fn stop(&self, name: &str) -> Result<(), ScheduleError> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| ScheduleError::NotFound(name.to_string()))?;
        job.stop().await;
        Ok(())
    }

    pub fn state(&self, name: &str) -> Option<JobState> {
        self.jobs.get(name).map(|job| job.handle().state())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.jobs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
