//! Shared handles every plugin receives

use std::sync::Arc;

use crate::domain::traits::{Cache, Datastore, Platform};
use crate::infrastructure::config::Config;

/// Bot-wide context, cheap to clone
#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<Config>,
    pub platform: Arc<dyn Platform>,
    pub datastore: Arc<dyn Datastore>,
    pub cache: Arc<dyn Cache>,
}

impl BotContext {
    pub fn new(
        config: Config,
        platform: Arc<dyn Platform>,
        datastore: Arc<dyn Datastore>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            platform,
            datastore,
            cache,
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.config.bot.prefixes
    }
}
