//! Startup orchestration

use std::sync::Arc;

use crate::application::commands::CommandIndex;
use crate::application::context::BotContext;
use crate::application::errors::BotError;
use crate::application::messaging::Dispatcher;
use crate::domain::traits::Cache;
use crate::infrastructure::plugins::{CommandRegistry, PluginTable};
use crate::infrastructure::schedules::ScheduleRegistry;

/// Key written and read back by the startup cache check
pub const SMOKE_KEY: &str = "test";

/// A started bot: registries built, stores connected, dispatcher ready
pub struct Bot {
    context: BotContext,
    commands: Arc<CommandIndex>,
    schedules: ScheduleRegistry,
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    /// Run the startup sequence. Any error here is fatal.
    ///
    /// Order: login, datastore, cache, schedules, commands (and manifest).
    /// Stores are connected before discovery so runOnLoad jobs can use them.
    /// The dispatcher only exists once both registries are complete.
    pub async fn start(context: BotContext, table: &PluginTable) -> Result<Self, BotError> {
        let config = Arc::clone(&context.config);

        let token = config.bot.token.as_deref().unwrap_or_default();
        context
            .platform
            .login(token)
            .await
            .map_err(|e| BotError::Startup(format!("Login failed: {}", e)))?;

        context
            .datastore
            .connect()
            .await
            .map_err(|e| BotError::Startup(format!("Datastore connection failed: {}", e)))?;
        tracing::info!("Connected to the datastore at {}", config.database.url);

        context
            .cache
            .connect()
            .await
            .map_err(|e| BotError::Startup(format!("Cache connection failed: {}", e)))?;
        check_cache(context.cache.as_ref()).await?;
        tracing::info!("Connected to the cache at {}", context.cache.location());

        let (schedules, _) = ScheduleRegistry::discover(&config.paths.schedules, table, &context).await;

        let (index, _) = CommandRegistry::discover(&config.paths.commands, table);
        let commands = Arc::new(index);
        if config.bot.load_application {
            CommandRegistry::publish_remote_manifest(&commands, context.platform.as_ref(), config.bot.guild_id.as_deref())
                .await;
        }

        let dispatcher = Arc::new(Dispatcher::new(context.clone(), Arc::clone(&commands)));
        tracing::info!("{} is ready", context.platform.bot_info().name);

        Ok(Self {
            context,
            commands,
            schedules,
            dispatcher,
        })
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    pub fn commands(&self) -> &Arc<CommandIndex> {
        &self.commands
    }

    pub fn schedules(&self) -> &ScheduleRegistry {
        &self.schedules
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Close the datastore. Jobs keep running until the process exits.
    pub async fn shutdown(&self) -> Result<(), BotError> {
        self.context.datastore.disconnect().await?;
        Ok(())
    }
}

/// Write a key and read it back
async fn check_cache(cache: &dyn Cache) -> Result<(), BotError> {
    cache
        .set(SMOKE_KEY, SMOKE_KEY)
        .await
        .map_err(|e| BotError::Startup(format!("Cache smoke test failed: {}", e)))?;
    match cache.get(SMOKE_KEY).await {
        Ok(Some(value)) if value == SMOKE_KEY => Ok(()),
        Ok(other) => Err(BotError::Startup(format!(
            "Cache smoke test failed: expected '{}', read {:?}",
            SMOKE_KEY, other
        ))),
        Err(e) => Err(BotError::Startup(format!("Cache smoke test failed: {}", e))),
    }
}
