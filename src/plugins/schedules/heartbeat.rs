//! Heartbeat - records the last time the bot was alive in the cache

use async_trait::async_trait;
use chrono::Utc;

use crate::application::context::BotContext;
use crate::application::errors::BotError;
use crate::infrastructure::schedules::{Schedule, ScheduleContext};

pub const HEARTBEAT_KEY: &str = "nyx:heartbeat";

pub struct Heartbeat;

#[async_trait]
impl Schedule for Heartbeat {
    fn interval(&self) -> &str {
        "*/5 * * * *"
    }

    fn run_on_load(&self) -> bool {
        true
    }

    async fn run(&self, ctx: &ScheduleContext) -> Result<(), BotError> {
        let now = Utc::now().to_rfc3339();
        ctx.bot().cache.set(HEARTBEAT_KEY, &now).await?;

        let runs = ctx.job().map_or(0, |job| job.runs());
        tracing::debug!("Heartbeat #{} at {}", runs + 1, now);
        Ok(())
    }

    async fn on_complete(&self, ctx: &ScheduleContext) -> Result<(), BotError> {
        ctx.bot().cache.delete(HEARTBEAT_KEY).await?;
        Ok(())
    }
}

pub fn heartbeat(_bot: &BotContext) -> Result<Box<dyn Schedule>, BotError> {
    Ok(Box::new(Heartbeat))
}
