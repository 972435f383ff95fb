//! Per-guild key-value access through the bot cache

use async_trait::async_trait;

use crate::application::commands::{CommandContext, CommandHandler, CommandVariant, ParentCommand};
use crate::application::errors::BotError;
use crate::domain::entities::{Color, CommandDescriptor, Embed, OptionKind, OptionSpec, Permission};

fn cache_key(ctx: &CommandContext, key: &str) -> Result<String, BotError> {
    let guild = ctx
        .source()
        .guild_id()
        .ok_or_else(|| BotError::InvalidArgs("cache keys are scoped to a server".to_string()))?;
    Ok(format!("guild:{}:{}", guild, key))
}

fn required<'a>(ctx: &'a CommandContext, option: &str) -> Result<&'a str, BotError> {
    ctx.options()
        .get_str(option)
        .ok_or_else(|| BotError::InvalidArgs(format!("missing option '{}'", option)))
}

pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        let key = required(ctx, "key")?.to_string();
        let value = ctx.bot().cache.get(&cache_key(ctx, &key)?).await?;

        let embed = match value {
            Some(value) => Embed::new().title(format!("🔑 {}", key)).description(format!("```{}```", value)),
            None => Embed::new().title(format!("🔑 {}", key)).description("Not set."),
        };
        ctx.reply(embed, Vec::new()).await?;
        Ok(())
    }

    fn options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("key", "Key to read", OptionKind::String).required()]
    }
}

pub struct Set;

#[async_trait]
impl CommandHandler for Set {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        let key = required(ctx, "key")?.to_string();
        let value = required(ctx, "value")?.to_string();
        ctx.defer().await?;
        ctx.bot().cache.set(&cache_key(ctx, &key)?, &value).await?;

        ctx.reply(format!("Saved `{}`.", key), Vec::new()).await?;
        Ok(())
    }

    fn options(&self) -> Vec<OptionSpec> {
        vec![
            OptionSpec::new("key", "Key to write", OptionKind::String).required(),
            OptionSpec::new("value", "Value to store", OptionKind::String).required(),
        ]
    }
}

pub fn cache() -> Result<CommandVariant, BotError> {
    let descriptor = CommandDescriptor::new("cache", "Read and write server values")
        .with_alias("kv")
        .with_color(Color::BLURPLE)
        .with_permission(Permission::ManageGuild)
        .with_ephemeral(true)
        .guild_only();

    let parent = ParentCommand::new(descriptor)
        .subcommand(
            CommandDescriptor::new("get", "Read a value").with_usage("<key>"),
            Get,
        )
        .subcommand(
            CommandDescriptor::new("set", "Store a value").with_usage("<key> <value>"),
            Set,
        );
    Ok(parent.into())
}
