//! General commands: ping and help

use std::time::Instant;

use async_trait::async_trait;

use crate::application::commands::usage::overview;
use crate::application::commands::{CommandContext, CommandHandler, CommandIndex, CommandVariant, LeafCommand};
use crate::application::errors::BotError;
use crate::domain::entities::{AutocompleteRequest, Color, CommandDescriptor, Embed, OptionKind, OptionSpec};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        let started = Instant::now();
        ctx.reply("🏓 Pinging...", Vec::new()).await?;
        let elapsed = started.elapsed().as_millis();

        let embed = Embed::new()
            .title("🏓 Pong!")
            .field("Round trip", format!("{}ms", elapsed), true);
        ctx.edit(embed, Vec::new()).await?;
        Ok(())
    }
}

pub fn ping() -> Result<CommandVariant, BotError> {
    let descriptor = CommandDescriptor::new("ping", "Check that the bot is alive").with_color(Color::GREEN);
    Ok(LeafCommand::new(descriptor, Ping).into())
}

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        if let Some(name) = ctx.options().get_str("command").map(str::to_string) {
            let usage = ctx.commands().lookup(&name).map(|command| command.as_command().usage(ctx.prefix()));
            match usage {
                Some(usage) => ctx.reply(usage, Vec::new()).await?,
                None => ctx.reply(format!("There's no command named `{}`.", name), Vec::new()).await?,
            };
            return Ok(());
        }

        let mut embed = Embed::new().author("📖 Available commands").description(format!(
            "Use `{}help <command>` to see how a command works.",
            ctx.prefix()
        ));
        for (category, commands) in ctx.commands().categories_view() {
            if commands.is_empty() {
                continue;
            }
            let listing: String = commands.iter().map(|command| overview(command.descriptor())).collect();
            embed = embed.field(category.clone(), listing, false);
        }
        ctx.reply(embed, Vec::new()).await?;
        Ok(())
    }

    fn options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("command", "Command to explain", OptionKind::String).autocomplete()]
    }

    fn autocomplete(&self, option: &str, _request: &AutocompleteRequest, commands: &CommandIndex) -> Vec<String> {
        if option != "command" {
            return Vec::new();
        }
        commands.main_commands().to_vec()
    }
}

pub fn help() -> Result<CommandVariant, BotError> {
    let descriptor = CommandDescriptor::new("help", "List commands or show how one works")
        .with_aliases(["h", "commands"])
        .with_usage("[command]")
        .with_color(Color::BLURPLE);
    Ok(LeafCommand::new(descriptor, Help).into())
}
