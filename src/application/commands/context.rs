//! Per-invocation command state

use std::sync::Arc;

use super::index::CommandIndex;
use super::variant::{CommandRef, SubCommand};
use crate::application::context::BotContext;
use crate::application::errors::BotError;
use crate::application::messaging::response::{self, send_temporal};
use crate::application::messaging::source::CommandSource;
use crate::domain::entities::{
    Addition, Color, CommandDescriptor, Embed, Payload, ResolvedOptions, ResponseContent, SentMessage,
};

/// What the invoker ended up seeing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command deliberately answered nothing
    NoOp,
    Replied,
    UsageShown,
    ErrorShown,
}

/// State of a single command execution. Created per dispatch, dropped afterwards.
pub struct CommandContext {
    bot: BotContext,
    commands: Arc<CommandIndex>,
    name: String,
    source: CommandSource,
    prefix: String,
    options: ResolvedOptions,
    descriptor: Arc<CommandDescriptor>,
    usage: Embed,
    response: Option<SentMessage>,
    outcome: Outcome,
}

impl CommandContext {
    pub fn new(
        bot: BotContext,
        commands: Arc<CommandIndex>,
        command: CommandRef<'_>,
        name: impl Into<String>,
        source: CommandSource,
        prefix: impl Into<String>,
        options: ResolvedOptions,
    ) -> Self {
        let prefix = prefix.into();
        Self {
            bot,
            commands,
            name: name.into(),
            usage: command.usage(&prefix),
            descriptor: Arc::new(command.descriptor().clone()),
            source,
            prefix,
            options,
            response: None,
            outcome: Outcome::NoOp,
        }
    }

    /// Rebind this invocation to a resolved subcommand, keeping source, prefix and options
    pub(crate) fn delegate(&mut self, sub: &SubCommand) {
        let mut descriptor = sub.descriptor().as_ref().clone();
        descriptor.color = descriptor.color.or(sub.parent().color);
        self.descriptor = Arc::new(descriptor);
        self.usage = CommandRef::Sub(sub).usage(&self.prefix);
    }

    pub fn bot(&self) -> &BotContext {
        &self.bot
    }

    pub fn commands(&self) -> &CommandIndex {
        &self.commands
    }

    /// Name or alias the command was invoked with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn source(&self) -> &CommandSource {
        &self.source
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    pub fn response(&self) -> Option<&SentMessage> {
        self.response.as_ref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Acknowledge the invocation, honoring the descriptor's ephemeral default
    pub async fn defer(&mut self) -> Result<(), BotError> {
        let ephemeral = self.descriptor.ephemeral.unwrap_or(false);
        self.source.defer(ephemeral).await
    }

    /// Build a payload with this command's defaults applied
    pub fn payload(&self, content: impl Into<ResponseContent>, additions: Vec<Addition>) -> Payload {
        response::assemble(&self.descriptor, &self.source, content, additions)
    }

    /// Answer the invoker. Edits instead once a response exists or the interaction was deferred.
    pub async fn reply(
        &mut self,
        content: impl Into<ResponseContent>,
        additions: Vec<Addition>,
    ) -> Result<&SentMessage, BotError> {
        let payload = self.payload(content, additions);
        self.send(payload, Outcome::Replied).await
    }

    /// Replace the last response
    pub async fn edit(
        &mut self,
        content: impl Into<ResponseContent>,
        additions: Vec<Addition>,
    ) -> Result<&SentMessage, BotError> {
        let payload = self.payload(content, additions);
        let sent = self.source.edit(self.response.as_ref(), &payload).await?;
        self.outcome = Outcome::Replied;
        Ok(&*self.response.insert(sent))
    }

    /// Show this command's usage
    pub async fn send_usage(&mut self) -> Result<(), BotError> {
        let payload = self.payload(self.usage.clone(), Vec::new());
        self.send(payload, Outcome::UsageShown).await?;
        Ok(())
    }

    /// Report an internal error to the invoker, with an optional detail message
    pub async fn send_error(&mut self, detail: Option<&str>) -> Result<(), BotError> {
        let mut embed = Embed::new()
            .title("❌ Error")
            .color(Color::RED)
            .description("An internal error happened while executing that command.");
        if let Some(detail) = detail {
            embed = embed.field("Message", format!("```{}```", detail), false);
        }

        if self.response.is_some() || self.source.is_deferred() {
            let payload = self.payload(embed, Vec::new());
            let sent = self.source.edit(self.response.as_ref(), &payload).await?;
            self.response = Some(sent);
        } else {
            let payload = self.payload(embed, Vec::new());
            send_temporal(&mut self.source, payload).await?;
        }
        self.outcome = Outcome::ErrorShown;
        Ok(())
    }

    async fn send(&mut self, payload: Payload, outcome: Outcome) -> Result<&SentMessage, BotError> {
        let sent = if self.response.is_some() || self.source.is_deferred() {
            self.source.edit(self.response.as_ref(), &payload).await?
        } else {
            self.source.reply(&payload).await?
        };
        self.outcome = outcome;
        Ok(&*self.response.insert(sent))
    }
}
