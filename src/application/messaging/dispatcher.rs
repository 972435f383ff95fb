//! Dispatcher - routes inbound events through the permission gate to commands

use std::sync::Arc;

use super::parser::{ArgumentParser, MessageParser, PositionalArgumentParser};
use super::permission::{can_member_execute, rejection_payload, PermissionCheck};
use super::response::send_temporal;
use super::source::CommandSource;
use crate::application::commands::{self, CommandContext, CommandIndex, CommandRef, CommandVariant, ExecutionPath, Outcome};
use crate::application::context::BotContext;
use crate::domain::entities::{AutocompleteChoice, AutocompleteRequest, InboundEvent, Interaction, Message};
use crate::domain::traits::InteractionRef;

/// Prefix reported for structured interactions
pub const INTERACTION_PREFIX: &str = "/";

/// Maximum number of autocomplete choices sent back
const AUTOCOMPLETE_LIMIT: usize = 24;

/// Terminal state of one dispatched event
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Not a command, or an unknown one
    Ignored,
    /// Turned away by the permission gate
    Rejected(PermissionCheck),
    /// Arguments didn't fit; usage was shown
    ArgumentsRejected,
    Completed {
        command: String,
        path: ExecutionPath,
        outcome: Outcome,
    },
    Failed {
        command: String,
        error: String,
    },
    Autocompleted {
        choices: usize,
    },
}

/// Routes events to commands. Holds only read-only state, so events can be
/// dispatched concurrently.
pub struct Dispatcher {
    bot: BotContext,
    commands: Arc<CommandIndex>,
    parser: MessageParser,
    arguments: Arc<dyn ArgumentParser>,
}

impl Dispatcher {
    pub fn new(bot: BotContext, commands: Arc<CommandIndex>) -> Self {
        let parser = MessageParser::new(bot.prefixes().to_vec());
        Self {
            bot,
            commands,
            parser,
            arguments: Arc::new(PositionalArgumentParser),
        }
    }

    /// Replace the text argument parser
    pub fn with_argument_parser<P: ArgumentParser + 'static>(mut self, parser: P) -> Self {
        self.arguments = Arc::new(parser);
        self
    }

    pub fn commands(&self) -> &Arc<CommandIndex> {
        &self.commands
    }

    pub async fn dispatch(&self, event: InboundEvent) -> DispatchOutcome {
        match event {
            InboundEvent::Message(message) => self.handle_message(message).await,
            InboundEvent::Interaction(interaction) => self.handle_interaction(interaction).await,
            InboundEvent::Autocomplete(request) => self.handle_autocomplete(request).await,
        }
    }

    pub async fn handle_message(&self, message: Message) -> DispatchOutcome {
        if message.author.is_bot {
            return DispatchOutcome::Ignored;
        }
        let Some(parsed) = self.parser.parse(&message.content) else {
            return DispatchOutcome::Ignored;
        };
        let Some(command) = self.commands.lookup(&parsed.name).cloned() else {
            tracing::trace!("Unknown command {}{}", parsed.prefix, parsed.name);
            return DispatchOutcome::Ignored;
        };

        let mut source = CommandSource::text(self.bot.platform.clone(), message.clone());
        if let Some(rejected) = self.gate(&command, &mut source).await {
            return rejected;
        }

        let options = self.arguments.resolve(&message, &parsed.args, &command).await;
        let arguments_fit = options.is_some();
        let mut ctx = CommandContext::new(
            self.bot.clone(),
            Arc::clone(&self.commands),
            command.as_command(),
            parsed.name,
            source,
            parsed.prefix,
            options.unwrap_or_default(),
        );

        if !arguments_fit {
            if let Err(e) = ctx.send_usage().await {
                tracing::warn!("Failed to send usage of {}: {}", command.canonical_name(), e);
            }
            return DispatchOutcome::ArgumentsRejected;
        }
        self.run(&command, ctx).await
    }

    pub async fn handle_interaction(&self, interaction: Interaction) -> DispatchOutcome {
        let Some(command) = self.commands.lookup(&interaction.command_name).cloned() else {
            tracing::warn!("Received an interaction for unknown command {}", interaction.command_name);
            return DispatchOutcome::Ignored;
        };

        let name = interaction.command_name.clone();
        let options = interaction.options.clone();
        let mut source = CommandSource::interaction(self.bot.platform.clone(), interaction);
        if let Some(rejected) = self.gate(&command, &mut source).await {
            return rejected;
        }

        let ctx = CommandContext::new(
            self.bot.clone(),
            Arc::clone(&self.commands),
            command.as_command(),
            name,
            source,
            INTERACTION_PREFIX,
            options,
        );
        self.run(&command, ctx).await
    }

    pub async fn handle_autocomplete(&self, request: AutocompleteRequest) -> DispatchOutcome {
        let Some(command) = self.commands.lookup(&request.command_name).cloned() else {
            return DispatchOutcome::Ignored;
        };

        let target = match (command.as_ref(), request.subcommand.as_deref()) {
            (CommandVariant::Parent(parent), Some(token)) => match parent.find_subcommand(token) {
                Some(sub) => CommandRef::Sub(sub),
                None => return DispatchOutcome::Ignored,
            },
            _ => command.as_command(),
        };

        let typed = request.focused_value.to_lowercase();
        let mut values: Vec<String> = target
            .autocomplete(&request.focused_option, &request, &self.commands)
            .into_iter()
            .filter(|value| value.to_lowercase().starts_with(&typed))
            .take(AUTOCOMPLETE_LIMIT)
            .collect();
        values.sort();

        let choices: Vec<AutocompleteChoice> = values.into_iter().map(AutocompleteChoice::new).collect();
        let reference = InteractionRef {
            id: request.interaction_id.clone(),
            token: request.token.clone(),
            channel_id: request.channel_id.clone(),
        };
        if let Err(e) = self.bot.platform.respond_autocomplete(&reference, &choices).await {
            tracing::warn!("Failed to answer autocomplete for {}: {}", request.command_name, e);
        }
        DispatchOutcome::Autocompleted { choices: choices.len() }
    }

    /// Apply the permission gate, answering the invoker when they are turned away
    async fn gate(&self, command: &CommandVariant, source: &mut CommandSource) -> Option<DispatchOutcome> {
        let check = can_member_execute(source.member(), command.descriptor());
        if check.can_execute {
            return None;
        }

        tracing::debug!(
            "{} cannot execute {}: {:?}",
            source.user().tag(),
            command.canonical_name(),
            check.reason
        );
        let payload = rejection_payload(&check, source.user());
        if let Err(e) = send_temporal(source, payload).await {
            tracing::warn!("Failed to send rejection for {}: {}", command.canonical_name(), e);
        }
        Some(DispatchOutcome::Rejected(check))
    }

    async fn run(&self, command: &CommandVariant, mut ctx: CommandContext) -> DispatchOutcome {
        let name = command.canonical_name().to_string();
        match commands::execute(command, &mut ctx).await {
            Ok(path) => DispatchOutcome::Completed {
                command: name,
                path,
                outcome: ctx.outcome(),
            },
            Err(e) => {
                tracing::error!("Command {} failed: {}", name, e);
                let detail = e.to_string();
                if let Err(report) = ctx.send_error(Some(&detail)).await {
                    tracing::error!("Failed to report error of {}: {}", name, report);
                }
                DispatchOutcome::Failed { command: name, error: detail }
            }
        }
    }
}

