//! Invocation sources - one reply/edit/defer surface over messages and interactions

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{Interaction, Member, Message, Payload, SentMessage, User};
use crate::domain::traits::{InteractionRef, Platform};

/// A command invoked by a plain text message
#[derive(Debug, Clone)]
pub struct TextInvocation {
    pub message: Message,
}

/// A command invoked through a structured interaction
#[derive(Debug, Clone)]
pub struct InteractionInvocation {
    pub interaction: Interaction,
    pub deferred: bool,
    pub replied: bool,
}

impl InteractionInvocation {
    fn reference(&self) -> InteractionRef {
        InteractionRef {
            id: self.interaction.id.clone(),
            token: self.interaction.token.clone(),
            channel_id: self.interaction.channel_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Invocation {
    Text(TextInvocation),
    Interaction(InteractionInvocation),
}

/// Where a command came from, plus the platform used to answer it
#[derive(Clone)]
pub struct CommandSource {
    platform: Arc<dyn Platform>,
    invocation: Invocation,
}

impl CommandSource {
    pub fn text(platform: Arc<dyn Platform>, message: Message) -> Self {
        Self {
            platform,
            invocation: Invocation::Text(TextInvocation { message }),
        }
    }

    pub fn interaction(platform: Arc<dyn Platform>, interaction: Interaction) -> Self {
        Self {
            platform,
            invocation: Invocation::Interaction(InteractionInvocation {
                interaction,
                deferred: false,
                replied: false,
            }),
        }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn is_interaction(&self) -> bool {
        matches!(self.invocation, Invocation::Interaction(_))
    }

    pub fn is_deferred(&self) -> bool {
        match &self.invocation {
            Invocation::Interaction(i) => i.deferred,
            Invocation::Text(_) => false,
        }
    }

    pub fn user(&self) -> &User {
        match &self.invocation {
            Invocation::Text(t) => &t.message.author,
            Invocation::Interaction(i) => &i.interaction.user,
        }
    }

    /// Guild membership of the invoker, absent in direct messages
    pub fn member(&self) -> Option<&Member> {
        match &self.invocation {
            Invocation::Text(t) => t.message.member.as_ref(),
            Invocation::Interaction(i) => i.interaction.member.as_ref(),
        }
    }

    pub fn guild_id(&self) -> Option<&str> {
        match &self.invocation {
            Invocation::Text(t) => t.message.guild_id.as_deref(),
            Invocation::Interaction(i) => i.interaction.guild_id.as_deref(),
        }
    }

    pub fn channel_id(&self) -> &str {
        match &self.invocation {
            Invocation::Text(t) => &t.message.channel_id,
            Invocation::Interaction(i) => &i.interaction.channel_id,
        }
    }

    /// Acknowledge now, answer later. Text invocations have nothing to defer.
    pub async fn defer(&mut self, ephemeral: bool) -> Result<(), BotError> {
        match &mut self.invocation {
            Invocation::Text(_) => Ok(()),
            Invocation::Interaction(i) => {
                if i.deferred || i.replied {
                    return Ok(());
                }
                self.platform.defer_interaction(&i.reference(), ephemeral).await?;
                i.deferred = true;
                Ok(())
            }
        }
    }

    /// Send the first answer. A deferred interaction gets its placeholder edited instead.
    pub async fn reply(&mut self, payload: &Payload) -> Result<SentMessage, BotError> {
        match &mut self.invocation {
            Invocation::Text(t) => {
                self.platform
                    .send_message(&t.message.channel_id, payload, Some(&t.message.id))
                    .await
            }
            Invocation::Interaction(i) => {
                let reference = i.reference();
                let sent = if i.deferred || i.replied {
                    self.platform.edit_interaction_reply(&reference, payload).await?
                } else {
                    self.platform.reply_interaction(&reference, payload).await?
                };
                i.replied = true;
                Ok(sent)
            }
        }
    }

    /// Edit a previous answer. Text invocations need the message to edit.
    pub async fn edit(&mut self, previous: Option<&SentMessage>, payload: &Payload) -> Result<SentMessage, BotError> {
        match &mut self.invocation {
            Invocation::Text(_) => {
                let previous = previous.ok_or(BotError::MissingResponseTarget)?;
                self.platform.edit_message(previous, payload).await
            }
            Invocation::Interaction(i) => {
                let sent = self.platform.edit_interaction_reply(&i.reference(), payload).await?;
                i.replied = true;
                Ok(sent)
            }
        }
    }
}
