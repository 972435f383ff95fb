use async_trait::async_trait;
use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::{
    AutocompleteChoice, Channel, Guild, Member, OptionSpec, Payload, Role, SentMessage, User,
};

/// Interaction addressed by the platform's reply endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: String,
    pub token: String,
    pub channel_id: String,
}

/// A guild-scoped command definition submitted to the platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestCommand {
    pub name: String,
    pub description: String,
    pub options: Vec<ManifestOption>,
}

/// An option of a manifest entry; subcommands nest their own options
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestOption {
    SubCommand {
        name: String,
        description: String,
        options: Vec<OptionSpec>,
    },
    Value(OptionSpec),
}

/// Platform trait - abstraction for the remote chat platform API
#[async_trait]
pub trait Platform: Send + Sync {
    /// Authenticate against the platform
    async fn login(&self, token: &str) -> Result<(), BotError>;

    /// Send a message to a channel, optionally as a reply
    async fn send_message(
        &self,
        channel_id: &str,
        payload: &Payload,
        reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError>;

    async fn edit_message(&self, message: &SentMessage, payload: &Payload) -> Result<SentMessage, BotError>;

    async fn delete_message(&self, message: &SentMessage) -> Result<(), BotError>;

    async fn defer_interaction(&self, interaction: &InteractionRef, ephemeral: bool) -> Result<(), BotError>;

    async fn reply_interaction(&self, interaction: &InteractionRef, payload: &Payload) -> Result<SentMessage, BotError>;

    async fn edit_interaction_reply(
        &self,
        interaction: &InteractionRef,
        payload: &Payload,
    ) -> Result<SentMessage, BotError>;

    async fn respond_autocomplete(
        &self,
        interaction: &InteractionRef,
        choices: &[AutocompleteChoice],
    ) -> Result<(), BotError>;

    /// Replace the guild's registered command manifest
    async fn register_guild_commands(&self, guild_id: &str, commands: &[ManifestCommand]) -> Result<(), BotError>;

    /// Fetch lookups fail with `BotError::NotFound` for unknown ids
    async fn fetch_user(&self, user_id: &str) -> Result<User, BotError>;

    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, BotError>;

    async fn fetch_member(&self, guild_id: &str, user_id: &str) -> Result<Member, BotError>;

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, BotError>;

    async fn fetch_role(&self, guild_id: &str, role_id: &str) -> Result<Role, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
