//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::errors::BotError;
use crate::domain::entities::{
    AutocompleteChoice, Channel, Embed, Guild, Member, Message, Payload, Permission, Role, SentMessage, User,
};
use crate::domain::traits::{BotInfo, InteractionRef, ManifestCommand, Platform};

const CONSOLE_GUILD: &str = "100000000000000000";
const CONSOLE_CHANNEL: &str = "100000000000000001";
const CONSOLE_USER: &str = "100000000000000002";

/// Console platform for local development. The operator is an administrator
/// of a single pretend guild.
pub struct ConsoleAdapter {
    info: BotInfo,
    next_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
                username: "console".to_string(),
            },
            next_id: AtomicU64::new(1),
        }
    }

    pub fn operator(&self) -> User {
        User::new(CONSOLE_USER, "operator")
    }

    pub fn operator_member(&self) -> Member {
        Member::new(self.operator(), CONSOLE_GUILD).with_permissions([Permission::Administrator])
    }

    /// Wrap a line typed by the operator into a guild message
    pub fn message(&self, line: impl Into<String>) -> Message {
        Message::new(CONSOLE_CHANNEL, self.operator(), line).with_member(self.operator_member())
    }

    fn sent(&self, channel_id: &str) -> SentMessage {
        SentMessage {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    fn print(&self, marker: &str, payload: &Payload) {
        println!("{}", render(marker, payload));
    }
}

/// Plain-text rendering of a payload
pub fn render(marker: &str, payload: &Payload) -> String {
    let mut lines = vec![format!("[{}]", marker)];
    if let Some(content) = &payload.content {
        lines.push(content.clone());
    }
    for embed in &payload.embeds {
        lines.extend(render_embed(embed));
    }
    for file in &payload.files {
        lines.push(format!("  (file) {}", file.name));
    }
    for row in &payload.components {
        let labels: Vec<&str> = row.buttons.iter().map(|b| b.label.as_str()).collect();
        lines.push(format!("  [Buttons] {}", labels.join(" | ")));
    }
    lines.join("\n")
}

fn render_embed(embed: &Embed) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(author) = &embed.author {
        lines.push(format!("  {}", author));
    }
    if let Some(title) = &embed.title {
        lines.push(format!("  {}", title));
    }
    if let Some(description) = &embed.description {
        lines.push(format!("  {}", description));
    }
    for field in &embed.fields {
        lines.push(format!("  {}: {}", field.name, field.value));
    }
    if let Some(footer) = &embed.footer {
        lines.push(format!("  -- {}", footer.text));
    }
    lines
}

#[async_trait]
impl Platform for ConsoleAdapter {
    async fn login(&self, _token: &str) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: &str,
        payload: &Payload,
        _reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError> {
        self.print("BOT", payload);
        Ok(self.sent(channel_id))
    }

    async fn edit_message(&self, message: &SentMessage, payload: &Payload) -> Result<SentMessage, BotError> {
        self.print(&format!("BOT edit #{}", message.id), payload);
        Ok(message.clone())
    }

    async fn delete_message(&self, message: &SentMessage) -> Result<(), BotError> {
        println!("[BOT deleted #{}]", message.id);
        Ok(())
    }

    async fn defer_interaction(&self, _interaction: &InteractionRef, _ephemeral: bool) -> Result<(), BotError> {
        println!("[BOT is thinking...]");
        Ok(())
    }

    async fn reply_interaction(&self, interaction: &InteractionRef, payload: &Payload) -> Result<SentMessage, BotError> {
        self.print("BOT", payload);
        Ok(self.sent(&interaction.channel_id))
    }

    async fn edit_interaction_reply(
        &self,
        interaction: &InteractionRef,
        payload: &Payload,
    ) -> Result<SentMessage, BotError> {
        self.print("BOT edit", payload);
        Ok(self.sent(&interaction.channel_id))
    }

    async fn respond_autocomplete(
        &self,
        _interaction: &InteractionRef,
        choices: &[AutocompleteChoice],
    ) -> Result<(), BotError> {
        let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        println!("[Choices] {}", names.join(", "));
        Ok(())
    }

    async fn register_guild_commands(&self, guild_id: &str, commands: &[ManifestCommand]) -> Result<(), BotError> {
        let manifest = serde_json::to_string(commands).map_err(|e| BotError::Platform(e.to_string()))?;
        tracing::debug!("Command manifest for {}: {}", guild_id, manifest);
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<User, BotError> {
        if user_id == CONSOLE_USER {
            Ok(self.operator())
        } else {
            Err(BotError::NotFound(format!("user {}", user_id)))
        }
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, BotError> {
        if guild_id == CONSOLE_GUILD {
            Ok(Guild {
                id: CONSOLE_GUILD.to_string(),
                name: "console".to_string(),
            })
        } else {
            Err(BotError::NotFound(format!("guild {}", guild_id)))
        }
    }

    async fn fetch_member(&self, guild_id: &str, user_id: &str) -> Result<Member, BotError> {
        if guild_id == CONSOLE_GUILD && user_id == CONSOLE_USER {
            Ok(self.operator_member())
        } else {
            Err(BotError::NotFound(format!("member {} of {}", user_id, guild_id)))
        }
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, BotError> {
        if channel_id == CONSOLE_CHANNEL {
            Ok(Channel {
                id: CONSOLE_CHANNEL.to_string(),
                name: Some("console".to_string()),
                guild_id: Some(CONSOLE_GUILD.to_string()),
            })
        } else {
            Err(BotError::NotFound(format!("channel {}", channel_id)))
        }
    }

    async fn fetch_role(&self, guild_id: &str, role_id: &str) -> Result<Role, BotError> {
        Err(BotError::NotFound(format!("role {} of {}", role_id, guild_id)))
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
