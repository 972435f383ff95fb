//! Command metadata shared by every command variant

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform permissions a command may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Administrator,
    ManageGuild,
    ManageChannels,
    ManageRoles,
    ManageMessages,
    KickMembers,
    BanMembers,
    ModerateMembers,
    MentionEveryone,
    SendMessages,
    EmbedLinks,
    AttachFiles,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Administrator => "ADMINISTRATOR",
            Permission::ManageGuild => "MANAGE_GUILD",
            Permission::ManageChannels => "MANAGE_CHANNELS",
            Permission::ManageRoles => "MANAGE_ROLES",
            Permission::ManageMessages => "MANAGE_MESSAGES",
            Permission::KickMembers => "KICK_MEMBERS",
            Permission::BanMembers => "BAN_MEMBERS",
            Permission::ModerateMembers => "MODERATE_MEMBERS",
            Permission::MentionEveryone => "MENTION_EVERYONE",
            Permission::SendMessages => "SEND_MESSAGES",
            Permission::EmbedLinks => "EMBED_LINKS",
            Permission::AttachFiles => "ATTACH_FILES",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accent color of an embed. Zero means "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub const UNSET: Color = Color(0);
    pub const RED: Color = Color(0xed4245);
    pub const GREEN: Color = Color(0x3db06f);
    pub const BLURPLE: Color = Color(0x5865f2);

    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }

    /// This color, or `fallback` when unset
    pub fn or(self, fallback: Color) -> Color {
        if self.is_unset() {
            fallback
        } else {
            self
        }
    }
}

/// Immutable metadata attached to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// First entry is the canonical name, the rest are aliases
    pub names: Vec<String>,
    pub description: String,
    pub color: Color,
    pub usage: Option<String>,
    pub permissions: Vec<Permission>,
    pub ephemeral: Option<bool>,
    pub guild_only: bool,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            description: description.into(),
            color: Color::UNSET,
            usage: None,
            permissions: Vec::new(),
            ephemeral: None,
            guild_only: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or_default()
    }

    /// Whether the command can only run with guild membership
    pub fn requires_guild(&self) -> bool {
        self.guild_only || !self.permissions.is_empty()
    }
}
