use chrono::{DateTime, Utc};

use super::{Member, ResolvedOptions, User};

/// Text message received from a channel
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub author: User,
    /// Present only when the message was sent inside a guild
    pub member: Option<Member>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            member: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.guild_id = Some(member.guild_id.clone());
        self.member = Some(member);
        self
    }
}

/// Structured command invocation (slash command or context menu)
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: String,
    pub token: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub user: User,
    pub member: Option<Member>,
    pub command_name: String,
    pub options: ResolvedOptions,
}

impl Interaction {
    pub fn new(channel_id: impl Into<String>, user: User, command_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            token: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            guild_id: None,
            user,
            member: None,
            command_name: command_name.into(),
            options: ResolvedOptions::new(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.guild_id = Some(member.guild_id.clone());
        self.member = Some(member);
        self
    }

    pub fn with_options(mut self, options: ResolvedOptions) -> Self {
        self.options = options;
        self
    }
}

/// Request for autocomplete choices while the user types an option
#[derive(Debug, Clone)]
pub struct AutocompleteRequest {
    pub interaction_id: String,
    pub token: String,
    pub channel_id: String,
    pub user: User,
    pub guild_id: Option<String>,
    pub command_name: String,
    pub subcommand: Option<String>,
    pub focused_option: String,
    pub focused_value: String,
}

/// A single autocomplete choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

impl AutocompleteChoice {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: value.clone(),
            value,
        }
    }
}

/// Raw inbound event from the platform
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(Message),
    Interaction(Interaction),
    Autocomplete(AutocompleteRequest),
}
