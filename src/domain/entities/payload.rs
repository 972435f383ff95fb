//! Outbound message payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Color;

/// Rich visual block attached to a message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub color: Option<Color>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<Footer>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
    pub icon_url: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>, icon_url: Option<String>) -> Self {
        self.footer = Some(Footer {
            text: text.into(),
            icon_url,
        });
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }
}

/// Binary file attached to a message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Row of interactive elements
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionRow {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    pub custom_id: String,
}

impl ActionRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(mut self, label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            custom_id: custom_id.into(),
        });
        self
    }
}

/// Normalized outbound message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payload {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub files: Vec<Attachment>,
    pub components: Vec<ActionRow>,
    pub ephemeral: Option<bool>,
    /// Whether replying to a deleted message should fail
    pub fail_if_not_exists: Option<bool>,
    /// Whether the replied-to author gets notified
    pub mention_replied_user: Option<bool>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }
}

/// Primary content handed to the response assembler
#[derive(Debug, Clone)]
pub enum ResponseContent {
    Text(String),
    Embed(Embed),
    Attachment(Attachment),
    Row(ActionRow),
    Payload(Payload),
}

impl From<&str> for ResponseContent {
    fn from(value: &str) -> Self {
        ResponseContent::Text(value.to_string())
    }
}

impl From<String> for ResponseContent {
    fn from(value: String) -> Self {
        ResponseContent::Text(value)
    }
}

impl From<Embed> for ResponseContent {
    fn from(value: Embed) -> Self {
        ResponseContent::Embed(value)
    }
}

impl From<Attachment> for ResponseContent {
    fn from(value: Attachment) -> Self {
        ResponseContent::Attachment(value)
    }
}

impl From<ActionRow> for ResponseContent {
    fn from(value: ActionRow) -> Self {
        ResponseContent::Row(value)
    }
}

impl From<Payload> for ResponseContent {
    fn from(value: Payload) -> Self {
        ResponseContent::Payload(value)
    }
}

/// Extra blocks appended after the primary content
#[derive(Debug, Clone)]
pub enum Addition {
    Embed(Embed),
    Attachment(Attachment),
    Row(ActionRow),
}

impl From<Embed> for Addition {
    fn from(value: Embed) -> Self {
        Addition::Embed(value)
    }
}

impl From<Attachment> for Addition {
    fn from(value: Attachment) -> Self {
        Addition::Attachment(value)
    }
}

impl From<ActionRow> for Addition {
    fn from(value: ActionRow) -> Self {
        Addition::Row(value)
    }
}

/// Handle to a message the platform accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
}
