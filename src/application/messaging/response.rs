//! Response assembly - turns command output into platform payloads

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use super::source::CommandSource;
use crate::application::errors::BotError;
use crate::domain::entities::{Addition, CommandDescriptor, Embed, Footer, Payload, ResponseContent};

/// How long temporal messages stay visible in non-interactive channels
pub const TEMPORAL_DELETE_DELAY: Duration = Duration::from_secs(5);

/// Build the outbound payload for `content` plus `additions`.
///
/// Defaults only fill fields that are absent, so assembling an already
/// assembled payload again yields the same payload.
pub fn assemble(
    descriptor: &CommandDescriptor,
    source: &CommandSource,
    content: impl Into<ResponseContent>,
    additions: Vec<Addition>,
) -> Payload {
    let mut additions = additions;
    let mut payload = match content.into() {
        ResponseContent::Text(text) => Payload::text(text),
        ResponseContent::Payload(payload) => payload,
        ResponseContent::Embed(embed) => {
            additions.insert(0, Addition::Embed(embed));
            Payload::new()
        }
        ResponseContent::Attachment(file) => {
            additions.insert(0, Addition::Attachment(file));
            Payload::new()
        }
        ResponseContent::Row(row) => {
            additions.insert(0, Addition::Row(row));
            Payload::new()
        }
    };

    for addition in additions {
        match addition {
            Addition::Embed(embed) => payload.embeds.push(embed),
            Addition::Attachment(file) => payload.files.push(file),
            Addition::Row(row) => payload.components.push(row),
        }
    }

    for embed in &mut payload.embeds {
        apply_embed_defaults(embed, descriptor, source);
    }

    if payload.ephemeral.is_none() {
        payload.ephemeral = descriptor.ephemeral;
    }

    if !source.is_interaction() {
        payload.fail_if_not_exists.get_or_insert(false);
        payload.mention_replied_user.get_or_insert(false);
    }

    payload
}

fn apply_embed_defaults(embed: &mut Embed, descriptor: &CommandDescriptor, source: &CommandSource) {
    if embed.color.is_none() && !descriptor.color.is_unset() {
        embed.color = Some(descriptor.color);
    }
    if embed.footer.is_none() {
        let user = source.user();
        embed.footer = Some(Footer {
            text: format!("Executed by {}", escape_markdown(&user.tag())),
            icon_url: user.avatar_url.clone(),
        });
    }
    if embed.timestamp.is_none() {
        embed.timestamp = Some(Utc::now());
    }
}

/// Escape characters the platform would render as formatting
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '~' | '|' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Send a short-lived response.
///
/// Interactions get an ephemeral reply and nothing else. Text invocations get a
/// normal reply that is deleted after [`TEMPORAL_DELETE_DELAY`]; the returned
/// handle resolves once the deletion ran.
pub async fn send_temporal(
    source: &mut CommandSource,
    mut payload: Payload,
) -> Result<Option<JoinHandle<()>>, BotError> {
    payload.ephemeral = Some(true);
    let sent = source.reply(&payload).await?;
    if source.is_interaction() {
        return Ok(None);
    }

    let platform = source.platform().clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(TEMPORAL_DELETE_DELAY).await;
        if let Err(e) = platform.delete_message(&sent).await {
            tracing::warn!("Failed to delete temporal message {}: {}", sent.id, e);
        }
    });
    Ok(Some(handle))
}
