//! Mention helpers - turn `<@id>`-style mentions (or raw ids) into platform entities

use std::future::Future;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::BotError;
use crate::domain::entities::{Channel, Member, Role, User};
use crate::domain::traits::Platform;

static USER_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@!?(\d+)>$").unwrap());
static CHANNEL_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<#(\d+)>$").unwrap());
static ROLE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@&(\d+)>$").unwrap());
static SNOWFLAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKind {
    User,
    Channel,
    Role,
}

impl MentionKind {
    fn pattern(self) -> &'static Regex {
        match self {
            MentionKind::User => &USER_MENTION,
            MentionKind::Channel => &CHANNEL_MENTION,
            MentionKind::Role => &ROLE_MENTION,
        }
    }
}

/// Extract the id from a mention of `kind`, or accept a bare id
pub fn mention_to_snowflake(input: &str, kind: MentionKind) -> Option<String> {
    let input = input.trim();
    if SNOWFLAKE.is_match(input) {
        return Some(input.to_string());
    }
    kind.pattern()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// Unknown entities are `None`; every other failure is propagated
async fn try_fetch<T, F>(fetch: F) -> Result<Option<T>, BotError>
where
    F: Future<Output = Result<T, BotError>>,
{
    match fetch.await {
        Ok(value) => Ok(Some(value)),
        Err(BotError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn mention_to_user(platform: &dyn Platform, input: &str) -> Result<Option<User>, BotError> {
    let Some(id) = mention_to_snowflake(input, MentionKind::User) else {
        return Ok(None);
    };
    try_fetch(platform.fetch_user(&id)).await
}

pub async fn mention_to_member(
    platform: &dyn Platform,
    guild_id: &str,
    input: &str,
) -> Result<Option<Member>, BotError> {
    let Some(id) = mention_to_snowflake(input, MentionKind::User) else {
        return Ok(None);
    };
    try_fetch(platform.fetch_member(guild_id, &id)).await
}

pub async fn mention_to_channel(platform: &dyn Platform, input: &str) -> Result<Option<Channel>, BotError> {
    let Some(id) = mention_to_snowflake(input, MentionKind::Channel) else {
        return Ok(None);
    };
    try_fetch(platform.fetch_channel(&id)).await
}

pub async fn mention_to_role(platform: &dyn Platform, guild_id: &str, input: &str) -> Result<Option<Role>, BotError> {
    let Some(id) = mention_to_snowflake(input, MentionKind::Role) else {
        return Ok(None);
    };
    try_fetch(platform.fetch_role(guild_id, &id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_to_snowflake() {
        let id = "123456789012345678";
        assert_eq!(mention_to_snowflake(&format!("<@{}>", id), MentionKind::User).as_deref(), Some(id));
        assert_eq!(mention_to_snowflake(&format!("<@!{}>", id), MentionKind::User).as_deref(), Some(id));
        assert_eq!(mention_to_snowflake(&format!("<#{}>", id), MentionKind::Channel).as_deref(), Some(id));
        assert_eq!(mention_to_snowflake(&format!("<@&{}>", id), MentionKind::Role).as_deref(), Some(id));
        assert_eq!(mention_to_snowflake(id, MentionKind::Role).as_deref(), Some(id));
    }

    #[test]
    fn test_short_ids_are_accepted() {
        assert_eq!(mention_to_snowflake("42", MentionKind::User).as_deref(), Some("42"));
        assert_eq!(mention_to_snowflake("<@7>", MentionKind::User).as_deref(), Some("7"));
        assert_eq!(mention_to_snowflake("<#1234>", MentionKind::Channel).as_deref(), Some("1234"));
        assert!(mention_to_snowflake("<@>", MentionKind::User).is_none());
        assert!(mention_to_snowflake("42a", MentionKind::User).is_none());
    }

    #[test]
    fn test_mention_kind_mismatch() {
        let id = "123456789012345678";
        assert!(mention_to_snowflake(&format!("<#{}>", id), MentionKind::User).is_none());
        assert!(mention_to_snowflake(&format!("<@&{}>", id), MentionKind::User).is_none());
        assert!(mention_to_snowflake("not a mention", MentionKind::User).is_none());
    }
}
