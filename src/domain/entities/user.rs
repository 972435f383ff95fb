use std::collections::HashSet;
use std::fmt;

use super::Permission;

/// Represents a platform user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar_url: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            discriminator: None,
            avatar_url: None,
            is_bot: false,
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// `name#1234`, or just the username when there is no discriminator
    pub fn tag(&self) -> String {
        match &self.discriminator {
            Some(d) => format!("{}#{}", self.username, d),
            None => self.username.clone(),
        }
    }

    /// Mention markup that pings this user
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A user's membership in a guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user: User,
    pub guild_id: String,
    pub nickname: Option<String>,
    pub permissions: HashSet<Permission>,
}

impl Member {
    pub fn new(user: User, guild_id: impl Into<String>) -> Self {
        Self {
            user,
            guild_id: guild_id.into(),
            nickname: None,
            permissions: HashSet::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    /// Administrators implicitly hold every permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&Permission::Administrator) || self.permissions.contains(&permission)
    }
}

/// Guild (server) the bot runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

/// Guild channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: Option<String>,
    pub guild_id: Option<String>,
}

/// Guild role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub guild_id: String,
}
