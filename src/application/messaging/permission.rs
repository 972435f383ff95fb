//! Permission gate - decides whether an invoker may run a command

use crate::domain::entities::{Color, CommandDescriptor, Embed, Member, Payload, Permission, User};

/// Why a command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    GuildRequired,
    InsufficientPermissions,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::GuildRequired => "You can only use this command inside a server.",
            DenialReason::InsufficientPermissions => "You don't have enough permissions to use this command.",
        }
    }
}

/// Result of a permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheck {
    pub can_execute: bool,
    pub reason: Option<DenialReason>,
    /// Every required permission the member lacks, in declared order
    pub missing: Vec<Permission>,
}

impl PermissionCheck {
    fn allowed() -> Self {
        Self {
            can_execute: true,
            reason: None,
            missing: Vec::new(),
        }
    }

    fn denied(reason: DenialReason, missing: Vec<Permission>) -> Self {
        Self {
            can_execute: false,
            reason: Some(reason),
            missing,
        }
    }
}

/// Check whether `member` can execute a command described by `descriptor`.
/// `None` means the invocation happened outside a guild.
pub fn can_member_execute(member: Option<&Member>, descriptor: &CommandDescriptor) -> PermissionCheck {
    let Some(member) = member else {
        if descriptor.requires_guild() {
            return PermissionCheck::denied(DenialReason::GuildRequired, Vec::new());
        }
        return PermissionCheck::allowed();
    };

    let missing: Vec<Permission> = descriptor
        .permissions
        .iter()
        .copied()
        .filter(|p| !member.has_permission(*p))
        .collect();

    if missing.is_empty() {
        PermissionCheck::allowed()
    } else {
        PermissionCheck::denied(DenialReason::InsufficientPermissions, missing)
    }
}

/// Response sent to an invoker the gate turned away
pub fn rejection_payload(check: &PermissionCheck, user: &User) -> Payload {
    let reason = check.reason.map(|r| r.message()).unwrap_or_default();
    let mut embed = Embed::new()
        .title("❌ Error")
        .description(format!("You cannot execute this command: **{}**", reason))
        .color(Color::RED);
    if !check.missing.is_empty() {
        let missing: Vec<&str> = check.missing.iter().map(Permission::as_str).collect();
        embed = embed.field("Missing permissions", format!("```{}```", missing.join(", ")), false);
    }
    Payload::text(user.mention()).with_embed(embed)
}
