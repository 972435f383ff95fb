//! Usage rendering

use super::variant::{ParentCommand, SubCommand};
use crate::domain::entities::{Color, CommandDescriptor, Embed};

fn code_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("`{}`", item))
        .collect::<Vec<_>>()
        .join(", ")
}

fn usage_line(prefix: &str, path: &str, usage: Option<&str>) -> String {
    match usage {
        Some(usage) => format!("`{}{} {}`", prefix, path, usage),
        None => format!("`{}{}`", prefix, path),
    }
}

fn header(title: String, descriptor: &CommandDescriptor, color: Color) -> Embed {
    let embed = Embed::new()
        .author(title)
        .description(descriptor.description.clone());
    if color.is_unset() {
        embed
    } else {
        embed.color(color)
    }
}

fn with_common_fields(mut embed: Embed, descriptor: &CommandDescriptor) -> Embed {
    if !descriptor.permissions.is_empty() {
        embed = embed.field(
            "Required Permissions",
            code_list(descriptor.permissions.iter().map(|p| p.as_str())),
            true,
        );
    }
    if !descriptor.aliases().is_empty() {
        embed = embed.field("Aliases", code_list(descriptor.aliases().iter().map(String::as_str)), false);
    }
    embed
}

pub(crate) fn leaf_usage(descriptor: &CommandDescriptor, prefix: &str) -> Embed {
    let name = descriptor.canonical_name();
    let embed = header(format!("❔ Showing usage of {}{}", prefix, name), descriptor, descriptor.color)
        .field("Usage", usage_line(prefix, name, descriptor.usage.as_deref()), true);
    with_common_fields(embed, descriptor)
}

pub(crate) fn parent_usage(parent: &ParentCommand, prefix: &str) -> Embed {
    let descriptor = parent.descriptor();
    let name = descriptor.canonical_name();
    let mut embed = header(format!("❔ Showing usage of {}{}", prefix, name), descriptor, descriptor.color)
        .field("Subcommands", code_list(parent.subcommands().iter().map(SubCommand::name)), true);
    if let Some(usage) = &descriptor.usage {
        embed = embed.field("Usage", usage_line(prefix, name, Some(usage)), true);
    }
    with_common_fields(embed, descriptor)
}

pub(crate) fn sub_usage(sub: &SubCommand, prefix: &str) -> Embed {
    let descriptor = sub.descriptor();
    let path = format!("{} {}", sub.parent().canonical_name(), sub.name());
    let color = descriptor.color.or(sub.parent().color);
    let embed = header(format!("❔ Showing usage of {}{}", prefix, path), descriptor, color)
        .field("Usage", usage_line(prefix, &path, descriptor.usage.as_deref()), true);
    with_common_fields(embed, descriptor)
}

/// One-paragraph summary used by help listings
pub fn overview(descriptor: &CommandDescriptor) -> String {
    format!("**{}**\n{}\n", descriptor.names.join(", "), descriptor.description)
}
