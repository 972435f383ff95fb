//! Message parser - finds commands in raw text and resolves their arguments

use async_trait::async_trait;

use super::mentions::{mention_to_snowflake, MentionKind};
use crate::application::commands::CommandVariant;
use crate::domain::entities::{Message, OptionKind, OptionSpec, OptionValue, ResolvedOptions};

/// A command found in a text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub prefix: String,
    pub name: String,
    pub args: Vec<String>,
}

/// Parses incoming text into commands
pub struct MessageParser {
    prefixes: Vec<String>,
}

impl MessageParser {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Find the command in `text`. The first matching prefix wins.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let prefix = self
            .prefixes
            .iter()
            .find(|p| !p.is_empty() && text.starts_with(p.as_str()))?;

        let rest = &text[prefix.len()..];
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().filter(|n| !n.is_empty())?.to_string();
        let args = split(parts.next().unwrap_or_default());

        Some(ParsedCommand {
            prefix: prefix.clone(),
            name,
            args,
        })
    }
}

/// Split on whitespace, keeping double-quoted sections together
pub fn split(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

/// Turns text arguments into resolved options. `None` means the arguments don't fit the command.
#[async_trait]
pub trait ArgumentParser: Send + Sync {
    async fn resolve(&self, message: &Message, args: &[String], command: &CommandVariant) -> Option<ResolvedOptions>;
}

/// Positional parser: arguments fill declared options in order.
///
/// For parents the first argument is the subcommand token. A trailing string
/// option swallows the remaining arguments.
#[derive(Debug, Default)]
pub struct PositionalArgumentParser;

#[async_trait]
impl ArgumentParser for PositionalArgumentParser {
    async fn resolve(&self, _message: &Message, args: &[String], command: &CommandVariant) -> Option<ResolvedOptions> {
        match command {
            CommandVariant::Leaf(leaf) => resolve_positional(&leaf.handler().options(), args, ResolvedOptions::new()),
            CommandVariant::Parent(parent) => {
                let Some((token, rest)) = args.split_first() else {
                    return Some(ResolvedOptions::new());
                };
                let options = ResolvedOptions::new().with_subcommand(token.clone());
                match parent.find_subcommand(token) {
                    Some(sub) => resolve_positional(&sub.handler().options(), rest, options),
                    // unknown subcommands still resolve; the parent answers with its usage
                    None => Some(options),
                }
            }
        }
    }
}

fn resolve_positional(specs: &[OptionSpec], args: &[String], mut options: ResolvedOptions) -> Option<ResolvedOptions> {
    for (i, spec) in specs.iter().enumerate() {
        let Some(raw) = args.get(i) else {
            if spec.required {
                return None;
            }
            break;
        };
        let is_last = i + 1 == specs.len();
        let value = if is_last && spec.kind == OptionKind::String {
            OptionValue::String(args[i..].join(" "))
        } else {
            coerce(spec.kind, raw)?
        };
        options.insert(spec.name.clone(), value);
    }
    Some(options)
}

fn coerce(kind: OptionKind, raw: &str) -> Option<OptionValue> {
    match kind {
        OptionKind::String => Some(OptionValue::String(raw.to_string())),
        OptionKind::Integer => raw.parse().ok().map(OptionValue::Integer),
        OptionKind::Number => raw.parse().ok().map(OptionValue::Number),
        OptionKind::Boolean => match raw.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(OptionValue::Boolean(true)),
            "false" | "no" | "off" | "0" => Some(OptionValue::Boolean(false)),
            _ => None,
        },
        OptionKind::User => mention_to_snowflake(raw, MentionKind::User).map(OptionValue::String),
        OptionKind::Channel => mention_to_snowflake(raw, MentionKind::Channel).map(OptionValue::String),
        OptionKind::Role => mention_to_snowflake(raw, MentionKind::Role).map(OptionValue::String),
    }
}
