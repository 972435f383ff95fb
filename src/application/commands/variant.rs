//! Command variants: Leaf, Parent and Sub share a descriptor and a capability set

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::unsync::OnceCell;

use super::context::CommandContext;
use super::index::CommandIndex;
use super::usage;
use crate::application::errors::BotError;
use crate::domain::entities::{AutocompleteRequest, CommandDescriptor, Embed, OptionSpec};
use crate::domain::traits::{ManifestCommand, ManifestOption};

/// Behaviour a command plugin provides
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command for one invocation
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError>;

    /// Declared options, used for the remote manifest and text argument parsing
    fn options(&self) -> Vec<OptionSpec> {
        Vec::new()
    }

    /// Candidate values for `option` while the user is typing
    fn autocomplete(&self, _option: &str, _request: &AutocompleteRequest, _commands: &CommandIndex) -> Vec<String> {
        Vec::new()
    }
}

/// A directly executable command
pub struct LeafCommand {
    descriptor: Arc<CommandDescriptor>,
    handler: Arc<dyn CommandHandler>,
}

impl LeafCommand {
    pub fn new(descriptor: CommandDescriptor, handler: impl CommandHandler + 'static) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            handler: Arc::new(handler),
        }
    }

    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        &self.descriptor
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

/// A subcommand. Its parent's descriptor is bound when the parent is built.
pub struct SubCommand {
    descriptor: Arc<CommandDescriptor>,
    parent: Arc<CommandDescriptor>,
    handler: Arc<dyn CommandHandler>,
}

impl SubCommand {
    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        &self.descriptor
    }

    pub fn parent(&self) -> &CommandDescriptor {
        &self.parent
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    pub fn name(&self) -> &str {
        self.descriptor.canonical_name()
    }
}

/// A command whose execution is delegated to one of its subcommands
pub struct ParentCommand {
    descriptor: Arc<CommandDescriptor>,
    subcommands: Vec<SubCommand>,
}

impl ParentCommand {
    pub fn new(descriptor: CommandDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            subcommands: Vec::new(),
        }
    }

    /// Append a subcommand, binding this parent as its owner
    pub fn subcommand(mut self, descriptor: CommandDescriptor, handler: impl CommandHandler + 'static) -> Self {
        self.subcommands.push(SubCommand {
            descriptor: Arc::new(descriptor),
            parent: Arc::clone(&self.descriptor),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        &self.descriptor
    }

    pub fn subcommands(&self) -> &[SubCommand] {
        &self.subcommands
    }

    /// Find a subcommand by canonical name. Subcommand aliases are not matched.
    pub fn find_subcommand(&self, token: &str) -> Option<&SubCommand> {
        self.subcommands.iter().find(|sc| sc.name() == token)
    }
}

/// Per-invocation view of a parent that memoizes subcommand resolution
pub struct ParentInvocation<'a> {
    parent: &'a ParentCommand,
    resolved: OnceCell<Option<&'a SubCommand>>,
}

impl<'a> ParentInvocation<'a> {
    pub fn new(parent: &'a ParentCommand) -> Self {
        Self {
            parent,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the requested subcommand once; later calls return the first result
    pub fn subcommand(&self, token: Option<&str>) -> Option<&'a SubCommand> {
        let parent = self.parent;
        *self
            .resolved
            .get_or_init(|| token.and_then(|t| parent.find_subcommand(t)))
    }
}

/// A registered top-level command
pub enum CommandVariant {
    Leaf(LeafCommand),
    Parent(ParentCommand),
}

impl From<LeafCommand> for CommandVariant {
    fn from(value: LeafCommand) -> Self {
        CommandVariant::Leaf(value)
    }
}

impl From<ParentCommand> for CommandVariant {
    fn from(value: ParentCommand) -> Self {
        CommandVariant::Parent(value)
    }
}

impl CommandVariant {
    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        match self {
            CommandVariant::Leaf(leaf) => leaf.descriptor(),
            CommandVariant::Parent(parent) => parent.descriptor(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        self.descriptor().canonical_name()
    }

    pub fn as_command(&self) -> CommandRef<'_> {
        match self {
            CommandVariant::Leaf(leaf) => CommandRef::Leaf(leaf),
            CommandVariant::Parent(parent) => CommandRef::Parent(parent),
        }
    }

    /// Remote manifest entry; parents flatten their subcommands into options
    pub fn manifest(&self) -> ManifestCommand {
        let descriptor = self.descriptor();
        let options = match self {
            CommandVariant::Leaf(leaf) => leaf.handler().options().into_iter().map(ManifestOption::Value).collect(),
            CommandVariant::Parent(parent) => parent
                .subcommands()
                .iter()
                .map(|sc| ManifestOption::SubCommand {
                    name: sc.name().to_string(),
                    description: sc.descriptor().description.clone(),
                    options: sc.handler().options(),
                })
                .collect(),
        };
        ManifestCommand {
            name: descriptor.canonical_name().to_string(),
            description: descriptor.description.clone(),
            options,
        }
    }
}

/// Borrowed view over any node of the hierarchy; capability calls switch on the tag
#[derive(Clone, Copy)]
pub enum CommandRef<'a> {
    Leaf(&'a LeafCommand),
    Parent(&'a ParentCommand),
    Sub(&'a SubCommand),
}

impl<'a> CommandRef<'a> {
    pub fn descriptor(&self) -> &'a CommandDescriptor {
        match self {
            CommandRef::Leaf(leaf) => &leaf.descriptor,
            CommandRef::Parent(parent) => &parent.descriptor,
            CommandRef::Sub(sub) => &sub.descriptor,
        }
    }

    /// Declared options; parents have none of their own
    pub fn options(&self) -> Vec<OptionSpec> {
        match self {
            CommandRef::Leaf(leaf) => leaf.handler.options(),
            CommandRef::Sub(sub) => sub.handler.options(),
            CommandRef::Parent(_) => Vec::new(),
        }
    }

    /// Usage embed shown for this node
    pub fn usage(&self, prefix: &str) -> Embed {
        match self {
            CommandRef::Leaf(leaf) => usage::leaf_usage(&leaf.descriptor, prefix),
            CommandRef::Parent(parent) => usage::parent_usage(parent, prefix),
            CommandRef::Sub(sub) => usage::sub_usage(sub, prefix),
        }
    }

    /// Autocomplete candidates for `option`
    pub fn autocomplete(&self, option: &str, request: &AutocompleteRequest, commands: &CommandIndex) -> Vec<String> {
        match self {
            CommandRef::Leaf(leaf) => leaf.handler.autocomplete(option, request, commands),
            CommandRef::Sub(sub) => sub.handler.autocomplete(option, request, commands),
            CommandRef::Parent(_) => Vec::new(),
        }
    }
}
