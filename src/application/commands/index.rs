//! Command index - alias and category lookups built once at startup

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::variant::CommandVariant;
use crate::domain::traits::ManifestCommand;

/// Read-only index of every loaded command
#[derive(Default)]
pub struct CommandIndex {
    /// name or alias -> command
    commands: HashMap<String, Arc<CommandVariant>>,
    /// category folder -> commands in load order
    categories: BTreeMap<String, Vec<Arc<CommandVariant>>>,
    /// canonical names in load order
    main_commands: Vec<String>,
}

impl CommandIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a category exists, even if none of its units load
    pub fn add_category(&mut self, category: &str) {
        self.categories.entry(category.to_string()).or_default();
    }

    /// Register a command under `category`.
    ///
    /// Every name of the command is indexed. A name that was already taken is
    /// overwritten and reported back; the last registration wins.
    pub fn register(&mut self, category: &str, command: CommandVariant) -> Vec<String> {
        let command = Arc::new(command);
        let mut overridden = Vec::new();

        self.categories
            .entry(category.to_string())
            .or_default()
            .push(Arc::clone(&command));
        self.main_commands.push(command.canonical_name().to_string());

        for name in &command.descriptor().names {
            if self.commands.insert(name.clone(), Arc::clone(&command)).is_some() {
                overridden.push(name.clone());
            }
        }
        overridden
    }

    /// Find a command by canonical name or alias
    pub fn lookup(&self, name: &str) -> Option<&Arc<CommandVariant>> {
        self.commands.get(name)
    }

    pub fn categories_view(&self) -> &BTreeMap<String, Vec<Arc<CommandVariant>>> {
        &self.categories
    }

    pub fn main_commands(&self) -> &[String] {
        &self.main_commands
    }

    /// Every indexed name, aliases included
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Number of loaded commands (not names)
    pub fn len(&self) -> usize {
        self.main_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main_commands.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Manifest entries for every loaded command, in load order
    pub fn manifest(&self) -> Vec<ManifestCommand> {
        self.categories
            .values()
            .flatten()
            .map(|command| command.manifest())
            .collect()
    }
}
