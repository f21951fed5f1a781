//! Command registry and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use satchel_core::{Document, RequestContext};
use tracing::{debug, warn};

use crate::command::{Command, CommandDefinition};
use crate::errors::CommandError;

/// Registry of invocable commands, keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any with the same name.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        debug!(name = %name, "registering command");
        let _ = self.commands.insert(name, command);
    }

    /// Remove a command by name.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    /// Look up a command.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).map(Arc::clone)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of every command, sorted by name.
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        let mut defs: Vec<CommandDefinition> =
            self.commands.values().map(|c| c.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered commands.
    pub fn count(&self) -> usize {
        self.commands.len()
    }

    /// Run the command called `name`.
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError> {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        let result = command.execute(args, ctx).await;
        if let Err(err) = &result {
            warn!(
                request_id = %ctx.id,
                command = name,
                kind = err.kind(),
                error = %err,
                "command failed"
            );
        }
        result
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
