//! # satchel-commands
//!
//! The command surface over the session document:
//! `session_data_update`, `session_data_del`, `session_data_list_add` and
//! `session_data_list_del`. Each command takes JSON arguments and a
//! [`RequestContext`](satchel_core::RequestContext), and returns the
//! document it stored.

#![deny(unsafe_code)]

pub mod command;
pub mod errors;
pub mod registry;
pub mod session_data;

use std::sync::Arc;

pub use command::{Command, CommandDefinition};
pub use errors::CommandError;
pub use registry::CommandRegistry;
pub use session_data::{DeleteCommand, ListAddCommand, ListDeleteCommand, UpdateCommand};

/// Registry with the four session data commands.
pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(UpdateCommand));
    registry.register(Arc::new(DeleteCommand));
    registry.register(Arc::new(ListAddCommand));
    registry.register(Arc::new(ListDeleteCommand));
    registry
}
