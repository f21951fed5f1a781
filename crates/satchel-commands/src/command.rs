//! Command trait and definitions.

use async_trait::async_trait;
use satchel_core::{Document, RequestContext};
use serde::{Deserialize, Serialize};

use crate::errors::CommandError;

/// Description of a command for callers and tool listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    /// Invocation name.
    pub name: String,
    /// What the command does.
    pub description: String,
    /// JSON Schema of the argument object.
    pub parameters_schema: serde_json::Value,
}

/// An externally invocable action over the request's session document.
#[async_trait]
pub trait Command: Send + Sync {
    /// Invocation name.
    fn name(&self) -> &str;

    /// What the command does.
    fn description(&self) -> &str;

    /// JSON Schema of the argument object.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Run against `ctx`, returning the document now stored in it.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError>;

    /// Definition built from the methods above.
    fn to_definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
        }
    }
}
