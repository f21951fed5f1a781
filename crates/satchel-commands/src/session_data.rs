//! The four `session_data_*` commands.
//!
//! Each one reads the document from the request context, applies one
//! document operation, stores the result back and returns it. A failed
//! operation leaves the stored document as it was.
//!
//! A context without a carrier is always `ContextUnavailable`. A carrier
//! without a document is an empty starting point for `update` and
//! `list_add`, and `NoDocument` for `del` and `list_del`.

use async_trait::async_trait;
use satchel_core::{Document, KeyPath, RequestContext, SessionError, Value, ops};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use crate::command::Command;
use crate::errors::CommandError;

fn parse<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, CommandError> {
    serde_json::from_value(args).map_err(|e| CommandError::InvalidArguments(e.to_string()))
}

fn path_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "array",
        "items": {"type": "string"},
        "description": description
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// session_data_update
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UpdateArgs {
    updates: serde_json::Value,
}

/// Deep-merge `updates` into the session document.
pub struct UpdateCommand;

#[async_trait]
impl Command for UpdateCommand {
    fn name(&self) -> &str {
        "session_data_update"
    }

    fn description(&self) -> &str {
        "Update session data with merge semantics. Nested objects merge \
         recursively; lists and other values are replaced."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["updates"],
            "properties": {
                "updates": {
                    "type": "object",
                    "description": "Fields to merge into the session data"
                }
            }
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError> {
        let request_id = ctx.id.clone();
        let carrier = ctx.require_carrier_mut()?;
        let args: UpdateArgs = parse(args)?;
        let patch = Document::try_from(args.updates)?;

        let next = ops::update(carrier.session(), &patch);
        let _ = carrier.replace_session(next.clone());
        info!(request_id = %request_id, keys = patch.len(), "session data updated");
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// session_data_del
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DeleteArgs {
    path: KeyPath,
}

/// Remove the value at `path`.
pub struct DeleteCommand;

#[async_trait]
impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "session_data_del"
    }

    fn description(&self) -> &str {
        "Delete a value from session data at the given key path."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["path"],
            "properties": {
                "path": path_schema("Keys leading to the value to delete")
            }
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError> {
        let request_id = ctx.id.clone();
        let carrier = ctx.require_carrier_mut()?;
        let args: DeleteArgs = parse(args)?;
        let current = carrier.session().ok_or(SessionError::NoDocument)?;

        let next = ops::delete(current, &args.path)?;
        let _ = carrier.replace_session(next.clone());
        info!(request_id = %request_id, path = %args.path, "session data key deleted");
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// session_data_list_add
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListAddArgs {
    path: KeyPath,
    value: Value,
}

/// Append `value` to the list at `path`, creating it if needed.
pub struct ListAddCommand;

#[async_trait]
impl Command for ListAddCommand {
    fn name(&self) -> &str {
        "session_data_list_add"
    }

    fn description(&self) -> &str {
        "Append a value to a list in session data, creating the list and any \
         missing parent objects."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["path", "value"],
            "properties": {
                "path": path_schema("Keys leading to the target list"),
                "value": {"description": "Value to append"}
            }
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError> {
        let request_id = ctx.id.clone();
        let carrier = ctx.require_carrier_mut()?;
        let args: ListAddArgs = parse(args)?;
        let empty = Document::new();
        let current = carrier.session().unwrap_or(&empty);

        let next = ops::list_append(current, &args.path, args.value)?;
        let _ = carrier.replace_session(next.clone());
        info!(request_id = %request_id, path = %args.path, "session data list appended");
        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// session_data_list_del
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListDeleteArgs {
    path: KeyPath,
    index: i64,
}

/// Remove the element at `index` from the list at `path`.
pub struct ListDeleteCommand;

#[async_trait]
impl Command for ListDeleteCommand {
    fn name(&self) -> &str {
        "session_data_list_del"
    }

    fn description(&self) -> &str {
        "Delete the item at an index from a list in session data."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["path", "index"],
            "properties": {
                "path": path_schema("Keys leading to the target list"),
                "index": {"type": "integer", "description": "Zero-based index to remove"}
            }
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &mut RequestContext,
    ) -> Result<Document, CommandError> {
        let request_id = ctx.id.clone();
        let carrier = ctx.require_carrier_mut()?;
        let args: ListDeleteArgs = parse(args)?;
        let current = carrier.session().ok_or(SessionError::NoDocument)?;

        let next = ops::list_delete(current, &args.path, args.index)?;
        let _ = carrier.replace_session(next.clone());
        info!(request_id = %request_id, path = %args.path, index = args.index, "session data list item deleted");
        Ok(next)
    }
}
