//! Session data injection.
//!
//! [`SessionHook`] renders the request's session document into a labeled
//! text block and splices it into an outbound message, so the model sees
//! the current session state on every turn.
//!
//! Per invocation:
//! 1. No context or no carrier: the batch passes through.
//! 2. Carrier without a document: under [`MissingDocumentPolicy::Seed`] a
//!    document holding `server_time` is created; under `Skip` the batch
//!    passes through.
//! 3. Document available: the rendered block is prepended to the target
//!    message's content.
//!
//! Any failure in steps 2 and 3 is logged and the batch is returned as it
//! came in. A seeded document is attached to the context only when
//! injection succeeded.

use std::fmt;
use std::sync::Arc;

use satchel_core::{Document, Fields, MessageBatch, RequestContext, Value};
use satchel_settings::{HookSettings, InjectTarget, MissingDocumentPolicy};
use tracing::{debug, warn};

use crate::errors::HookError;
use crate::transform::MessageTransform;
use crate::types::StageName;

/// Registered name of the session hook.
pub const SESSION_HOOK_NAME: &str = "session_data";

/// Field written into a seeded document.
pub const SERVER_TIME_FIELD: &str = "server_time";

/// Source of the timestamp stored in a seeded document.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time, formatted for display.
    fn now(&self) -> String;
}

/// Local wall-clock time in RFC 3339, which carries the UTC offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        chrono::Local::now().to_rfc3339()
    }
}

/// Render `doc` as the injected text block.
pub fn render_block(heading: &str, doc: &Document) -> Result<String, HookError> {
    let body = serde_json::to_string(doc)?;
    Ok(format!("\n\n{heading}\n\n{body}\n\n___\n\n"))
}

/// Injects the session document into outbound messages.
#[derive(Debug)]
pub struct SessionHook {
    priority: i32,
    target: InjectTarget,
    missing_document: MissingDocumentPolicy,
    heading: String,
    clock: Arc<dyn Clock>,
}

impl SessionHook {
    /// Build from settings, using the system clock.
    pub fn new(settings: &HookSettings) -> Self {
        Self {
            priority: settings.priority,
            target: settings.target,
            missing_document: settings.missing_document,
            heading: settings.heading.clone(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for seeded documents.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn seed(&self) -> Document {
        let mut fields = Fields::new();
        let _ = fields.insert(SERVER_TIME_FIELD.to_string(), Value::from(self.clock.now()));
        Document::from_fields(fields)
    }

    /// Splice the rendered document into `batch`.
    ///
    /// Every fallible step runs before `batch` is touched, so an error
    /// leaves it unmodified.
    fn inject(&self, batch: &mut MessageBatch, doc: &Document) -> Result<(), HookError> {
        let index = match self.target {
            InjectTarget::First if !batch.messages.is_empty() => 0,
            InjectTarget::Last if !batch.messages.is_empty() => batch.messages.len() - 1,
            _ => return Err(HookError::EmptyBatch),
        };
        let block = render_block(&self.heading, doc)?;

        let message = &mut batch.messages[index];
        if !message.content.prepend_text(&block) {
            debug!(index, role = %message.role, "unsupported content shape, leaving message as-is");
        }
        Ok(())
    }
}

impl MessageTransform for SessionHook {
    fn name(&self) -> &str {
        SESSION_HOOK_NAME
    }

    fn stage(&self) -> StageName {
        StageName::filter_messages()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn description(&self) -> Option<&str> {
        Some("Prepends the session data document to an outbound message")
    }

    fn apply(&self, mut batch: MessageBatch, ctx: Option<&mut RequestContext>) -> MessageBatch {
        let Some(ctx) = ctx else {
            debug!("no request context, passing through");
            return batch;
        };
        let request_id = ctx.id.clone();
        let Some(carrier) = ctx.carrier_mut() else {
            debug!(request_id = %request_id, "no document carrier, passing through");
            return batch;
        };

        let (doc, seeded) = match carrier.session() {
            Some(doc) => (doc.clone(), false),
            None => match self.missing_document {
                MissingDocumentPolicy::Skip => {
                    debug!(request_id = %request_id, "no session document, skipping");
                    return batch;
                }
                MissingDocumentPolicy::Seed => (self.seed(), true),
            },
        };

        match self.inject(&mut batch, &doc) {
            Ok(()) => {
                if seeded {
                    debug!(request_id = %request_id, "seeded session document");
                    let _ = carrier.replace_session(doc);
                }
                batch
            }
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    kind = err.kind(),
                    error = %err,
                    "session data injection failed, passing batch through"
                );
                batch
            }
        }
    }
}
