//! Message transform trait.
//!
//! A [`MessageTransform`] is registered with the
//! [`TransformRegistry`](crate::registry::TransformRegistry) under a stage
//! and run by the [`PipelineEngine`](crate::engine::PipelineEngine).

use satchel_core::{MessageBatch, RequestContext};

use crate::types::StageName;

/// A synchronous rewrite of an outbound message batch.
///
/// # Priority
///
/// Higher priority transforms run first. Default priority is 0.
///
/// # Failure
///
/// `apply` has no error channel. A transform that can fail should handle it
/// and return a usable batch. The engine still guards against panics.
pub trait MessageTransform: Send + Sync {
    /// Unique name for this transform.
    fn name(&self) -> &str;

    /// Stage this transform runs at.
    fn stage(&self) -> StageName;

    /// Execution priority. Higher runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Optional human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Rewrite `batch`. `ctx` is `None` when the host has no request context.
    fn apply(&self, batch: MessageBatch, ctx: Option<&mut RequestContext>) -> MessageBatch;
}
