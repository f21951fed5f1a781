//! # satchel-hooks
//!
//! Outbound message pipeline and the session data hook.
//!
//! - [`MessageTransform`]: one synchronous rewrite of a [`MessageBatch`]
//! - [`TransformRegistry`]: transforms per stage, highest priority first
//! - [`PipelineEngine`]: runs a stage, containing panics (fail-open)
//! - [`SessionHook`]: prepends the request's session document to an
//!   outbound message at the `filter_messages` stage
//!
//! [`MessageBatch`]: satchel_core::MessageBatch

#![deny(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod registry;
pub mod session;
pub mod transform;
pub mod types;

use std::sync::Arc;

use satchel_settings::HookSettings;
use tracing::info;

pub use engine::PipelineEngine;
pub use errors::HookError;
pub use registry::TransformRegistry;
pub use session::{Clock, SESSION_HOOK_NAME, SessionHook, SystemClock, render_block};
pub use transform::MessageTransform;
pub use types::{StageName, TransformInfo};

/// Build an engine with the session hook registered when enabled.
pub fn create_default_engine(settings: &HookSettings) -> PipelineEngine {
    let mut registry = TransformRegistry::new();
    if settings.enabled {
        registry.register(Arc::new(SessionHook::new(settings)));
    }
    info!(
        transforms = registry.count(),
        session_hook = settings.enabled,
        "pipeline engine ready"
    );
    PipelineEngine::new(registry)
}
