//! Pipeline execution engine.
//!
//! Runs every transform registered at a stage in priority order, feeding
//! each one the previous transform's output.
//!
//! # Fail-Open
//!
//! A panicking transform never takes the pipeline down. The panic is
//! logged and the batch from before that transform continues down the
//! stage.

use std::panic::{AssertUnwindSafe, catch_unwind};

use satchel_core::{MessageBatch, RequestContext};
use tracing::{debug, debug_span, warn};

use crate::registry::TransformRegistry;
use crate::types::StageName;

/// Executes registered transforms.
#[derive(Debug, Default)]
pub struct PipelineEngine {
    registry: TransformRegistry,
}

impl PipelineEngine {
    /// Create an engine over `registry`.
    #[must_use]
    pub fn new(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Mutable access for late registration.
    pub fn registry_mut(&mut self) -> &mut TransformRegistry {
        &mut self.registry
    }

    /// Run `stage` over `batch`.
    pub fn run(
        &self,
        stage: &StageName,
        mut batch: MessageBatch,
        mut ctx: Option<&mut RequestContext>,
    ) -> MessageBatch {
        let transforms = self.registry.transforms_for(stage);
        if transforms.is_empty() {
            return batch;
        }

        let span = debug_span!("pipeline_stage", stage = %stage, transforms = transforms.len());
        let _entered = span.enter();

        for transform in &transforms {
            let before = batch.clone();
            let scoped = ctx.as_deref_mut();
            match catch_unwind(AssertUnwindSafe(|| transform.apply(batch, scoped))) {
                Ok(next) => batch = next,
                Err(payload) => {
                    warn!(
                        name = transform.name(),
                        panic = panic_message(payload.as_ref()),
                        "transform panicked, keeping previous batch"
                    );
                    batch = before;
                }
            }
        }

        debug!(count = transforms.len(), "stage complete");
        batch
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return s;
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s;
    }
    "non-string panic payload"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use satchel_core::logging::capture_logs;
    use satchel_core::{Message, MessageContent};
    use tracing::Level;

    use crate::transform::MessageTransform;

    /// Appends its tag to the first message's text.
    struct Tag {
        name: &'static str,
        priority: i32,
    }

    impl MessageTransform for Tag {
        fn name(&self) -> &str {
            self.name
        }
        fn stage(&self) -> StageName {
            StageName::filter_messages()
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn apply(&self, mut batch: MessageBatch, _ctx: Option<&mut RequestContext>) -> MessageBatch {
            if let Some(MessageContent::Text(text)) = batch.messages.first_mut().map(|m| &mut m.content) {
                text.push_str(self.name);
            }
            batch
        }
    }

    struct Panics;

    impl MessageTransform for Panics {
        fn name(&self) -> &str {
            "panics"
        }
        fn stage(&self) -> StageName {
            StageName::filter_messages()
        }
        fn priority(&self) -> i32 {
            5
        }
        fn apply(&self, mut batch: MessageBatch, _ctx: Option<&mut RequestContext>) -> MessageBatch {
            batch.messages.clear();
            panic!("boom");
        }
    }

    fn text_of(batch: &MessageBatch) -> &str {
        match &batch.messages[0].content {
            MessageContent::Text(t) => t,
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn empty_stage_passes_through() {
        let engine = PipelineEngine::default();
        let batch = MessageBatch::new(vec![Message::user("hi")]);
        let out = engine.run(&StageName::filter_messages(), batch.clone(), None);
        assert_eq!(out, batch);
    }

    #[test]
    fn runs_in_priority_order() {
        let mut registry = TransformRegistry::new();
        registry.register(Arc::new(Tag { name: "b", priority: 1 }));
        registry.register(Arc::new(Tag { name: "a", priority: 10 }));
        let engine = PipelineEngine::new(registry);

        let out = engine.run(&StageName::filter_messages(), MessageBatch::new(vec![Message::user(">")]), None);
        assert_eq!(text_of(&out), ">ab");
    }

    #[test]
    fn other_stages_are_not_run() {
        let mut registry = TransformRegistry::new();
        registry.register(Arc::new(Tag { name: "a", priority: 0 }));
        let engine = PipelineEngine::new(registry);

        let out = engine.run(&StageName::new("inbound"), MessageBatch::new(vec![Message::user(">")]), None);
        assert_eq!(text_of(&out), ">");
    }

    #[test]
    fn panic_is_contained_and_logged() {
        let (logs, _guard) = capture_logs();
        let mut registry = TransformRegistry::new();
        registry.register(Arc::new(Tag { name: "a", priority: 10 }));
        registry.register(Arc::new(Panics));
        registry.register(Arc::new(Tag { name: "c", priority: 1 }));
        let engine = PipelineEngine::new(registry);

        let mut ctx = RequestContext::new();
        let out = engine.run(
            &StageName::filter_messages(),
            MessageBatch::new(vec![Message::user(">")]),
            Some(&mut ctx),
        );

        assert_eq!(text_of(&out), ">ac");
        let warnings = logs.find(Level::WARN, "transform panicked");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field("name"), Some("panics"));
        assert_eq!(warnings[0].field("panic"), Some("boom"));
        assert!(logs.has_span("pipeline_stage"));
    }
}
