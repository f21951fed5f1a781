//! Transform registry.
//!
//! Keeps a priority-sorted bucket of [`MessageTransform`]s per
//! [`StageName`]. Registering a name that already exists replaces the old
//! transform wherever it was registered.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::transform::MessageTransform;
use crate::types::{StageName, TransformInfo};

/// Registry of message transforms.
#[derive(Default)]
pub struct TransformRegistry {
    stages: HashMap<StageName, Vec<Arc<dyn MessageTransform>>>,
}

impl TransformRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform, replacing any with the same name.
    pub fn register(&mut self, transform: Arc<dyn MessageTransform>) {
        let name = transform.name().to_string();
        let _ = self.unregister(&name);

        let stage = transform.stage();
        debug!(name = %name, stage = %stage, priority = transform.priority(), "registering transform");
        let bucket = self.stages.entry(stage).or_default();
        bucket.push(transform);
        // Stable: equal priorities keep registration order.
        bucket.sort_by_key(|t| std::cmp::Reverse(t.priority()));
    }

    /// Remove a transform by name. Returns whether one was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let mut found = false;
        for bucket in self.stages.values_mut() {
            let before = bucket.len();
            bucket.retain(|t| t.name() != name);
            found |= bucket.len() < before;
        }
        self.stages.retain(|_, bucket| !bucket.is_empty());
        if found {
            debug!(name, "unregistered transform");
        }
        found
    }

    /// Transforms for `stage`, highest priority first.
    #[must_use]
    pub fn transforms_for(&self, stage: &StageName) -> Vec<Arc<dyn MessageTransform>> {
        self.stages.get(stage).cloned().unwrap_or_default()
    }

    /// Look up a transform by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn MessageTransform>> {
        self.stages
            .values()
            .flatten()
            .find(|t| t.name() == name)
            .map(Arc::clone)
    }

    /// Every registered transform, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<TransformInfo> {
        let mut infos: Vec<TransformInfo> = self
            .stages
            .values()
            .flatten()
            .map(|t| TransformInfo {
                name: t.name().to_string(),
                stage: t.stage(),
                priority: t.priority(),
                description: t.description().map(ToString::to_string),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Total number of registered transforms.
    #[must_use]
    pub fn count(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transform_count", &self.count())
            .finish()
    }
}
