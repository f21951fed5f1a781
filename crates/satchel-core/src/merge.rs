//! Deep merge of session documents.
//!
//! Merge rules:
//! - Maps on both sides are merged recursively (patch overrides base per key)
//! - Lists and scalars in the patch replace the base value entirely; lists
//!   are never concatenated
//! - `null` in the patch is a value like any other and replaces the base
//! - Keys only in the base are kept, keys only in the patch are added
//!
//! Neither input is modified. Subtrees taken from either side are shared
//! with the result, never aliased mutably.

use std::sync::Arc;

use crate::document::{Document, Fields, Value};

/// Merge `patch` over `base`, returning a new document.
pub fn merge(base: &Document, patch: &Document) -> Document {
    let mut merged = base.clone();
    if patch.is_empty() {
        return merged;
    }
    merge_fields(merged.fields_mut(), patch.fields());
    merged
}

fn merge_fields(target: &mut Fields, patch: &Fields) {
    for (key, incoming) in patch {
        if let (Some(Value::Map(existing)), Value::Map(overlay)) = (target.get_mut(key), incoming) {
            merge_fields(Arc::make_mut(existing), overlay);
            continue;
        }
        let _ = target.insert(key.clone(), incoming.clone());
    }
}
