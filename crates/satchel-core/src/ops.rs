//! Path-addressed document operations.
//!
//! Each operation takes the current document by reference and returns a new
//! one. Work happens on a copy-on-write clone, so the input is untouched
//! whether the operation succeeds or fails.

use std::sync::Arc;

use tracing::trace;

use crate::document::{Document, Value};
use crate::errors::{Result, SessionError};
use crate::merge::merge;
use crate::path::{KeyPath, Navigation, navigate};

/// Deep-merge `patch` into `doc`. An absent document counts as empty.
pub fn update(doc: Option<&Document>, patch: &Document) -> Document {
    match doc {
        Some(base) => merge(base, patch),
        None => merge(&Document::new(), patch),
    }
}

/// Remove the value at `path`.
pub fn delete(doc: &Document, path: &KeyPath) -> Result<Document> {
    let mut out = doc.clone();
    let (parent, target) = navigate(out.fields_mut(), path, Navigation::Strict)?;
    if parent.remove(target).is_none() {
        return Err(SessionError::KeyNotFound {
            key: target.to_owned(),
            path: path.clone(),
        });
    }
    trace!(%path, "deleted key");
    Ok(out)
}

/// Append `value` to the list at `path`, creating missing maps and the
/// list itself along the way.
pub fn list_append(doc: &Document, path: &KeyPath, value: Value) -> Result<Document> {
    let mut out = doc.clone();
    let (parent, target) = navigate(out.fields_mut(), path, Navigation::Create)?;
    let slot = parent
        .entry(target.to_owned())
        .or_insert_with(|| Value::List(Arc::default()));
    match slot {
        Value::List(items) => Arc::make_mut(items).push(value),
        _ => return Err(SessionError::NotAList { path: path.clone() }),
    }
    trace!(%path, "appended to list");
    Ok(out)
}

/// Remove the element at `index` from the list at `path`.
pub fn list_delete(doc: &Document, path: &KeyPath, index: i64) -> Result<Document> {
    let mut out = doc.clone();
    let (parent, target) = navigate(out.fields_mut(), path, Navigation::Strict)?;
    let items = match parent.get_mut(target) {
        None => {
            return Err(SessionError::KeyNotFound {
                key: target.to_owned(),
                path: path.clone(),
            });
        }
        Some(Value::List(items)) => items,
        Some(_) => return Err(SessionError::NotAList { path: path.clone() }),
    };

    let len = items.len();
    let idx = usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(SessionError::IndexOutOfRange { index, len })?;
    let _ = Arc::make_mut(items).remove(idx);
    trace!(%path, index, "removed list element");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        Document::try_from(v).unwrap()
    }

    // ── update ───────────────────────────────────────────────────────────

    #[test]
    fn update_merges_nested() {
        let result = update(Some(&doc(json!({"a": 1, "b": {"c": 2}}))), &doc(json!({"b": {"d": 3}})));
        assert_eq!(result.to_json(), json!({"a": 1, "b": {"c": 2, "d": 3}}));
    }

    #[test]
    fn update_absent_base_is_empty_map() {
        let result = update(None, &doc(json!({"a": 1})));
        assert_eq!(result.to_json(), json!({"a": 1}));
    }

    #[test]
    fn update_replaces_lists() {
        let result = update(Some(&doc(json!({"items": [1, 2, 3]}))), &doc(json!({"items": [4, 5]})));
        assert_eq!(result.to_json(), json!({"items": [4, 5]}));
    }

    // ── delete ───────────────────────────────────────────────────────────

    #[test]
    fn delete_nested_key() {
        let input = doc(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let result = delete(&input, &KeyPath::from(["b", "c"])).unwrap();
        assert_eq!(result.to_json(), json!({"a": 1, "b": {"d": 3}}));
        assert_eq!(input.to_json(), json!({"a": 1, "b": {"c": 2, "d": 3}}));
    }

    #[test]
    fn delete_top_level_key() {
        let result = delete(&doc(json!({"a": 1, "b": 2})), &KeyPath::from(["a"])).unwrap();
        assert_eq!(result.to_json(), json!({"b": 2}));
    }

    #[test]
    fn delete_missing_prefix_is_invalid_path() {
        assert_matches!(
            delete(&doc(json!({"a": 1})), &KeyPath::from(["b", "c"])),
            Err(SessionError::InvalidPath { .. })
        );
    }

    #[test]
    fn delete_through_scalar_is_invalid_path() {
        assert_matches!(
            delete(&doc(json!({"a": 1})), &KeyPath::from(["a", "b"])),
            Err(SessionError::InvalidPath { .. })
        );
    }

    #[test]
    fn delete_missing_target_is_key_not_found() {
        assert_matches!(
            delete(&doc(json!({"b": {}})), &KeyPath::from(["b", "c"])),
            Err(SessionError::KeyNotFound { key, .. }) if key == "c"
        );
    }

    #[test]
    fn delete_empty_path() {
        assert_matches!(
            delete(&doc(json!({"a": 1})), &KeyPath::default()),
            Err(SessionError::EmptyPath)
        );
        assert_matches!(
            delete(&Document::new(), &KeyPath::default()),
            Err(SessionError::EmptyPath)
        );
    }

    // ── list_append ──────────────────────────────────────────────────────

    #[test]
    fn list_append_creates_list() {
        let path = KeyPath::from(["items"]);
        let first = list_append(&Document::new(), &path, Value::from(1)).unwrap();
        assert_eq!(first.to_json(), json!({"items": [1]}));

        let second = list_append(&first, &path, Value::from(2)).unwrap();
        assert_eq!(second.to_json(), json!({"items": [1, 2]}));
        assert_eq!(first.to_json(), json!({"items": [1]}));
    }

    #[test]
    fn list_append_existing() {
        let result = list_append(&doc(json!({"items": [1, 2]})), &KeyPath::from(["items"]), Value::from(3)).unwrap();
        assert_eq!(result.to_json(), json!({"items": [1, 2, 3]}));
    }

    #[test]
    fn list_append_nested_creates_prefix_maps() {
        let result = list_append(&doc(json!({"user": {}})), &KeyPath::from(["user", "items"]), Value::from(1)).unwrap();
        assert_eq!(result.to_json(), json!({"user": {"items": [1]}}));

        let result = list_append(&Document::new(), &KeyPath::from(["a", "b", "log"]), Value::from("x")).unwrap();
        assert_eq!(result.to_json(), json!({"a": {"b": {"log": ["x"]}}}));
    }

    #[test]
    fn list_append_to_scalar_is_not_a_list() {
        assert_matches!(
            list_append(&doc(json!({"items": 1})), &KeyPath::from(["items"]), Value::from(2)),
            Err(SessionError::NotAList { .. })
        );
    }

    #[test]
    fn list_append_through_scalar_is_invalid_path() {
        assert_matches!(
            list_append(&doc(json!({"user": "alice"})), &KeyPath::from(["user", "items"]), Value::from(1)),
            Err(SessionError::InvalidPath { .. })
        );
    }

    #[test]
    fn list_append_empty_path() {
        assert_matches!(
            list_append(&Document::new(), &KeyPath::default(), Value::from(1)),
            Err(SessionError::EmptyPath)
        );
    }

    #[test]
    fn list_append_value_can_be_structured() {
        let entry = Value::from(json!({"q": "hello", "tags": ["a"]}));
        let result = list_append(&Document::new(), &KeyPath::from(["history"]), entry).unwrap();
        assert_eq!(result.to_json(), json!({"history": [{"q": "hello", "tags": ["a"]}]}));
    }

    // ── list_delete ──────────────────────────────────────────────────────

    #[test]
    fn list_delete_middle() {
        let input = doc(json!({"items": [1, 2, 3]}));
        let result = list_delete(&input, &KeyPath::from(["items"]), 1).unwrap();
        assert_eq!(result.to_json(), json!({"items": [1, 3]}));
        assert_eq!(input.to_json(), json!({"items": [1, 2, 3]}));
    }

    #[test]
    fn list_delete_index_past_end() {
        assert_matches!(
            list_delete(&doc(json!({"items": [1]})), &KeyPath::from(["items"]), 1),
            Err(SessionError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn list_delete_negative_index() {
        assert_matches!(
            list_delete(&doc(json!({"items": [1, 2]})), &KeyPath::from(["items"]), -1),
            Err(SessionError::IndexOutOfRange { index: -1, len: 2 })
        );
    }

    #[test]
    fn list_delete_missing_target_is_key_not_found() {
        assert_matches!(
            list_delete(&doc(json!({"a": 1})), &KeyPath::from(["items"]), 0),
            Err(SessionError::KeyNotFound { .. })
        );
    }

    #[test]
    fn list_delete_missing_prefix_is_invalid_path() {
        assert_matches!(
            list_delete(&doc(json!({"a": 1})), &KeyPath::from(["user", "items"]), 0),
            Err(SessionError::InvalidPath { .. })
        );
    }

    #[test]
    fn list_delete_scalar_target_is_not_a_list() {
        assert_matches!(
            list_delete(&doc(json!({"items": 1})), &KeyPath::from(["items"]), 0),
            Err(SessionError::NotAList { .. })
        );
    }

    #[test]
    fn list_delete_shares_unrelated_lists() {
        let input = doc(json!({"a": [1, 2], "b": [3]}));
        let result = list_delete(&input, &KeyPath::from(["a"]), 0).unwrap();
        assert_eq!(result.to_json(), json!({"a": [2], "b": [3]}));
        assert!(input.get("b").unwrap().shares_with(result.get("b").unwrap()));
    }
}
