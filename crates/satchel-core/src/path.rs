//! Key paths and the navigator that resolves them.
//!
//! A [`KeyPath`] is split into a navigation prefix and a target key. The
//! navigator walks the prefix through nested maps and hands back the
//! innermost map so the caller can read or write the target slot.
//!
//! Every map the walk passes through is un-shared with `Arc::make_mut`, so
//! writes land in a private copy while sibling subtrees stay shared.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{Fields, Value};
use crate::errors::{Result, SessionError};

/// Ordered sequence of map keys locating a value inside a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create a path from owned segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into `(navigation prefix, target key)`. `None` for an empty path.
    pub fn split_target(&self) -> Option<(&[String], &str)> {
        let (target, prefix) = self.0.split_last()?;
        Some((prefix, target))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// How the navigator treats prefix segments that are absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Absent or non-map prefix segments fail with `InvalidPath`.
    Strict,
    /// Absent prefix segments become empty maps; non-map ones still fail.
    Create,
}

/// Walk the prefix of `path` from `root`.
///
/// Returns the innermost map and the target key. Fails with `EmptyPath`
/// for an empty path and `InvalidPath` when a prefix segment cannot be
/// traversed under `mode`.
pub fn navigate<'d, 'p>(
    root: &'d mut Fields,
    path: &'p KeyPath,
    mode: Navigation,
) -> Result<(&'d mut Fields, &'p str)> {
    let (prefix, target) = path.split_target().ok_or(SessionError::EmptyPath)?;

    let mut current = root;
    for key in prefix {
        let slot = match mode {
            Navigation::Strict => current.get_mut(key),
            Navigation::Create => Some(
                current
                    .entry(key.clone())
                    .or_insert_with(|| Value::Map(Arc::default())),
            ),
        };
        current = match slot {
            Some(Value::Map(fields)) => Arc::make_mut(fields),
            _ => return Err(SessionError::InvalidPath { path: path.clone() }),
        };
    }

    Ok((current, target))
}
