//! Error taxonomy for session document operations.
//!
//! Every variant is an expected condition that callers branch on via
//! [`SessionError::kind`]; none of them indicate a bug.

use thiserror::Error;

use crate::path::KeyPath;

/// Errors surfaced by document operations and context access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A path-addressed operation was given no keys.
    #[error("path cannot be empty")]
    EmptyPath,

    /// A navigation prefix segment is missing or does not hold a map.
    #[error("invalid path: {path}")]
    InvalidPath {
        /// The full path that failed to resolve.
        path: KeyPath,
    },

    /// The target key of a delete is absent from its parent map.
    #[error("key not found: {key} (path {path})")]
    KeyNotFound {
        /// The missing target key.
        key: String,
        /// The full path being resolved.
        path: KeyPath,
    },

    /// The target exists but holds something other than a list.
    #[error("target is not a list: {path}")]
    NotAList {
        /// The full path of the target.
        path: KeyPath,
    },

    /// A list index fell outside `0..len`.
    #[error("list index out of range: {index} (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// The request context has no document carrier.
    #[error("no session context available")]
    ContextUnavailable,

    /// The carrier exists but holds no document.
    #[error("no session data exists")]
    NoDocument,

    /// A JSON value that is not an object was offered as a document.
    #[error("expected a JSON object for a session document, found {found}")]
    NotADocument {
        /// JSON type name of the offending value.
        found: &'static str,
    },
}

impl SessionError {
    /// Short classification string for logging and the command surface.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyPath => "empty_path",
            Self::InvalidPath { .. } => "invalid_path",
            Self::KeyNotFound { .. } => "key_not_found",
            Self::NotAList { .. } => "not_a_list",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::ContextUnavailable => "context_unavailable",
            Self::NoDocument => "no_document",
            Self::NotADocument { .. } => "not_a_document",
        }
    }
}

/// Result type for session document operations.
pub type Result<T> = std::result::Result<T, SessionError>;
