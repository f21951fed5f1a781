//! Hook error types.
//!
//! These never escape a pipeline run. The session hook logs them and
//! returns the batch it was given.

use thiserror::Error;

/// Failures inside a transform.
#[derive(Debug, Error)]
pub enum HookError {
    /// The batch has no message to inject into.
    #[error("message batch is empty")]
    EmptyBatch,

    /// The document could not be rendered.
    #[error("failed to render session data: {0}")]
    Render(#[from] serde_json::Error),
}

impl HookError {
    /// Short classification string for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "empty_batch",
            Self::Render(_) => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_display() {
        assert_eq!(HookError::EmptyBatch.kind(), "empty_batch");
        assert_eq!(HookError::EmptyBatch.to_string(), "message batch is empty");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HookError::from(json_err);
        assert_eq!(err.kind(), "render");
        assert!(err.to_string().starts_with("failed to render session data"));
    }
}
