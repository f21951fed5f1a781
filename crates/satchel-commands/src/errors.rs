//! Command error types.

use satchel_core::SessionError;
use thiserror::Error;

/// Failures reported to whoever issued a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Arguments were missing or of the wrong shape.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// No command is registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The document operation or context access failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CommandError {
    /// Short classification string. Session failures report their own kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Session(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_keep_their_kind() {
        let err = CommandError::from(SessionError::ContextUnavailable);
        assert_eq!(err.kind(), "context_unavailable");
        assert_eq!(err.to_string(), "no session context available");
    }

    #[test]
    fn own_kinds() {
        assert_eq!(CommandError::InvalidArguments("x".into()).kind(), "invalid_arguments");
        assert_eq!(
            CommandError::UnknownCommand("nope".into()).to_string(),
            "unknown command: nope"
        );
    }
}
