//! Settings types.
//!
//! JSON field names are camelCase. Every struct is `#[serde(default)]`, so
//! a settings file only needs the fields it changes.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SatchelSettings {
    /// Diagnostics output.
    pub logging: LoggingSettings,
    /// Session hook behavior.
    pub hook: HookSettings,
}

/// Diagnostics output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    /// `RUST_LOG` still wins when set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Session hook behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HookSettings {
    /// Register the hook at all.
    pub enabled: bool,
    /// Position within the stage; higher runs first.
    pub priority: i32,
    /// Which message receives the rendered block.
    pub target: InjectTarget,
    /// What to do when the context carrier holds no document.
    pub missing_document: MissingDocumentPolicy,
    /// Heading line of the rendered block.
    pub heading: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 8,
            target: InjectTarget::default(),
            missing_document: MissingDocumentPolicy::default(),
            heading: "## Session Data".to_string(),
        }
    }
}

/// Message that receives the rendered session block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectTarget {
    /// The first message of the batch.
    #[default]
    First,
    /// The most recent message of the batch.
    Last,
}

/// Hook behavior when the carrier exists but holds no document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDocumentPolicy {
    /// Attach a document holding the server time, then inject it.
    #[default]
    Seed,
    /// Pass the batch through untouched.
    Skip,
}
