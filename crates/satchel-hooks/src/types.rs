//! Stage names and transform metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageName(String);

impl StageName {
    /// Stage that filters outbound messages before they leave the process.
    pub const FILTER_MESSAGES: &'static str = "filter_messages";

    /// Wrap a stage name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The outbound message filtering stage.
    pub fn filter_messages() -> Self {
        Self::new(Self::FILTER_MESSAGES)
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of a registered transform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformInfo {
    /// Transform name.
    pub name: String,
    /// Stage it runs at.
    pub stage: StageName,
    /// Priority within the stage.
    pub priority: i32,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
