//! # satchel-settings
//!
//! Configuration for the session hook and the CLI, loaded in three layers
//! (lowest to highest priority):
//! 1. **Compiled defaults**: [`SatchelSettings::default()`]
//! 2. **User file**: `~/.satchel/settings.json`, deep-merged over defaults
//! 3. **Environment variables**: `SATCHEL_*` overrides
//!
//! Partial files are fine; every struct fills missing fields from its
//! defaults.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides_from, load_settings, load_settings_from_path,
    settings_path,
};
pub use types::{HookSettings, InjectTarget, LoggingSettings, MissingDocumentPolicy, SatchelSettings};
