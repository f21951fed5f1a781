//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SatchelSettings::default()`]
//! 2. If the settings file exists, merge it over the defaults with the same
//!    deep merge the session documents use
//! 3. Apply `SATCHEL_*` environment overrides (highest priority)
//!
//! Environment values that fail to parse are logged and ignored.

use std::path::{Path, PathBuf};

use satchel_core::{Document, merge};
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{InjectTarget, MissingDocumentPolicy, SatchelSettings};

/// Log level override.
pub const ENV_LOG_LEVEL: &str = "SATCHEL_LOG_LEVEL";
/// Hook on/off override.
pub const ENV_HOOK_ENABLED: &str = "SATCHEL_HOOK_ENABLED";
/// Hook priority override.
pub const ENV_HOOK_PRIORITY: &str = "SATCHEL_HOOK_PRIORITY";
/// Inject target override (`first` / `last`).
pub const ENV_HOOK_TARGET: &str = "SATCHEL_HOOK_TARGET";
/// Missing-document policy override (`seed` / `skip`).
pub const ENV_MISSING_DOCUMENT: &str = "SATCHEL_MISSING_DOCUMENT";

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const PRIORITY_RANGE: (i32, i32) = (-10_000, 10_000);

/// Default settings file: `~/.satchel/settings.json`.
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".satchel").join("settings.json")
}

/// Load from the default path, then apply process environment overrides.
pub fn load_settings() -> Result<SatchelSettings> {
    load_settings_from_path(&settings_path())
}

/// Load from `path`, then apply process environment overrides.
///
/// A missing file yields the defaults. Unreadable or malformed files are
/// errors.
pub fn load_settings_from_path(path: &Path) -> Result<SatchelSettings> {
    let mut settings = read_layered(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn read_layered(path: &Path) -> Result<SatchelSettings> {
    let defaults: Document = serde_json::from_value(serde_json::to_value(SatchelSettings::default())?)?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Document = serde_json::from_str(&content)?;
        merge(&defaults, &user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let settings: SatchelSettings = serde_json::from_value(merged.to_json())?;
    let level = settings.logging.level.to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return Err(SettingsError::InvalidValue(format!(
            "logging.level must be one of {}, got {:?}",
            LEVELS.join(", "),
            settings.logging.level
        )));
    }
    Ok(settings)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(settings: &mut SatchelSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
pub fn apply_overrides_from<F>(settings: &mut SatchelSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read(ENV_LOG_LEVEL) {
        match parse_level(&v) {
            Some(level) => settings.logging.level = level,
            None => invalid(ENV_LOG_LEVEL, &v),
        }
    }
    if let Some(v) = read(ENV_HOOK_ENABLED) {
        match parse_bool(&v) {
            Some(enabled) => settings.hook.enabled = enabled,
            None => invalid(ENV_HOOK_ENABLED, &v),
        }
    }
    if let Some(v) = read(ENV_HOOK_PRIORITY) {
        match parse_i32_range(&v, PRIORITY_RANGE.0, PRIORITY_RANGE.1) {
            Some(priority) => settings.hook.priority = priority,
            None => invalid(ENV_HOOK_PRIORITY, &v),
        }
    }
    if let Some(v) = read(ENV_HOOK_TARGET) {
        match parse_keyword::<InjectTarget>(&v) {
            Some(target) => settings.hook.target = target,
            None => invalid(ENV_HOOK_TARGET, &v),
        }
    }
    if let Some(v) = read(ENV_MISSING_DOCUMENT) {
        match parse_keyword::<MissingDocumentPolicy>(&v) {
            Some(policy) => settings.hook.missing_document = policy,
            None => invalid(ENV_MISSING_DOCUMENT, &v),
        }
    }
}

fn invalid(key: &str, value: &str) {
    warn!(key, value, "invalid env override, ignoring");
}

// ── Pure parsers ────────────────────────────────────────────────────────────

/// Parse a boolean: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`,
/// case-insensitive.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an `i32` within `min..=max`.
pub fn parse_i32_range(val: &str, min: i32, max: i32) -> Option<i32> {
    let n: i32 = val.trim().parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

/// Normalize a log level name.
pub fn parse_level(val: &str) -> Option<String> {
    let level = val.trim().to_lowercase();
    LEVELS.contains(&level.as_str()).then_some(level)
}

fn parse_keyword<T: serde::de::DeserializeOwned>(val: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(val.trim().to_lowercase())).ok()
}
