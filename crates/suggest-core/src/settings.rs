//! Controller settings loaded from TOML, kept in a process-wide `OnceLock`.
//!
//! - `init_custom(toml_content)` installs a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Sessions take `&Settings` explicitly, so tests and multi-widget hosts can
//! build their own values with `parse_settings_toml` instead of the singleton.

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        // init_custom validates before storing; no custom TOML means built-in defaults.
        CUSTOM_TOML
            .get()
            .and_then(|s| parse_settings_toml(s).ok())
            .unwrap_or_default()
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub selection: SelectionSettings,
    pub presentation: PresentationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings {
                debounce_ms: 200,
                min_query_length: 1,
            },
            selection: SelectionSettings {
                lock_after_commit: true,
            },
            presentation: PresentationSettings {
                scroll_throttle_ms: 100,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    pub debounce_ms: u64,
    pub min_query_length: usize,
}

impl FetchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionSettings {
    pub lock_after_commit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationSettings {
    pub scroll_throttle_ms: u64,
}

impl PresentationSettings {
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_at_most_ms {
        ($section:ident . $field:ident, $max:expr) => {
            if s.$section.$field > $max {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: format!("must be at most {} ms", $max),
                });
            }
        };
    }

    // An empty query must never fetch.
    check_positive_usize!(fetch.min_query_length);

    check_at_most_ms!(fetch.debounce_ms, 10_000);
    check_at_most_ms!(presentation.scroll_throttle_ms, 10_000);

    Ok(())
}
