//! UniFFI export layer: bindings for foreign UI hosts (Swift, Kotlin).
//!
//! Hosts own the fetch collaborator here. `FetchSuggestions`/`FetchSavedInfo`
//! events ask for data; answers come back through `receive_*`/`fail_*`.

mod session;
mod types;

pub use session::SuggestSession;
pub use types::{SuggestError, SuggestEvent, SuggestItem, SuggestKeyEvent, SuggestResponse};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), SuggestError> {
    let content = std::fs::read_to_string(&path).map_err(|e| SuggestError::Io {
        msg: format!("{path}: {e}"),
    })?;
    crate::settings::init_custom(content)
        .map_err(|e| SuggestError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    crate::settings::default_toml().to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_engine_version() {
        assert_eq!(engine_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_default_config_parses() {
        let toml = settings_default_config();
        assert!(crate::settings::parse_settings_toml(&toml).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = settings_load_config("/nonexistent/suggest.toml".into()).unwrap_err();
        assert!(matches!(err, SuggestError::Io { .. }));
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[fetch]\ndebounce_ms = 200\nmin_query_length = 0\n\
             [selection]\nlock_after_commit = true\n\
             [presentation]\nscroll_throttle_ms = 100\n"
        )
        .unwrap();
        let err = settings_load_config(file.path().display().to_string()).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidData { .. }));
    }
}
