//! Suggestion engine: host integration for the suggestion-session controller.
//!
//! - `controller::SuggestController` drives a `SuggestionSession`, optionally
//!   running fetches on a background worker, and flattens every response into
//!   an ordered list of `ControllerEvent`s for the presentation layer.
//! - `api` exports the same surface over UniFFI for foreign UI hosts.

pub mod api;
mod async_worker;
pub mod controller;
pub mod source;
pub mod trace_init;

pub use controller::{CaretTarget, ControllerEvent, ControllerOutput, SuggestController};
pub use source::{CatalogSource, SuggestionSource};

pub use suggest_core::settings::{self, Settings};
pub use suggest_core::{FetchError, Politeness, RequestId, Suggestion};
pub use suggest_session::{CaretMove, KeyEvent, SessionPhase, SessionState, SuggestionSession};

uniffi::setup_scaffolding!();
