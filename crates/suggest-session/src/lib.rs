//! Suggestion-session controller: decides when to fetch, drops stale results,
//! keeps the highlighted row valid and turns keys into selections.
//!
//! `SuggestionSession` owns the current query and suggestion list and processes
//! one event at a time (edit, timer tick, fetch completion, key, pointer),
//! returning a `SessionResponse` that the host translates into rendering,
//! fetch calls and consumer notifications. It never blocks, spawns or reads a
//! clock: time is passed in by the caller.

mod commit;
mod editing;
mod fetch;
mod key_handlers;
mod response;
mod types;

#[cfg(test)]
mod tests;

use std::time::Instant;

use suggest_core::settings::Settings;
use suggest_core::{Debouncer, RequestGuard, Suggestion};

pub use types::{
    Announcement, CaretMove, CommittedSelection, DropdownAction, FetchRequest, KeyEvent,
    SavedInfoRequest, SessionPhase, SessionResponse, SessionState, SideEffects,
};

struct SessionConfig {
    min_query_length: usize,
    lock_after_commit: bool,
}

/// Stateful suggestion session for one input field.
pub struct SuggestionSession {
    state: SessionState,
    /// Last committed or seeded item; `Some` means the `Committed` phase.
    selection: Option<Suggestion>,
    /// Edits are ignored while locked (seeded item, or commit with
    /// `lock_after_commit`). Only `reset_selection` unlocks.
    locked: bool,

    fetch_guard: RequestGuard,
    saved_info_guard: RequestGuard,
    debouncer: Debouncer<String>,

    config: SessionConfig,
    torn_down: bool,
}

impl SuggestionSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: SessionState::new(),
            selection: None,
            locked: false,
            fetch_guard: RequestGuard::new(),
            saved_info_guard: RequestGuard::new(),
            debouncer: Debouncer::new(settings.fetch.debounce()),
            config: SessionConfig {
                min_query_length: settings.fetch.min_query_length,
                lock_after_commit: settings.selection.lock_after_commit,
            },
            torn_down: false,
        }
    }

    /// Start a session seeded with a previously committed item.
    ///
    /// The session stays `Loading` and locked until the returned
    /// `SavedInfoRequest` is answered through `receive_saved_info`.
    pub fn with_selected(settings: &Settings, value: impl Into<String>) -> (Self, SessionResponse) {
        let mut session = Self::new(settings);
        session.locked = true;
        session.state.loading = true;
        let mut resp = SessionResponse::consumed();
        resp.saved_info = Some(SavedInfoRequest {
            value: value.into(),
            id: session.saved_info_guard.issue(),
        });
        (session, resp)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.saved_info_guard.is_pending() {
            SessionPhase::Loading
        } else if self.selection.is_some() {
            SessionPhase::Committed
        } else if !self.meets_threshold(&self.state.query) {
            SessionPhase::Empty
        } else if self.state.loading {
            SessionPhase::Loading
        } else if !self.state.show_suggestions {
            SessionPhase::Closed
        } else if self.state.suggestions.is_empty() {
            SessionPhase::NoResults
        } else {
            SessionPhase::Showing
        }
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.state.suggestions
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_index
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.state
            .selected_index
            .and_then(|i| self.state.suggestions.get(i))
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn shows_suggestions(&self) -> bool {
        self.state.show_suggestions
    }

    /// The committed (or seeded) item, if any.
    pub fn selection(&self) -> Option<&Suggestion> {
        self.selection.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// When the host should call `tick` next, if a debounced fetch is waiting.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// End the session: cancel the debounce timer and retire every pending
    /// request so no late completion can mutate state.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.fetch_guard.clear();
        self.saved_info_guard.clear();
        self.torn_down = true;
    }

    fn meets_threshold(&self, query: &str) -> bool {
        !query.is_empty() && query.chars().count() >= self.config.min_query_length
    }
}
