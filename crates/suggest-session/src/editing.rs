use std::time::Instant;

use tracing::{debug, debug_span};

use super::response::build_dropdown_response;
use super::types::{DropdownAction, FetchRequest, SessionResponse};
use super::SuggestionSession;

impl SuggestionSession {
    /// The field text changed. Schedules a debounced fetch, or closes the
    /// dropdown when the query is below the fetch threshold.
    pub fn edit(&mut self, text: &str, now: Instant) -> SessionResponse {
        let _span = debug_span!("edit", text).entered();
        if self.torn_down || self.locked {
            return SessionResponse::not_consumed();
        }

        // Typing over an unlocked commit starts a fresh search.
        self.selection = None;
        self.state.query = text.to_string();

        if !self.meets_threshold(text) {
            self.debouncer.cancel();
            self.fetch_guard.clear();
            self.state.loading = false;
            self.state.set_suggestions(Vec::new());
            self.state.close();
            let mut resp = SessionResponse::consumed();
            resp.dropdown = DropdownAction::Hide;
            return resp;
        }

        // Previous suggestions stay visible while the new ones load.
        self.debouncer.schedule(text.to_string(), now);
        self.state.loading = true;
        self.state.show_suggestions = true;
        build_dropdown_response(&self.state)
    }

    /// Timer callback. Issues the debounced fetch once the quiet period is over.
    pub fn tick(&mut self, now: Instant) -> SessionResponse {
        if self.torn_down {
            return SessionResponse::not_consumed();
        }
        match self.debouncer.fire(now) {
            Some(query) => {
                let mut resp = SessionResponse::consumed();
                resp.fetch = Some(self.issue_fetch(query));
                resp
            }
            None => SessionResponse::not_consumed(),
        }
    }

    /// Issue a fetch right away, bypassing the debounce window.
    pub(super) fn issue_fetch(&mut self, query: String) -> FetchRequest {
        self.debouncer.cancel();
        let id = self.fetch_guard.issue();
        self.state.loading = true;
        debug!(query = query.as_str(), id = id.as_raw(), "fetch issued");
        FetchRequest { query, id }
    }

    /// Retire the debounce timer and any in-flight fetch.
    pub(super) fn cancel_pending_fetch(&mut self) {
        self.debouncer.cancel();
        self.fetch_guard.clear();
        self.state.loading = false;
    }
}
