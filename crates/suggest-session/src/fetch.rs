use suggest_core::{results_message, FetchError, Politeness, RequestId, Suggestion};
use tracing::debug;

use super::response::{build_dropdown, build_dropdown_response};
use super::types::{Announcement, DropdownAction, SessionResponse};
use super::SuggestionSession;

impl SuggestionSession {
    /// Apply a suggestion fetch completion.
    /// Returns `None` if `id` is not the current pending request (stale).
    pub fn receive_suggestions(
        &mut self,
        id: RequestId,
        result: Result<Vec<Suggestion>, FetchError>,
    ) -> Option<SessionResponse> {
        if self.torn_down || !self.fetch_guard.accept(id) {
            debug!(id = id.as_raw(), "stale suggestions dropped");
            return None;
        }

        // A newer edit may already be waiting for its debounce window.
        self.state.loading = self.debouncer.is_pending();

        match result {
            Ok(suggestions) => {
                let count = suggestions.len();
                self.state.set_suggestions(suggestions);
                self.state.show_suggestions = self.meets_threshold(&self.state.query);
                let mut resp = build_dropdown_response(&self.state);
                resp.announce = Some(Announcement {
                    message: results_message(count),
                    politeness: Politeness::Assertive,
                });
                Some(resp)
            }
            Err(err) => {
                debug!(id = id.as_raw(), %err, "fetch failed, keeping current suggestions");
                let mut resp = SessionResponse::consumed();
                if self.state.show_suggestions {
                    resp.dropdown = build_dropdown(&self.state);
                }
                Some(resp)
            }
        }
    }

    /// Apply the label lookup for a seeded selection.
    /// Returns `None` if `id` is stale.
    pub fn receive_saved_info(
        &mut self,
        id: RequestId,
        result: Result<Suggestion, FetchError>,
    ) -> Option<SessionResponse> {
        if self.torn_down || !self.saved_info_guard.accept(id) {
            debug!(id = id.as_raw(), "stale saved info dropped");
            return None;
        }
        self.saved_info_guard.clear();
        self.state.loading = false;

        let mut resp = SessionResponse::consumed();
        resp.dropdown = DropdownAction::Hide;
        match result {
            Ok(item) => {
                self.state.query = item.label.clone();
                resp.query = Some(item.label.clone());
                self.selection = Some(item);
            }
            Err(err) => {
                // Nothing to show: fall back to an empty, editable field.
                debug!(%err, "saved info unavailable, unlocking");
                self.locked = false;
                self.state.query.clear();
                resp.query = Some(String::new());
            }
        }
        Some(resp)
    }
}
