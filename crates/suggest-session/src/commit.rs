use suggest_core::{selection_message, Politeness, Suggestion};
use tracing::debug;

use super::response::build_dropdown;
use super::types::{Announcement, CommittedSelection, DropdownAction, SessionResponse};
use super::SuggestionSession;

pub(super) fn selection_announcement(suggestion: &Suggestion) -> Announcement {
    Announcement {
        message: selection_message(&suggestion.label),
        politeness: Politeness::Polite,
    }
}

impl SuggestionSession {
    pub(super) fn commit_index(&mut self, index: usize) -> SessionResponse {
        match self.state.suggestions.get(index).cloned() {
            Some(suggestion) => self.commit_suggestion(suggestion),
            None => SessionResponse::not_consumed(),
        }
    }

    /// Finalize `suggestion`: notify the consumer, put its label in the field
    /// and close the dropdown.
    pub(super) fn commit_suggestion(&mut self, suggestion: Suggestion) -> SessionResponse {
        debug!(value = suggestion.value.as_str(), "commit");
        // A late result must not reopen the dropdown over the committed label.
        self.cancel_pending_fetch();
        self.state.close();
        self.state.query = suggestion.label.clone();

        let mut resp = SessionResponse::consumed();
        resp.query = Some(suggestion.label.clone());
        resp.dropdown = DropdownAction::Hide;
        resp.commit = Some(CommittedSelection {
            value: suggestion.value.clone(),
            suggestion: suggestion.clone(),
        });

        self.locked = self.config.lock_after_commit;
        self.selection = Some(suggestion);
        resp
    }

    /// Pointer click on a row. Commits it and hands focus back to the field.
    pub fn select_at(&mut self, index: usize) -> SessionResponse {
        if self.torn_down || !self.state.show_suggestions {
            return SessionResponse::not_consumed();
        }
        let mut resp = self.commit_index(index);
        if resp.commit.is_some() {
            resp.side_effects.focus_input = true;
        }
        resp
    }

    /// Discard the committed selection and go back to editing its label.
    ///
    /// Tells the consumer the selection is gone (empty value), then fetches for
    /// the prior text right away so the dropdown repopulates.
    pub fn reset_selection(&mut self) -> SessionResponse {
        if self.torn_down {
            return SessionResponse::not_consumed();
        }

        let mut resp = SessionResponse::consumed();
        match self.selection.take() {
            Some(previous) => {
                resp = self.commit_suggestion(Suggestion::cleared(previous.label));
                self.selection = None;
            }
            None => {
                // Seed lookup still outstanding: abandon it.
                self.saved_info_guard.clear();
                self.state.loading = false;
            }
        }
        self.locked = false;

        let query = self.state.query.clone();
        if !self.meets_threshold(&query) {
            return resp;
        }
        let fetch = self.issue_fetch(query);
        self.state.show_suggestions = true;
        let mut refetch = SessionResponse::consumed();
        refetch.dropdown = build_dropdown(&self.state);
        refetch.fetch = Some(fetch);
        resp.with_display_from(refetch)
    }
}
