use tracing::debug_span;

use super::response::build_selection_response;
use super::types::{next_index, previous_index, CaretMove, DropdownAction, KeyEvent, SessionResponse};
use super::SuggestionSession;

impl SuggestionSession {
    /// Arrow keys move the highlight only with an open, loaded, non-empty dropdown.
    fn intercepts_navigation(&self) -> bool {
        self.state.show_suggestions && !self.state.suggestions.is_empty() && !self.state.loading
    }

    /// Process a key event. Returns a SessionResponse describing what the caller should do.
    pub fn handle_key(&mut self, event: KeyEvent) -> SessionResponse {
        let _span = debug_span!("handle_key", ?event).entered();
        if self.torn_down {
            return SessionResponse::not_consumed();
        }

        match event {
            KeyEvent::ArrowUp { .. } if self.intercepts_navigation() => {
                self.move_selection(previous_index(
                    self.state.selected_index,
                    self.state.suggestions.len(),
                ))
            }
            KeyEvent::ArrowDown { .. } if self.intercepts_navigation() => {
                self.move_selection(next_index(
                    self.state.selected_index,
                    self.state.suggestions.len(),
                ))
            }

            // Single-line fields do not jump the caret on Up/Down in every host;
            // do it here so the key is never a dead end.
            KeyEvent::ArrowUp { caret } if caret > 0 => caret_response(CaretMove::Start),
            KeyEvent::ArrowDown { caret } if caret < self.state.query.chars().count() => {
                caret_response(CaretMove::End)
            }

            KeyEvent::Enter if self.intercepts_navigation() => {
                match self.state.selected_index {
                    Some(index) => self.commit_index(index),
                    None => SessionResponse::not_consumed(),
                }
            }

            // Tab commits the highlighted row but keeps its focus-advance effect.
            KeyEvent::Tab if self.intercepts_navigation() => match self.state.selected_index {
                Some(index) => {
                    let mut resp = self.commit_index(index);
                    resp.consumed = false;
                    resp.announce = resp
                        .commit
                        .as_ref()
                        .map(|c| super::commit::selection_announcement(&c.suggestion));
                    resp
                }
                None => SessionResponse::not_consumed(),
            },

            KeyEvent::Escape if self.state.show_suggestions => {
                self.dismiss();
                let mut resp = SessionResponse::consumed();
                resp.dropdown = DropdownAction::Hide;
                resp
            }

            _ => SessionResponse::not_consumed(),
        }
    }

    /// Pointer hover highlights a row without committing it.
    pub fn hover(&mut self, index: usize) -> SessionResponse {
        if self.torn_down
            || !self.state.show_suggestions
            || index >= self.state.suggestions.len()
            || self.state.selected_index == Some(index)
        {
            return SessionResponse::not_consumed();
        }
        self.move_selection(Some(index))
    }

    /// Focus left the widget: close the dropdown without committing.
    pub fn blur(&mut self) -> SessionResponse {
        if self.torn_down || !self.state.show_suggestions {
            return SessionResponse::not_consumed();
        }
        self.dismiss();
        let mut resp = SessionResponse::not_consumed();
        resp.dropdown = DropdownAction::Hide;
        resp
    }

    fn move_selection(&mut self, index: Option<usize>) -> SessionResponse {
        self.state.selected_index = index;
        build_selection_response(&self.state)
    }

    /// Close the dropdown and make sure no pending fetch reopens it.
    fn dismiss(&mut self) {
        self.cancel_pending_fetch();
        self.state.close();
    }
}

fn caret_response(to: CaretMove) -> SessionResponse {
    let mut resp = SessionResponse::consumed();
    resp.caret = Some(to);
    resp
}
