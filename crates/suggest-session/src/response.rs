use super::types::{DropdownAction, SessionResponse, SessionState};

pub(super) fn build_dropdown(state: &SessionState) -> DropdownAction {
    if state.show_suggestions {
        DropdownAction::Show {
            suggestions: state.suggestions.clone(),
            selected: state.selected_index,
            loading: state.loading,
        }
    } else {
        DropdownAction::Hide
    }
}

pub(super) fn build_dropdown_response(state: &SessionState) -> SessionResponse {
    let mut resp = SessionResponse::consumed();
    resp.dropdown = build_dropdown(state);
    resp
}

/// Response for a highlight move; asks the host to scroll the row into view.
pub(super) fn build_selection_response(state: &SessionState) -> SessionResponse {
    let mut resp = build_dropdown_response(state);
    if state.show_suggestions {
        resp.side_effects.scroll_to = state.selected_index;
    }
    resp
}
