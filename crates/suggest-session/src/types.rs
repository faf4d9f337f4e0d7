use suggest_core::{Politeness, RequestId, Suggestion};

/// Key events the navigator understands. Caret offsets are in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    ArrowUp { caret: usize },
    ArrowDown { caret: usize },
    Enter,
    Tab,
    Escape,
    /// Any other key; never intercepted.
    Other,
}

/// Observable phase of the session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Query below the fetch threshold (normally: empty).
    Empty,
    /// Waiting for the debounce window or an in-flight fetch.
    Loading,
    /// Suggestions available, dropdown open.
    Showing,
    /// Last fetch returned nothing; dropdown open but empty.
    NoResults,
    /// Query present but the dropdown was dismissed (Escape, blur, unlocked commit).
    Closed,
    /// A selection is committed (or seeded) and editing is locked.
    Committed,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub show_suggestions: bool,
    pub selected_index: Option<usize>,
    pub loading: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            selected_index: None,
            loading: false,
        }
    }

    /// Replace the suggestion list wholesale. Selection never survives a new list.
    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.selected_index = None;
    }

    pub(crate) fn close(&mut self) {
        self.show_suggestions = false;
        self.selected_index = None;
    }
}

/// Dropdown instruction for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownAction {
    /// Leave the dropdown as rendered.
    Keep,
    /// Render (or re-render) the dropdown.
    Show {
        suggestions: Vec<Suggestion>,
        selected: Option<usize>,
        loading: bool,
    },
    Hide,
}

/// Request for the host to fetch suggestions for `query`.
/// The result must be handed back with the same `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: String,
    pub id: RequestId,
}

/// Request to resolve the display label of a pre-selected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedInfoRequest {
    pub value: String,
    pub id: RequestId,
}

/// The `onSelect(value, suggestion)` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSelection {
    pub value: String,
    pub suggestion: Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

/// Caret jump the host performs in place of the key's default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Start,
    End,
}

/// Orthogonal side-effects that accompany a response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SideEffects {
    /// Return focus to the text field (pointer commits).
    pub focus_input: bool,
    /// The highlighted row changed while the dropdown is open.
    pub scroll_to: Option<usize>,
}

/// Response from every session entry point, describing what the host should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// The key's default effect must be suppressed.
    pub consumed: bool,
    /// New text for the input field.
    pub query: Option<String>,
    pub dropdown: DropdownAction,
    pub fetch: Option<FetchRequest>,
    pub saved_info: Option<SavedInfoRequest>,
    pub commit: Option<CommittedSelection>,
    pub announce: Option<Announcement>,
    pub caret: Option<CaretMove>,
    pub side_effects: SideEffects,
}

impl SessionResponse {
    pub fn not_consumed() -> Self {
        Self {
            consumed: false,
            query: None,
            dropdown: DropdownAction::Keep,
            fetch: None,
            saved_info: None,
            commit: None,
            announce: None,
            caret: None,
            side_effects: SideEffects::default(),
        }
    }

    pub fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    /// Merge: keep commit/announce/side-effects from self, take display and
    /// fetch fields from `other`.
    pub(crate) fn with_display_from(mut self, other: SessionResponse) -> SessionResponse {
        self.query = other.query.or(self.query);
        self.dropdown = other.dropdown;
        self.fetch = other.fetch;
        self
    }
}

/// Up: unset or first row wraps to the last row.
pub(crate) fn previous_index(selected: Option<usize>, count: usize) -> Option<usize> {
    let last = count.checked_sub(1)?;
    match selected {
        None | Some(0) => Some(last),
        Some(i) => Some((i - 1).min(last)),
    }
}

/// Down: unset or last row wraps to the first row.
pub(crate) fn next_index(selected: Option<usize>, count: usize) -> Option<usize> {
    let last = count.checked_sub(1)?;
    match selected {
        Some(i) if i < last => Some(i + 1),
        _ => Some(0),
    }
}
