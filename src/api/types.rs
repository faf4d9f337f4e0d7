use suggest_core::{Politeness, Suggestion};
use suggest_session::KeyEvent;

use crate::controller::{CaretTarget, ControllerEvent, ControllerOutput};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SuggestError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct SuggestItem {
    pub value: String,
    pub label: String,
}

impl From<Suggestion> for SuggestItem {
    fn from(s: Suggestion) -> Self {
        Self {
            value: s.value,
            label: s.label,
        }
    }
}

impl From<SuggestItem> for Suggestion {
    fn from(item: SuggestItem) -> Self {
        Suggestion::new(item.value, item.label)
    }
}

#[derive(Debug, uniffi::Record)]
pub struct SuggestResponse {
    pub consumed: bool,
    pub events: Vec<SuggestEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Caret offsets are in characters, as the field reports them.
#[derive(Clone, Copy, Debug, uniffi::Enum)]
pub enum SuggestKeyEvent {
    ArrowUp { caret: u32 },
    ArrowDown { caret: u32 },
    Enter,
    Tab,
    Escape,
    Other,
}

impl From<SuggestKeyEvent> for KeyEvent {
    fn from(key: SuggestKeyEvent) -> Self {
        match key {
            SuggestKeyEvent::ArrowUp { caret } => KeyEvent::ArrowUp {
                caret: caret as usize,
            },
            SuggestKeyEvent::ArrowDown { caret } => KeyEvent::ArrowDown {
                caret: caret as usize,
            },
            SuggestKeyEvent::Enter => KeyEvent::Enter,
            SuggestKeyEvent::Tab => KeyEvent::Tab,
            SuggestKeyEvent::Escape => KeyEvent::Escape,
            SuggestKeyEvent::Other => KeyEvent::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum SuggestEvent {
    Select {
        value: String,
        item: SuggestItem,
    },
    SetQuery {
        text: String,
    },
    MoveCaret {
        to_end: bool,
    },
    ShowSuggestions {
        items: Vec<SuggestItem>,
        selected: Option<u32>,
        loading: bool,
    },
    HideSuggestions,
    Announce {
        message: String,
        assertive: bool,
    },
    ScrollIntoView {
        index: u32,
    },
    FocusInput,
    FetchSuggestions {
        query: String,
        request_id: u64,
    },
    FetchSavedInfo {
        value: String,
        request_id: u64,
    },
    ScheduleTick {
        after_ms: u64,
    },
    SchedulePoll,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

impl From<ControllerEvent> for SuggestEvent {
    fn from(event: ControllerEvent) -> Self {
        match event {
            ControllerEvent::Select { value, suggestion } => SuggestEvent::Select {
                value,
                item: suggestion.into(),
            },
            ControllerEvent::SetQuery { text } => SuggestEvent::SetQuery { text },
            ControllerEvent::MoveCaret { to } => SuggestEvent::MoveCaret {
                to_end: to == CaretTarget::End,
            },
            ControllerEvent::ShowSuggestions {
                suggestions,
                selected,
                loading,
            } => SuggestEvent::ShowSuggestions {
                items: suggestions.into_iter().map(SuggestItem::from).collect(),
                selected: selected.map(|i| i as u32),
                loading,
            },
            ControllerEvent::HideSuggestions => SuggestEvent::HideSuggestions,
            ControllerEvent::Announce {
                message,
                politeness,
            } => SuggestEvent::Announce {
                message,
                assertive: politeness == Politeness::Assertive,
            },
            ControllerEvent::ScrollIntoView { index } => SuggestEvent::ScrollIntoView {
                index: index as u32,
            },
            ControllerEvent::FocusInput => SuggestEvent::FocusInput,
            ControllerEvent::FetchSuggestions { query, id } => SuggestEvent::FetchSuggestions {
                query,
                request_id: id,
            },
            ControllerEvent::FetchSavedInfo { value, id } => SuggestEvent::FetchSavedInfo {
                value,
                request_id: id,
            },
            ControllerEvent::ScheduleTick { after_ms } => SuggestEvent::ScheduleTick { after_ms },
            ControllerEvent::SchedulePoll => SuggestEvent::SchedulePoll,
        }
    }
}

impl From<ControllerOutput> for SuggestResponse {
    fn from(out: ControllerOutput) -> Self {
        Self {
            consumed: out.consumed,
            events: out.events.into_iter().map(SuggestEvent::from).collect(),
        }
    }
}
