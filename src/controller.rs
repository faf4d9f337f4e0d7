//! Host-facing driver around `SuggestionSession`.
//!
//! Turns each `SessionResponse` into an ordered list of `ControllerEvent`s,
//! throttles scroll requests, and (in worker mode) runs fetches on a
//! background `FetchWorker` instead of handing them to the host.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use suggest_core::settings::Settings;
use suggest_core::{FetchError, Politeness, RequestId, Suggestion, Throttle};
use suggest_session::{CaretMove, DropdownAction, KeyEvent, SessionResponse, SuggestionSession};

use crate::async_worker::{FetchOutcome, FetchWorker};
use crate::source::SuggestionSource;

/// Where the caret should jump, in place of the key's default effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaretTarget {
    Start,
    End,
}

impl From<CaretMove> for CaretTarget {
    fn from(m: CaretMove) -> Self {
        match m {
            CaretMove::Start => Self::Start,
            CaretMove::End => Self::End,
        }
    }
}

/// One instruction for the host, in the order it must be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// `onSelect(value, suggestion)`.
    Select { value: String, suggestion: Suggestion },
    SetQuery { text: String },
    MoveCaret { to: CaretTarget },
    ShowSuggestions {
        suggestions: Vec<Suggestion>,
        selected: Option<usize>,
        loading: bool,
    },
    HideSuggestions,
    Announce { message: String, politeness: Politeness },
    ScrollIntoView { index: usize },
    FocusInput,
    /// Host-fetch mode: call the fetch collaborator and report back with `id`.
    FetchSuggestions { query: String, id: u64 },
    FetchSavedInfo { value: String, id: u64 },
    /// Call `tick` after this long.
    ScheduleTick { after_ms: u64 },
    /// Worker mode: a fetch is outstanding, call `poll` again.
    SchedulePoll,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ControllerOutput {
    pub consumed: bool,
    pub events: Vec<ControllerEvent>,
}

impl ControllerOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub struct SuggestController {
    session: SuggestionSession,
    worker: Option<FetchWorker>,
    scroll: Throttle<usize>,
}

impl SuggestController {
    /// Host-fetch mode: fetches are emitted as events.
    pub fn new(settings: &Settings) -> Self {
        Self {
            session: SuggestionSession::new(settings),
            worker: None,
            scroll: Throttle::new(settings.presentation.scroll_throttle()),
        }
    }

    /// Worker mode: fetches run against `source` on a background thread.
    pub fn with_source(settings: &Settings, source: Arc<dyn SuggestionSource>) -> io::Result<Self> {
        let worker = FetchWorker::spawn(source)?;
        Ok(Self {
            worker: Some(worker),
            ..Self::new(settings)
        })
    }

    /// Replace the session with one seeded from a previously committed value.
    pub fn with_selected(
        mut self,
        settings: &Settings,
        value: impl Into<String>,
        now: Instant,
    ) -> (Self, ControllerOutput) {
        let (session, resp) = SuggestionSession::with_selected(settings, value);
        self.session = session;
        let out = self.dispatch(resp, now);
        (self, out)
    }

    pub fn session(&self) -> &SuggestionSession {
        &self.session
    }

    pub fn is_worker_mode(&self) -> bool {
        self.worker.is_some()
    }

    pub fn edit(&mut self, text: &str, now: Instant) -> ControllerOutput {
        let resp = self.session.edit(text, now);
        self.dispatch(resp, now)
    }

    pub fn tick(&mut self, now: Instant) -> ControllerOutput {
        let resp = self.session.tick(now);
        self.dispatch(resp, now)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> ControllerOutput {
        let resp = self.session.handle_key(key);
        self.dispatch(resp, now)
    }

    pub fn hover(&mut self, index: usize, now: Instant) -> ControllerOutput {
        let resp = self.session.hover(index);
        self.dispatch(resp, now)
    }

    pub fn select_at(&mut self, index: usize, now: Instant) -> ControllerOutput {
        let resp = self.session.select_at(index);
        self.dispatch(resp, now)
    }

    pub fn reset_selection(&mut self, now: Instant) -> ControllerOutput {
        let resp = self.session.reset_selection();
        self.dispatch(resp, now)
    }

    pub fn blur(&mut self, now: Instant) -> ControllerOutput {
        let resp = self.session.blur();
        self.dispatch(resp, now)
    }

    /// Host-fetch mode completion. Stale ids change nothing, but the output
    /// still carries the pending `ScheduleTick`/`SchedulePoll`.
    pub fn receive_suggestions(
        &mut self,
        id: RequestId,
        result: Result<Vec<Suggestion>, FetchError>,
        now: Instant,
    ) -> ControllerOutput {
        match self.session.receive_suggestions(id, result) {
            Some(resp) => self.dispatch(resp, now),
            None => self.dispatch(SessionResponse::not_consumed(), now),
        }
    }

    pub fn receive_saved_info(
        &mut self,
        id: RequestId,
        result: Result<Suggestion, FetchError>,
        now: Instant,
    ) -> ControllerOutput {
        match self.session.receive_saved_info(id, result) {
            Some(resp) => self.dispatch(resp, now),
            None => self.dispatch(SessionResponse::not_consumed(), now),
        }
    }

    /// Worker mode: apply one finished fetch, if any.
    pub fn poll(&mut self, now: Instant) -> Option<ControllerOutput> {
        let outcome = self.worker.as_ref()?.try_recv()?;
        Some(self.apply_outcome(outcome, now))
    }

    /// Like `poll`, but waits up to `timeout` for the worker.
    pub fn poll_timeout(&mut self, timeout: Duration, now: Instant) -> Option<ControllerOutput> {
        let outcome = self.worker.as_ref()?.recv_timeout(timeout)?;
        Some(self.apply_outcome(outcome, now))
    }

    /// True while the worker owes the session an answer.
    pub fn awaiting_fetch(&self) -> bool {
        self.worker.is_some()
            && !self.session.is_torn_down()
            && self.session.is_loading()
            && self.session.next_deadline().is_none()
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
        self.scroll.cancel();
        if let Some(worker) = &self.worker {
            worker.invalidate_all();
        }
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome, now: Instant) -> ControllerOutput {
        match outcome {
            FetchOutcome::Suggestions { id, result } => self.receive_suggestions(id, result, now),
            FetchOutcome::SavedInfo { id, result } => self.receive_saved_info(id, result, now),
        }
    }

    fn dispatch(&mut self, resp: SessionResponse, now: Instant) -> ControllerOutput {
        let mut events = Vec::new();
        let redraw = !matches!(resp.dropdown, DropdownAction::Keep);

        if let Some(commit) = resp.commit {
            events.push(ControllerEvent::Select {
                value: commit.value,
                suggestion: commit.suggestion,
            });
        }
        if let Some(text) = resp.query {
            events.push(ControllerEvent::SetQuery { text });
        }
        if let Some(caret) = resp.caret {
            events.push(ControllerEvent::MoveCaret { to: caret.into() });
        }
        match resp.dropdown {
            DropdownAction::Keep => {}
            DropdownAction::Show {
                suggestions,
                selected,
                loading,
            } => events.push(ControllerEvent::ShowSuggestions {
                suggestions,
                selected,
                loading,
            }),
            DropdownAction::Hide => events.push(ControllerEvent::HideSuggestions),
        }
        if let Some(announcement) = resp.announce {
            events.push(ControllerEvent::Announce {
                message: announcement.message,
                politeness: announcement.politeness,
            });
        }
        let scroll = match resp.side_effects.scroll_to {
            Some(index) => {
                let released = self.scroll.submit(index, now);
                if released.is_none() {
                    debug!(index, "scroll deferred");
                }
                released
            }
            None => {
                // A redraw without a highlight change invalidates any held row.
                if redraw {
                    self.scroll.discard();
                }
                self.scroll.fire(now)
            }
        };
        if let Some(index) = scroll {
            events.push(ControllerEvent::ScrollIntoView { index });
        }
        if resp.side_effects.focus_input {
            events.push(ControllerEvent::FocusInput);
        }

        match &self.worker {
            Some(worker) => {
                if let Some(req) = resp.saved_info {
                    worker.submit_saved_info(req.value, req.id);
                }
                if let Some(req) = resp.fetch {
                    worker.submit_suggestions(req.query, req.id);
                } else if !self.session.is_loading() {
                    worker.invalidate();
                }
            }
            None => {
                if let Some(req) = resp.saved_info {
                    events.push(ControllerEvent::FetchSavedInfo {
                        value: req.value,
                        id: req.id.as_raw(),
                    });
                }
                if let Some(req) = resp.fetch {
                    events.push(ControllerEvent::FetchSuggestions {
                        query: req.query,
                        id: req.id.as_raw(),
                    });
                }
            }
        }

        let next_tick = match (self.session.next_deadline(), self.scroll.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(deadline) = next_tick {
            let after = deadline.saturating_duration_since(now);
            events.push(ControllerEvent::ScheduleTick {
                after_ms: after.as_millis() as u64,
            });
        }
        if self.awaiting_fetch() {
            events.push(ControllerEvent::SchedulePoll);
        }

        ControllerOutput {
            consumed: resp.consumed,
            events,
        }
    }
}
