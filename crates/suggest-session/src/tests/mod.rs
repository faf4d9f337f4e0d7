mod commit;

use std::time::{Duration, Instant};

use suggest_core::settings::Settings;
use suggest_core::{RequestId, Suggestion};

use super::{FetchRequest, SuggestionSession};

pub(super) const DEBOUNCE: Duration = Duration::from_millis(200);

pub(super) fn settings() -> Settings {
    Settings::default()
}

pub(super) fn cities() -> Vec<Suggestion> {
    vec![
        Suggestion::new("p1", "London"),
        Suggestion::new("p2", "Long Beach"),
        Suggestion::new("p3", "Londonderry"),
    ]
}

/// Type `text` and let the debounce window elapse. Returns the issued fetch.
pub(super) fn type_and_settle(
    session: &mut SuggestionSession,
    text: &str,
    now: Instant,
) -> FetchRequest {
    session.edit(text, now);
    session
        .tick(now + DEBOUNCE)
        .fetch
        .expect("debounced fetch should be issued")
}

/// Type `text`, settle, and deliver `results` for the issued fetch.
pub(super) fn show(session: &mut SuggestionSession, text: &str, results: Vec<Suggestion>) -> RequestId {
    let req = type_and_settle(session, text, Instant::now());
    session
        .receive_suggestions(req.id, Ok(results))
        .expect("current fetch must be accepted");
    req.id
}
