use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use suggest_core::{FetchError, RequestId, Suggestion};

use crate::controller::SuggestController;

use super::types::{SuggestItem, SuggestKeyEvent, SuggestResponse};

/// One suggestion-enabled text field. The host performs the fetches.
#[derive(uniffi::Object)]
pub struct SuggestSession {
    controller: Mutex<SuggestController>,
}

#[uniffi::export]
impl SuggestSession {
    #[uniffi::constructor]
    pub(super) fn new() -> Arc<Self> {
        let controller = SuggestController::new(crate::settings::settings());
        Arc::new(Self {
            controller: Mutex::new(controller),
        })
    }

    /// Restart the field seeded with a previously committed value. The
    /// response asks the host to resolve its label.
    fn start_with_selected(&self, value: String) -> SuggestResponse {
        let settings = crate::settings::settings();
        let mut controller = self.lock();
        controller.teardown();
        let (seeded, out) =
            SuggestController::new(settings).with_selected(settings, value, Instant::now());
        *controller = seeded;
        out.into()
    }

    fn edit(&self, text: String) -> SuggestResponse {
        self.lock().edit(&text, Instant::now()).into()
    }

    fn tick(&self) -> SuggestResponse {
        self.lock().tick(Instant::now()).into()
    }

    fn handle_key(&self, key: SuggestKeyEvent) -> SuggestResponse {
        self.lock().handle_key(key.into(), Instant::now()).into()
    }

    fn hover(&self, index: u32) -> SuggestResponse {
        self.lock().hover(index as usize, Instant::now()).into()
    }

    fn select_at(&self, index: u32) -> SuggestResponse {
        self.lock().select_at(index as usize, Instant::now()).into()
    }

    fn reset_selection(&self) -> SuggestResponse {
        self.lock().reset_selection(Instant::now()).into()
    }

    fn blur(&self) -> SuggestResponse {
        self.lock().blur(Instant::now()).into()
    }

    fn receive_suggestions(&self, request_id: u64, items: Vec<SuggestItem>) -> SuggestResponse {
        let suggestions = items.into_iter().map(Suggestion::from).collect();
        self.lock()
            .receive_suggestions(RequestId::from_raw(request_id), Ok(suggestions), Instant::now())
            .into()
    }

    fn fail_suggestions(&self, request_id: u64, reason: String) -> SuggestResponse {
        self.lock()
            .receive_suggestions(
                RequestId::from_raw(request_id),
                Err(FetchError::rejected(reason)),
                Instant::now(),
            )
            .into()
    }

    fn receive_saved_info(&self, request_id: u64, item: SuggestItem) -> SuggestResponse {
        self.lock()
            .receive_saved_info(RequestId::from_raw(request_id), Ok(item.into()), Instant::now())
            .into()
    }

    fn fail_saved_info(&self, request_id: u64, reason: String) -> SuggestResponse {
        self.lock()
            .receive_saved_info(
                RequestId::from_raw(request_id),
                Err(FetchError::rejected(reason)),
                Instant::now(),
            )
            .into()
    }

    fn query(&self) -> String {
        self.lock().session().query().to_string()
    }

    fn selection(&self) -> Option<SuggestItem> {
        self.lock().session().selection().cloned().map(SuggestItem::from)
    }

    fn teardown(&self) {
        self.lock().teardown();
    }
}

impl SuggestSession {
    /// A panic inside one call must not brick the field for good.
    fn lock(&self) -> MutexGuard<'_, SuggestController> {
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SuggestEvent;

    fn fetch_request(resp: &SuggestResponse) -> Option<u64> {
        resp.events.iter().find_map(|e| match e {
            SuggestEvent::FetchSuggestions { request_id, .. } => Some(*request_id),
            _ => None,
        })
    }

    fn items() -> Vec<SuggestItem> {
        vec![
            SuggestItem {
                value: "p1".into(),
                label: "London".into(),
            },
            SuggestItem {
                value: "p2".into(),
                label: "Long Beach".into(),
            },
        ]
    }

    /// Drive the debounce with tick until the fetch is issued.
    fn settle(session: &SuggestSession) -> u64 {
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        loop {
            if let Some(id) = fetch_request(&session.tick()) {
                return id;
            }
            assert!(Instant::now() < deadline, "debounce never fired");
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
    }

    #[test]
    fn test_type_fetch_and_commit_with_enter() {
        let session = SuggestSession::new();
        session.edit("lon".into());
        let id = settle(&session);

        let shown = session.receive_suggestions(id, items());
        assert!(matches!(
            shown.events[0],
            SuggestEvent::ShowSuggestions { ref items, .. } if items.len() == 2
        ));

        assert!(session.handle_key(SuggestKeyEvent::ArrowDown { caret: 3 }).consumed);
        let commit = session.handle_key(SuggestKeyEvent::Enter);
        assert!(commit.consumed);
        assert_eq!(
            commit.events[0],
            SuggestEvent::Select {
                value: "p1".into(),
                item: items()[0].clone(),
            }
        );
        assert_eq!(session.query(), "London");
        assert_eq!(session.selection().map(|i| i.value), Some("p1".into()));
    }

    #[test]
    fn test_failed_fetch_keeps_field_usable() {
        let session = SuggestSession::new();
        session.edit("lon".into());
        let id = settle(&session);
        let resp = session.fail_suggestions(id, "offline".into());
        assert!(resp
            .events
            .iter()
            .all(|e| !matches!(e, SuggestEvent::Announce { .. })));
        session.edit("long".into());
        assert!(settle(&session) > id);
    }

    #[test]
    fn test_seeded_lookup_failure_clears_query() {
        let session = SuggestSession::new();
        let resp = session.start_with_selected("p9".into());
        let id = resp
            .events
            .iter()
            .find_map(|e| match e {
                SuggestEvent::FetchSavedInfo { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .unwrap();
        let failed = session.fail_saved_info(id, "gone".into());
        assert!(failed
            .events
            .contains(&SuggestEvent::SetQuery { text: String::new() }));
        assert!(session.selection().is_none());
    }
}
