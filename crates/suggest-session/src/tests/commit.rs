use std::time::Instant;

use suggest_core::FetchError;

use super::*;
use crate::{DropdownAction, KeyEvent, SessionPhase};

#[test]
fn test_enter_commits_highlighted() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    session.handle_key(KeyEvent::ArrowDown { caret: 3 });
    session.handle_key(KeyEvent::ArrowDown { caret: 3 });
    assert_eq!(session.selected_index(), Some(1));

    let resp = session.handle_key(KeyEvent::Enter);
    assert!(resp.consumed);
    let commit = resp.commit.unwrap();
    assert_eq!(commit.value, "p2");
    assert_eq!(commit.suggestion, Suggestion::new("p2", "Long Beach"));
    assert_eq!(resp.query.as_deref(), Some("Long Beach"));
    assert_eq!(resp.dropdown, DropdownAction::Hide);

    assert_eq!(session.query(), "Long Beach");
    assert_eq!(session.selected_index(), None);
    assert!(!session.shows_suggestions());
    assert_eq!(session.phase(), SessionPhase::Committed);
    assert_eq!(session.selection(), Some(&Suggestion::new("p2", "Long Beach")));
}

#[test]
fn test_commit_locks_editing_by_default() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    session.select_at(0);
    assert!(session.is_locked());
    let resp = session.edit("London!", Instant::now());
    assert!(!resp.consumed);
    assert_eq!(session.query(), "London");
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn test_unlocked_commit_allows_new_search() {
    let mut s = settings();
    s.selection.lock_after_commit = false;
    let mut session = SuggestionSession::new(&s);
    show(&mut session, "lon", cities());
    session.select_at(0);
    assert!(!session.is_locked());
    assert_eq!(session.phase(), SessionPhase::Committed);

    session.edit("par", Instant::now());
    assert!(session.selection().is_none());
    assert_eq!(session.phase(), SessionPhase::Loading);
}

#[test]
fn test_commit_discards_in_flight_fetch() {
    let t0 = Instant::now();
    let mut s = settings();
    s.selection.lock_after_commit = false;
    let mut session = SuggestionSession::new(&s);
    let first = show(&mut session, "lon", cities());
    // Enter is not intercepted while loading, so commit by pointer.
    let pending = type_and_settle(&mut session, "lond", t0);
    session.select_at(0);
    assert_ne!(first, pending.id);
    assert!(session.receive_suggestions(pending.id, Ok(cities())).is_none());
    assert!(!session.shows_suggestions());
    assert!(!session.is_loading());
}

#[test]
fn test_pointer_commit_returns_focus() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    let resp = session.select_at(2);
    assert!(resp.side_effects.focus_input);
    assert_eq!(resp.commit.unwrap().value, "p3");
    assert_eq!(session.query(), "Londonderry");
}

#[test]
fn test_pointer_commit_out_of_range_is_ignored() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    let resp = session.select_at(7);
    assert!(resp.commit.is_none());
    assert!(!resp.side_effects.focus_input);
    assert!(session.shows_suggestions());
}

#[test]
fn test_pointer_commit_requires_open_dropdown() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    session.blur();
    assert!(session.select_at(0).commit.is_none());
}

// --- Reset ---

#[test]
fn test_reset_selection_clears_consumer_and_refetches() {
    let mut session = SuggestionSession::new(&settings());
    show(
        &mut session,
        "par",
        vec![Suggestion::new("c1", "Paris"), Suggestion::new("c2", "Parma")],
    );
    session.select_at(0);
    assert_eq!(session.phase(), SessionPhase::Committed);

    let resp = session.reset_selection();
    let commit = resp.commit.unwrap();
    assert_eq!(commit.value, "");
    assert_eq!(commit.suggestion, Suggestion::cleared("Paris"));
    let fetch = resp.fetch.unwrap();
    assert_eq!(fetch.query, "Paris");
    assert_eq!(resp.query.as_deref(), Some("Paris"));
    assert!(matches!(
        resp.dropdown,
        DropdownAction::Show { loading: true, .. }
    ));

    assert!(!session.is_locked());
    assert!(session.selection().is_none());
    assert_eq!(session.phase(), SessionPhase::Loading);

    // The re-issued fetch is the authoritative one.
    let paris = vec![Suggestion::new("c1", "Paris"), Suggestion::new("c3", "Paris, TX")];
    session.receive_suggestions(fetch.id, Ok(paris.clone())).unwrap();
    assert_eq!(session.suggestions(), paris.as_slice());
    assert_eq!(session.phase(), SessionPhase::Showing);
}

#[test]
fn test_reset_allows_editing_again() {
    let mut session = SuggestionSession::new(&settings());
    show(&mut session, "lon", cities());
    session.select_at(0);
    session.reset_selection();
    let resp = session.edit("Londo", Instant::now());
    assert!(resp.consumed);
    assert_eq!(session.query(), "Londo");
}

// --- Seeded selection ---

#[test]
fn test_seeded_session_starts_loading_and_locked() {
    let (mut session, resp) = SuggestionSession::with_selected(&settings(), "c1");
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert!(session.is_locked());
    let req = resp.saved_info.unwrap();
    assert_eq!(req.value, "c1");

    assert!(!session.edit("x", Instant::now()).consumed);

    let resp = session
        .receive_saved_info(req.id, Ok(Suggestion::new("c1", "Paris")))
        .unwrap();
    assert_eq!(resp.query.as_deref(), Some("Paris"));
    assert_eq!(session.query(), "Paris");
    assert_eq!(session.phase(), SessionPhase::Committed);
    assert!(!session.is_loading());
}

#[test]
fn test_seeded_reset_refetches_label() {
    let (mut session, resp) = SuggestionSession::with_selected(&settings(), "c1");
    let req = resp.saved_info.unwrap();
    session
        .receive_saved_info(req.id, Ok(Suggestion::new("c1", "Paris")))
        .unwrap();

    let resp = session.reset_selection();
    assert_eq!(resp.commit.unwrap().value, "");
    assert_eq!(resp.fetch.unwrap().query, "Paris");
}

#[test]
fn test_seeded_lookup_failure_unlocks_empty_field() {
    let (mut session, resp) = SuggestionSession::with_selected(&settings(), "gone");
    let req = resp.saved_info.unwrap();
    let resp = session
        .receive_saved_info(req.id, Err(FetchError::rejected("404")))
        .unwrap();
    assert_eq!(resp.query.as_deref(), Some(""));
    assert!(!session.is_locked());
    assert_eq!(session.phase(), SessionPhase::Empty);
    assert!(session.edit("pa", Instant::now()).consumed);
}

#[test]
fn test_reset_before_seed_resolves_abandons_lookup() {
    let (mut session, resp) = SuggestionSession::with_selected(&settings(), "c1");
    let req = resp.saved_info.unwrap();
    let resp = session.reset_selection();
    assert!(resp.commit.is_none());
    assert!(resp.fetch.is_none());
    assert!(session
        .receive_saved_info(req.id, Ok(Suggestion::new("c1", "Paris")))
        .is_none());
    assert_eq!(session.phase(), SessionPhase::Empty);
}

#[test]
fn test_teardown_drops_seed_lookup() {
    let (mut session, resp) = SuggestionSession::with_selected(&settings(), "c1");
    let req = resp.saved_info.unwrap();
    session.teardown();
    assert!(session
        .receive_saved_info(req.id, Ok(Suggestion::new("c1", "Paris")))
        .is_none());
}
