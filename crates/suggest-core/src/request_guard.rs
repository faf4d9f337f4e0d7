//! Last-issued-wins bookkeeping for asynchronous fetches.
//!
//! Every `issue` hands out a fresh generation token and records it as the only
//! pending one. Completions carry their token back; anything that does not match
//! the recorded token is stale and must be dropped without touching state.
//! There is no real cancellation: superseded fetches still run to completion,
//! their results are simply never accepted.

use tracing::trace;

/// Generation token identifying one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Rebuild a token that crossed a boundary (FFI, worker thread) as a raw integer.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestGuard {
    generation: u64,
    pending: Option<RequestId>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new authoritative request, superseding any previous one.
    pub fn issue(&mut self) -> RequestId {
        self.generation += 1;
        let id = RequestId(self.generation);
        trace!(generation = self.generation, "request issued");
        self.pending = Some(id);
        id
    }

    /// Whether a completion tagged `id` may be applied.
    ///
    /// The pending id stays recorded after acceptance; only `issue` or `clear`
    /// retire it.
    pub fn accept(&self, id: RequestId) -> bool {
        let accepted = self.pending == Some(id);
        if !accepted {
            trace!(
                stale = id.0,
                pending = ?self.pending.map(|p| p.0),
                "request completion discarded"
            );
        }
        accepted
    }

    /// Forget the pending request so no in-flight completion can be applied.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_supersedes_previous() {
        let mut guard = RequestGuard::new();
        let first = guard.issue();
        let second = guard.issue();
        assert_ne!(first, second);
        assert!(!guard.accept(first));
        assert!(guard.accept(second));
    }

    #[test]
    fn accept_keeps_pending_until_next_issue() {
        let mut guard = RequestGuard::new();
        let id = guard.issue();
        assert!(guard.accept(id));
        assert!(guard.accept(id));
        assert_eq!(guard.pending(), Some(id));
    }

    #[test]
    fn clear_makes_everything_stale() {
        let mut guard = RequestGuard::new();
        let id = guard.issue();
        guard.clear();
        assert!(!guard.is_pending());
        assert!(!guard.accept(id));
    }

    #[test]
    fn generations_never_repeat_after_clear() {
        let mut guard = RequestGuard::new();
        let first = guard.issue();
        guard.clear();
        let second = guard.issue();
        assert!(second > first);
        assert!(!guard.accept(first));
    }

    #[test]
    fn raw_round_trip_matches() {
        let mut guard = RequestGuard::new();
        let id = guard.issue();
        assert!(guard.accept(RequestId::from_raw(id.as_raw())));
        assert!(!guard.accept(RequestId::from_raw(id.as_raw() + 1)));
    }
}
