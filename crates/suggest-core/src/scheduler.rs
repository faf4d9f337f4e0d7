//! Clock-free coalescing primitives.
//!
//! Both take the current `Instant` from the caller, which keeps the session a
//! pure transition function and lets tests drive time explicitly.
//!
//! - `Debouncer` holds the latest value and releases it after a quiet period.
//! - `Throttle` lets one value through per interval and holds the newest
//!   suppressed one until the interval ends.

use std::time::{Duration, Instant};

/// Trailing-edge debounce: each `schedule` restarts the window with the newest value.
#[derive(Debug)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace any pending value and restart the quiet period at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.interval));
    }

    /// Release the pending value once its quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Leading and trailing-edge throttle: at most one release per interval.
///
/// A value submitted inside the window is held (newest wins) and released by
/// `fire` once the window ends, so the final value is never lost.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last: Option<Instant>,
    trailing: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            trailing: None,
        }
    }

    /// Release `value` now if the window is open, otherwise hold it for `fire`.
    pub fn submit(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.trailing = None;
            self.last = Some(now);
            Some(value)
        } else {
            self.trailing = Some(value);
            None
        }
    }

    /// Release the held value once its window has ended.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        if self.trailing.is_none() || !self.window_open(now) {
            return None;
        }
        self.last = Some(now);
        self.trailing.take()
    }

    /// When `fire` will release the held value, if one is held.
    pub fn deadline(&self) -> Option<Instant> {
        self.trailing.as_ref()?;
        self.last.map(|last| last + self.interval)
    }

    /// Forget the held value but keep the window running.
    pub fn discard(&mut self) {
        self.trailing = None;
    }

    pub fn cancel(&mut self) {
        self.last = None;
        self.trailing = None;
    }

    fn window_open(&self, now: Instant) -> bool {
        self.last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }
}
