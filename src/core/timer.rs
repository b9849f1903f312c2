//! One-shot deadlines driven by the UI tick
//!
//! A `Deadline` stands in for a single scheduled callback. Arming it again
//! replaces the pending one, and it fires at most once per arming.

use std::time::{Duration, Instant};

/// A cancellable, single-shot scheduled callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    /// An unarmed deadline
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Schedule the deadline `after` from `now`, superseding any pending one
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.due = Some(now + after);
    }

    /// Cancel the pending deadline, if any
    pub fn disarm(&mut self) {
        self.due = None;
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Consume the deadline if it has elapsed at `now`.
    ///
    /// Returns `true` exactly once per arming.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
