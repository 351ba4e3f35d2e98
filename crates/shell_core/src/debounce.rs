//! Trailing-edge debounce on a single reusable timer slot.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<A> {
    deadline: Instant,
    args: A,
}

/// Coalesces a burst of calls into one, keeping only the latest arguments.
///
/// Every [`Debouncer::call`] replaces whatever was pending and restarts the
/// quiet period; [`Debouncer::take_due`] hands the arguments back once the
/// window has elapsed without another call.
#[derive(Debug)]
pub struct Debouncer<A> {
    window: Duration,
    pending: Option<Pending<A>>,
}

impl<A> Debouncer<A> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Returns true when an earlier pending call was superseded.
    pub fn call(&mut self, args: A, now: Instant) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            deadline: now + self.window,
            args,
        });
        superseded
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    pub fn take_due(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.pending.take().map(|p| p.args),
            _ => None,
        }
    }
}
