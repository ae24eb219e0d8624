//! Stateful sessions driven by a front end.
//!
//! Each session suspends on its own store or scheduler calls and never
//! blocks another session. Responses that arrive after a session was closed
//! or restarted are dropped, guarded by a generation counter.

mod reading;
mod review;
mod selection;

pub use reading::ReadingView;
pub use review::{ReviewSession, ReviewState};
pub use selection::Selection;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Generation observed when a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct LifecycleInner {
    generation: AtomicU64,
    closed: AtomicBool,
}

/// Cloneable teardown handle shared between a session and its front end.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    inner: Arc<LifecycleInner>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current generation before awaiting a response.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.inner.generation.load(Ordering::Acquire))
    }

    /// Whether a response issued under `ticket` may still be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.is_closed() && self.inner.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Drop every response still in flight.
    pub fn invalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Tear the session down. In-flight responses are dropped.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.invalidate();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_is_current_until_invalidated() {
        let lifecycle = Lifecycle::new();
        let ticket = lifecycle.ticket();
        assert!(lifecycle.is_current(ticket));

        lifecycle.invalidate();
        assert!(!lifecycle.is_current(ticket));
        assert!(lifecycle.is_current(lifecycle.ticket()));
    }

    #[test]
    fn close_is_visible_through_clones() {
        let lifecycle = Lifecycle::new();
        let handle = lifecycle.clone();
        let ticket = lifecycle.ticket();

        handle.close();

        assert!(lifecycle.is_closed());
        assert!(!lifecycle.is_current(ticket));
        assert!(!lifecycle.is_current(lifecycle.ticket()));
    }
}
