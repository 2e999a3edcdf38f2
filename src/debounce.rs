use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    due_at: Instant,
    payload: T,
}

/// Collapses a burst of triggers into one delayed delivery carrying the
/// payload of the last trigger.
///
/// The debouncer owns no thread or timer. The owning event loop polls it
/// with the current instant and uses [`Debouncer::poll_timeout`] to bound
/// how long it may block.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Cancels whatever is pending and schedules `payload` for `now + delay`.
    pub fn trigger(&mut self, payload: T, now: Instant) {
        self.pending = Some(Pending {
            due_at: now + self.delay,
            payload,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hands out the pending payload once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.due_at > now {
            return None;
        }
        self.pending.take().map(|pending| pending.payload)
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        match &self.pending {
            Some(pending) => pending
                .due_at
                .saturating_duration_since(now)
                .min(default_timeout),
            None => default_timeout,
        }
    }
}
