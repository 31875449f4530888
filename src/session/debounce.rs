use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Coalesces a burst of events into one action once the burst has been
/// quiet for `window`. Holds no timer; callers supply the clock.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an event at `now`, pushing the deadline back.
    pub fn push(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// When the pending action becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per burst, at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}
