//! Trailing-edge debounce for rapidly changing input.

use tokio::time::{Duration, Instant};

/// Holds the latest value until it has been left alone for `window`.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None }
    }

    /// Replaces any pending value and restarts the window.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the settled value once its deadline has passed.
    pub fn take_if_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drops the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_settles() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push("h");
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.push("ha");
        tokio::time::advance(Duration::from_millis(250)).await;
        // 350ms since the first push, but only 250ms since the last one
        assert_eq!(debouncer.take_if_due(Instant::now()), None);
        debouncer.push("halo");
        tokio::time::advance(Duration::from_millis(300)).await;
        assert_eq!(debouncer.take_if_due(Instant::now()), Some("halo"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_if_due(Instant::now()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push(1);
        assert!(debouncer.deadline().is_some());
        assert_eq!(debouncer.cancel(), Some(1));
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(debouncer.take_if_due(Instant::now()), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
