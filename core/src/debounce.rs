//! Last-write-wins debouncing against a caller-supplied clock
//!
//! The clock is a monotonic `Duration` since session start. Native callers
//! pass `Instant::elapsed`, the browser passes `performance.now()`; no timer
//! is owned here, so the same code runs in wasm and in tests.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire `delay` after `now`, replacing anything pending.
    pub fn schedule(&mut self, now: Duration, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_after_delay() {
        let mut debouncer = Debouncer::from_millis(150);
        debouncer.schedule(ms(0), "a");
        assert_eq!(debouncer.poll(ms(149)), None);
        assert_eq!(debouncer.poll(ms(150)), Some("a"));
        assert_eq!(debouncer.poll(ms(400)), None);
    }

    #[test]
    fn reschedule_replaces_pending() {
        let mut debouncer = Debouncer::from_millis(150);
        debouncer.schedule(ms(0), "c");
        debouncer.schedule(ms(100), "ci");
        debouncer.schedule(ms(200), "cit");
        assert_eq!(debouncer.poll(ms(300)), None);
        assert_eq!(debouncer.deadline(), Some(ms(350)));
        assert_eq!(debouncer.poll(ms(350)), Some("cit"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending() {
        let mut debouncer = Debouncer::from_millis(250);
        debouncer.schedule(ms(0), 1);
        debouncer.cancel();
        assert_eq!(debouncer.poll(ms(1000)), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
