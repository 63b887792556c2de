//! Time and identity collaborators
//!
//! Sections and questions are keyed by millisecond-derived ids. Both the
//! clock and the id source are injected so edits stay deterministic under
//! test.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Wall-clock source in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// Real clock backed by chrono
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Source of fresh, strictly increasing identities
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Timestamp-seeded ids: `max(now, last + 1)`
///
/// Two siblings created within the same millisecond still get distinct
/// ids, and ids never go backwards if the wall clock does.
pub struct ClockIds<C: Clock> {
    clock: C,
    last: AtomicU64,
}

impl<C: Clock> ClockIds<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }
}

impl Default for ClockIds<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> IdGenerator for ClockIds<C> {
    fn next_id(&self) -> u64 {
        let now = self.clock.now_millis().max(0) as u64;
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Plain counter, handy for fixtures
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ids_unique_within_same_millisecond() {
        let ids = ClockIds::new(ManualClock::new(1_000));

        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();

        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
        assert_eq!(c, 1_002);
    }

    #[test]
    fn test_clock_ids_follow_clock_forward() {
        let clock = ManualClock::new(5_000);
        let ids = ClockIds::new(clock);
        assert_eq!(ids.next_id(), 5_000);

        ids.clock.advance(100);
        assert_eq!(ids.next_id(), 5_100);
    }

    #[test]
    fn test_clock_ids_never_go_backwards() {
        let ids = ClockIds::new(ManualClock::new(9_000));
        assert_eq!(ids.next_id(), 9_000);

        ids.clock.set(10);
        assert_eq!(ids.next_id(), 9_001);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new(7);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(ids.next_id(), 8);
    }
}
