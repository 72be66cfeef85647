//! Time sources.
//!
//! A scheduler reads "now" from exactly one clock, injected at construction,
//! and compares every due time against it.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use crate::sync::lock;

/// Absolute point on a clock's timeline.
pub trait Timestamp: Copy + Ord + Debug + Send + Sync + 'static {
    /// `self + delay`, pinned to a far-future point instead of overflowing.
    fn saturating_add(self, delay: Duration) -> Self;
}

/// Roughly a century; the fallback horizon for platform clocks that cannot
/// represent `Duration::MAX` ahead.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

impl Timestamp for Instant {
    fn saturating_add(self, delay: Duration) -> Self {
        self.checked_add(delay)
            .or_else(|| self.checked_add(FAR_FUTURE))
            .unwrap_or(self)
    }
}

impl Timestamp for SystemTime {
    fn saturating_add(self, delay: Duration) -> Self {
        self.checked_add(delay)
            .or_else(|| self.checked_add(FAR_FUTURE))
            .unwrap_or(self)
    }
}

impl Timestamp for Duration {
    fn saturating_add(self, delay: Duration) -> Self {
        Duration::saturating_add(self, delay)
    }
}

/// Provides timing information for a scheduler.
pub trait Clock: Send + Sync + 'static {
    /// Absolute timestamp produced by this clock.
    type Instant: Timestamp;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;
}

/// Monotonic clock backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Wall clock backed by [`std::time::SystemTime`].
///
/// Subject to adjustments of the system time; prefer [`MonotonicClock`]
/// unless due times come from an external calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = SystemTime;

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Virtual clock that only moves when told to.
///
/// Timestamps are offsets from a virtual epoch. Clones share the same
/// timeline, so a test can keep one clone and hand another to a scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Duration) -> Self {
        Self {
            elapsed: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, now: Duration) {
        *lock(&self.elapsed) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = lock(&self.elapsed);
        *elapsed = elapsed.saturating_add(by);
    }
}

impl Clock for ManualClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        *lock(&self.elapsed)
    }
}
