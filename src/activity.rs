//! Shared "last keystroke" timestamp
//!
//! Both the privileged grab callback and the secondary listener write this
//! value, each from its own delivery thread, while the grab callback reads it
//! for every pointer event. The grab callback runs under an OS deadline, so
//! reads and writes must never block or allocate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Sentinel for "no keyboard activity observed yet".
const NEVER: u64 = 0;

/// Timestamp of the most recent keyboard activity, safe for concurrent use.
///
/// The timestamp is stored as whole microseconds since the clock was created,
/// offset by one so that zero can mean "never". Writes use `fetch_max`, which
/// keeps the stored value monotonically non-decreasing even when the two
/// writer threads race.
pub struct ActivityClock {
    anchor: Instant,
    last: AtomicU64,
}

impl ActivityClock {
    /// Create a clock that has never observed activity
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            last: AtomicU64::new(NEVER),
        }
    }

    /// Record keyboard activity at the current instant
    pub fn record_activity(&self) {
        self.record_at(Instant::now());
    }

    /// Elapsed time since the last recorded activity
    ///
    /// Returns `Duration::MAX` when no activity has ever been recorded, so a
    /// fresh clock never triggers suppression.
    pub fn time_since_activity(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub(crate) fn record_at(&self, now: Instant) {
        self.last.fetch_max(self.stamp(now), Ordering::SeqCst);
    }

    pub(crate) fn elapsed_at(&self, now: Instant) -> Duration {
        match self.last.load(Ordering::SeqCst) {
            NEVER => Duration::MAX,
            stamp => Duration::from_micros(self.stamp(now).saturating_sub(stamp)),
        }
    }

    fn stamp(&self, at: Instant) -> u64 {
        // +1 keeps a write in the clock's first microsecond distinct from NEVER
        at.saturating_duration_since(self.anchor).as_micros() as u64 + 1
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}
