//! Suppression timing policy
//!
//! A pointer event is dropped while it falls strictly inside the suppression
//! window after the last keystroke. The window is shared between the grab
//! callback and the UI thread, so it lives in an atomic: a reader may see a
//! value that is stale by one update, but never a torn one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::TapGuardError;

/// Default suppression window when no setting is stored
pub const DEFAULT_WINDOW_MS: u64 = 500;

/// Decide whether a pointer event should be suppressed.
///
/// Suppression applies only while the elapsed time since the last keystroke
/// is strictly inside the window; an event exactly on the boundary passes
/// through. `Duration::MAX` (no activity ever) therefore never suppresses.
pub fn should_suppress(elapsed: Duration, window: Duration) -> bool {
    elapsed < window
}

/// Suppression window in whole milliseconds, shared across threads.
pub struct SuppressionWindow {
    millis: AtomicU64,
}

impl SuppressionWindow {
    /// Create a window from a stored setting, in milliseconds.
    ///
    /// External storage is untrusted: anything non-positive falls back to the
    /// default.
    pub fn from_stored(millis: i64) -> Self {
        let millis = if millis > 0 {
            millis as u64
        } else {
            DEFAULT_WINDOW_MS
        };
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Update the window from user input, in milliseconds.
    ///
    /// Non-positive values are rejected and the current window is kept.
    pub fn set_millis(&self, millis: i64) -> Result<(), TapGuardError> {
        if millis <= 0 {
            return Err(TapGuardError::InvalidWindow(millis));
        }
        self.millis.store(millis as u64, Ordering::SeqCst);
        Ok(())
    }

    /// Current window in milliseconds
    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }

    /// Current window as a duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.millis())
    }
}

impl Default for SuppressionWindow {
    fn default() -> Self {
        Self {
            millis: AtomicU64::new(DEFAULT_WINDOW_MS),
        }
    }
}
