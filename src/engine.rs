//! Per-event suppression decisions
//!
//! The engine is the pure half of the interceptor: it classifies an event,
//! consults the activity clock and the suppression window, and answers
//! pass-through or drop. It has no OS hook of its own, so the whole decision
//! path can be exercised with synthetic events and synthetic times.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rdev::EventType;
use tracing::{trace, warn};

use crate::activity::ActivityClock;
use crate::policy::{should_suppress, SuppressionWindow};

/// Coarse classification of an intercepted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Physical key press or release
    Keyboard,
    /// Movement, clicks, drags, scroll
    Pointer,
    /// Anything the engine does not understand; always passed through
    Other,
}

/// What the grab callback should do with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Let the event continue to the rest of the system
    PassThrough,
    /// Discard the event; no other process sees it
    Drop,
}

/// Classify an event into keyboard, pointer-class, or other.
pub fn classify(event: &EventType) -> EventClass {
    match event {
        EventType::KeyPress(_) | EventType::KeyRelease(_) => EventClass::Keyboard,
        EventType::ButtonPress(_)
        | EventType::ButtonRelease(_)
        | EventType::MouseMove { .. }
        | EventType::Wheel { .. } => EventClass::Pointer,
    }
}

/// Decision engine consulted by the grab callback for every event.
pub struct SuppressionEngine {
    clock: Arc<ActivityClock>,
    window: Arc<SuppressionWindow>,
    disable_recoveries: AtomicU64,
}

impl SuppressionEngine {
    pub fn new(clock: Arc<ActivityClock>, window: Arc<SuppressionWindow>) -> Self {
        Self {
            clock,
            window,
            disable_recoveries: AtomicU64::new(0),
        }
    }

    /// Decide what to do with an intercepted event.
    ///
    /// Keyboard events update the activity clock and always pass through.
    /// Pointer-class events are dropped while strictly inside the suppression
    /// window. Everything else passes through: an unknown event must never be
    /// swallowed, or a stuck window could make the pointer unusable.
    pub fn handle(&self, event: &EventType) -> Decision {
        self.handle_at(event, Instant::now())
    }

    pub(crate) fn handle_at(&self, event: &EventType, now: Instant) -> Decision {
        match classify(event) {
            EventClass::Keyboard => {
                self.clock.record_at(now);
                Decision::PassThrough
            }
            EventClass::Pointer => {
                // Both values are re-read on every event so a keystroke or a
                // window change takes effect on the very next decision
                let elapsed = self.clock.elapsed_at(now);
                if should_suppress(elapsed, self.window.duration()) {
                    trace!(?elapsed, "suppressing pointer event");
                    Decision::Drop
                } else {
                    Decision::PassThrough
                }
            }
            EventClass::Other => Decision::PassThrough,
        }
    }

    /// Called when the OS revokes the tap because a callback overran its
    /// deadline. The driver re-arms the tap; this only records that it
    /// happened.
    pub fn on_hook_disabled(&self) {
        self.disable_recoveries.fetch_add(1, Ordering::SeqCst);
        warn!("event tap disabled by the OS, re-arming");
    }

    /// Number of forced-disable recoveries since startup, for diagnostics
    pub fn hook_disable_count(&self) -> u64 {
        self.disable_recoveries.load(Ordering::SeqCst)
    }
}
