//! Secondary keyboard listener
//!
//! A best-effort, non-privileged listener that widens keystroke coverage:
//! composed input (dead keys, input methods) can reach the display server
//! without a matching discrete key event on the grab path. It only observes,
//! never modifies, and runs on its own delivery thread, so it may record
//! activity concurrently with the grab callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rdev::{listen, Event, EventType};
use tracing::{debug, error, info};

use crate::activity::ActivityClock;

/// Abstraction over the secondary listener for lifecycle tests.
pub trait KeyboardObserver: Send + Sync {
    /// Start feeding keyboard activity into the clock. Best-effort: a
    /// listener failure is logged, never reported.
    fn register(&self);

    /// Stop feeding activity. Events keep flowing; they are just ignored.
    fn unregister(&self);
}

struct ObserverShared {
    clock: Arc<ActivityClock>,
    engaged: AtomicBool,
}

/// The real listener, backed by rdev's listen loop.
pub struct ListenObserver {
    shared: Arc<ObserverShared>,
    spawned: AtomicBool,
}

impl ListenObserver {
    pub fn new(clock: Arc<ActivityClock>) -> Self {
        Self {
            shared: Arc::new(ObserverShared {
                clock,
                engaged: AtomicBool::new(false),
            }),
            spawned: AtomicBool::new(false),
        }
    }

    fn spawn_listen_loop(&self) {
        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("key-observer".into())
            .spawn(move || {
                info!("Keyboard observer thread started");

                let callback = move |event: Event| {
                    if !shared.engaged.load(Ordering::SeqCst) {
                        return;
                    }
                    if let EventType::KeyPress(_) | EventType::KeyRelease(_) = event.event_type {
                        shared.clock.record_activity();
                    }
                };

                if let Err(e) = listen(callback) {
                    error!("Error in keyboard observer: {:?}", e);
                }
            });

        if let Err(e) = spawned {
            error!("Failed to spawn keyboard observer: {}", e);
        }
    }
}

impl KeyboardObserver for ListenObserver {
    fn register(&self) {
        if !self.spawned.swap(true, Ordering::SeqCst) {
            self.spawn_listen_loop();
        }
        self.shared.engaged.store(true, Ordering::SeqCst);
        debug!("Keyboard observer registered");
    }

    fn unregister(&self) {
        self.shared.engaged.store(false, Ordering::SeqCst);
        debug!("Keyboard observer unregistered");
    }
}
