//! Privileged event tap
//!
//! Owns the global grab registration: every input event in the system is
//! delivered to the grab callback before any application sees it, and the
//! callback either forwards it or discards it based on the engine's decision.
//! Grabbing requires read access to the evdev devices and write access to
//! uinput, which the OS only grants to the `input` group.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rdev::{grab, Event};
use tracing::{debug, error, info};

use crate::engine::{Decision, SuppressionEngine};
use crate::TapGuardError;

/// Delay before re-arming the grab after the OS tears it down
const REARM_DELAY: Duration = Duration::from_millis(250);

/// Abstraction over the OS hook so the lifecycle can be driven in tests
/// without touching real input devices.
pub trait HookDriver: Send + Sync {
    /// Acquire the hook and enable event delivery.
    ///
    /// Fails with [`TapGuardError::PermissionDenied`] when input access has
    /// not been granted; the caller reports it and does not retry.
    fn attach(&self) -> Result<(), TapGuardError>;

    /// Disable the hook. Events flow past it untouched afterwards.
    fn detach(&self);

    /// Whether the hook is currently making decisions
    fn is_attached(&self) -> bool;
}

/// Synchronous check for input-device access, for the permission prompt in
/// the UI. Grabbing needs to read the event devices and write to uinput.
pub fn is_input_access_granted() -> bool {
    event_device_readable("/dev/input") && uinput_writable("/dev/uinput")
}

fn event_device_readable(dir: impl AsRef<Path>) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.flatten() {
        let is_event_node = entry
            .file_name()
            .to_string_lossy()
            .starts_with("event");
        if is_event_node && fs::File::open(entry.path()).is_ok() {
            return true;
        }
    }
    false
}

fn uinput_writable(path: impl AsRef<Path>) -> bool {
    OpenOptions::new().write(true).open(path).is_ok()
}

struct TapShared {
    engine: Arc<SuppressionEngine>,
    engaged: AtomicBool,
}

/// The real event tap, backed by rdev's grab loop.
///
/// The grab loop runs on a dedicated thread and consults the shared engine
/// for every event. Detaching flips the callback into a transparent state
/// rather than tearing the loop down, so a later attach re-arms instantly;
/// there is exactly one grab registration per process either way.
pub struct GrabTap {
    shared: Arc<TapShared>,
    spawned: AtomicBool,
}

impl GrabTap {
    pub fn new(engine: Arc<SuppressionEngine>) -> Self {
        Self {
            shared: Arc::new(TapShared {
                engine,
                engaged: AtomicBool::new(false),
            }),
            spawned: AtomicBool::new(false),
        }
    }

    fn spawn_grab_loop(&self) -> Result<(), TapGuardError> {
        let shared = self.shared.clone();
        thread::Builder::new()
            .name("event-tap".into())
            .spawn(move || {
                info!("Event tap thread started");
                loop {
                    let cb_shared = shared.clone();
                    let callback = move |event: Event| -> Option<Event> {
                        if !cb_shared.engaged.load(Ordering::SeqCst) {
                            return Some(event);
                        }
                        match cb_shared.engine.handle(&event.event_type) {
                            Decision::PassThrough => Some(event),
                            Decision::Drop => None,
                        }
                    };

                    if let Err(e) = grab(callback) {
                        error!("Event grab failed: {:?}", e);
                    }

                    // grab only returns when the OS has torn the tap down;
                    // without a re-arm the feature would silently go inert
                    shared.engine.on_hook_disabled();
                    thread::sleep(REARM_DELAY);
                }
            })
            .map_err(|e| TapGuardError::HookInstall(e.to_string()))?;
        Ok(())
    }
}

impl HookDriver for GrabTap {
    fn attach(&self) -> Result<(), TapGuardError> {
        if self.shared.engaged.load(Ordering::SeqCst) {
            debug!("Event tap already attached");
            return Ok(());
        }
        if !is_input_access_granted() {
            return Err(TapGuardError::PermissionDenied);
        }
        if !self.spawned.swap(true, Ordering::SeqCst) {
            if let Err(e) = self.spawn_grab_loop() {
                self.spawned.store(false, Ordering::SeqCst);
                return Err(e);
            }
        }
        self.shared.engaged.store(true, Ordering::SeqCst);
        info!("Event tap attached");
        Ok(())
    }

    fn detach(&self) {
        self.shared.engaged.store(false, Ordering::SeqCst);
        info!("Event tap detached");
    }

    fn is_attached(&self) -> bool {
        self.shared.engaged.load(Ordering::SeqCst)
    }
}
