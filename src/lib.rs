//! TapGuard - Touchpad suppression while typing
//!
//! This library provides components for:
//! - Keyboard activity tracking (lock-free shared timestamp)
//! - A suppression policy (drop pointer events shortly after a keystroke)
//! - Global event interception (privileged grab that can discard events)
//! - A best-effort secondary keyboard listener
//! - Lifecycle control (start/stop, pause/resume)

pub mod activity;
pub mod config;
pub mod engine;
pub mod monitor;
pub mod observer;
pub mod policy;
pub mod tap;

pub use activity::ActivityClock;
pub use config::Config;
pub use engine::{classify, Decision, EventClass, SuppressionEngine};
pub use monitor::Monitor;
pub use observer::{KeyboardObserver, ListenObserver};
pub use policy::{should_suppress, SuppressionWindow, DEFAULT_WINDOW_MS};
pub use tap::{is_input_access_granted, GrabTap, HookDriver};

use thiserror::Error;

/// Main error type for TapGuard
#[derive(Error, Debug)]
pub enum TapGuardError {
    #[error("Permission denied - add user to 'input' group")]
    PermissionDenied,

    #[error("Failed to install event tap: {0}")]
    HookInstall(String),

    #[error("Suppression window must be positive, got {0} ms")]
    InvalidWindow(i64),
}
