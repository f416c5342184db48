//! TapGuard - Touchpad suppression while typing
//!
//! Intercepts pointer events system-wide and discards them for a short
//! window after each keystroke, so a brushed touchpad cannot move the
//! cursor or click while typing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tapguard::{
    ActivityClock, Config, GrabTap, ListenObserver, Monitor, SuppressionEngine,
    SuppressionWindow, TapGuardError,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), TapGuardError> {
    // Load configuration; the window setting is persisted externally
    let stored_window = std::env::var("TAPGUARD_WINDOW_MS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok());
    let config = Config::from_stored_window(stored_window);

    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .compact()
        .init();

    info!("TapGuard starting...");
    info!("Config: window={}ms", config.suppression_window_ms);

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        info!("Shutdown signal received");
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Failed to set Ctrl+C handler");

    // Wire up the shared state and the decision engine
    let clock = Arc::new(ActivityClock::new());
    let window = Arc::new(SuppressionWindow::from_stored(
        config.suppression_window_ms as i64,
    ));
    let engine = Arc::new(SuppressionEngine::new(clock.clone(), window.clone()));

    let monitor = Monitor::new(
        Box::new(GrabTap::new(engine.clone())),
        Box::new(ListenObserver::new(clock)),
        window,
    );

    match monitor.start_monitoring() {
        Ok(()) => {}
        Err(TapGuardError::PermissionDenied) => {
            error!("Permission denied. Please add your user to the 'input' group:");
            error!("  sudo usermod -aG input $USER");
            error!("Then logout and login again.");
            return Err(TapGuardError::PermissionDenied);
        }
        Err(e) => return Err(e),
    }

    info!("Suppressing touchpad input while typing - press Ctrl+C to exit");

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    info!("TapGuard shutting down...");
    monitor.stop_monitoring();

    if engine.hook_disable_count() > 0 {
        info!(
            "Event tap was re-armed {} time(s) after forced disables",
            engine.hook_disable_count()
        );
    }

    Ok(())
}
