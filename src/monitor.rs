//! Lifecycle control
//!
//! A two-state machine (stopped/running) driving the event tap and the
//! secondary observer. The menu UI toggles it and adjusts the suppression
//! window through it; it never talks to the drivers directly.

use std::sync::Arc;

use tracing::{debug, info};

use crate::observer::KeyboardObserver;
use crate::policy::SuppressionWindow;
use crate::tap::HookDriver;
use crate::TapGuardError;

/// Owns the hook, the observer, and the shared window.
///
/// Constructed once at startup and handed to the UI by reference; the running
/// state lives in the hook attachment itself, so double starts and double
/// stops collapse into no-ops.
pub struct Monitor {
    driver: Box<dyn HookDriver>,
    observer: Box<dyn KeyboardObserver>,
    window: Arc<SuppressionWindow>,
}

impl Monitor {
    pub fn new(
        driver: Box<dyn HookDriver>,
        observer: Box<dyn KeyboardObserver>,
        window: Arc<SuppressionWindow>,
    ) -> Self {
        Self {
            driver,
            observer,
            window,
        }
    }

    /// Start suppressing: attach the tap, then register the observer.
    ///
    /// A permission failure leaves the monitor stopped and is reported to the
    /// caller; it is up to the user to grant access and start again.
    pub fn start_monitoring(&self) -> Result<(), TapGuardError> {
        if self.driver.is_attached() {
            debug!("Monitoring already running");
            return Ok(());
        }
        self.driver.attach()?;
        self.observer.register();
        info!("Monitoring started (window: {} ms)", self.window.millis());
        Ok(())
    }

    /// Stop suppressing. Completes fully; a following start sees a clean
    /// stopped state.
    pub fn stop_monitoring(&self) {
        if !self.driver.is_attached() {
            debug!("Monitoring already stopped");
            return;
        }
        self.driver.detach();
        self.observer.unregister();
        info!("Monitoring stopped");
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_attached()
    }

    /// Pause/resume entry point for the menu. Returns the new enabled state.
    pub fn toggle_enabled(&self) -> Result<bool, TapGuardError> {
        if self.is_running() {
            self.stop_monitoring();
            Ok(false)
        } else {
            self.start_monitoring()?;
            Ok(true)
        }
    }

    /// Current suppression window for display, in whole milliseconds
    pub fn suppression_window_ms(&self) -> u64 {
        self.window.millis()
    }

    /// Update the suppression window from the preferences UI.
    pub fn set_suppression_window_ms(&self, millis: i64) -> Result<(), TapGuardError> {
        self.window.set_millis(millis)?;
        info!("Suppression window set to {} ms", millis);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeDriver {
        attached: AtomicBool,
        deny_permission: AtomicBool,
        attach_calls: AtomicUsize,
        detach_calls: AtomicUsize,
    }

    impl HookDriver for Arc<FakeDriver> {
        fn attach(&self) -> Result<(), TapGuardError> {
            self.attach_calls.fetch_add(1, Ordering::SeqCst);
            if self.deny_permission.load(Ordering::SeqCst) {
                return Err(TapGuardError::PermissionDenied);
            }
            self.attached.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn detach(&self) {
            self.detach_calls.fetch_add(1, Ordering::SeqCst);
            self.attached.store(false, Ordering::SeqCst);
        }

        fn is_attached(&self) -> bool {
            self.attached.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeObserver {
        registered: AtomicBool,
    }

    impl KeyboardObserver for Arc<FakeObserver> {
        fn register(&self) {
            self.registered.store(true, Ordering::SeqCst);
        }

        fn unregister(&self) {
            self.registered.store(false, Ordering::SeqCst);
        }
    }

    fn monitor() -> (Monitor, Arc<FakeDriver>, Arc<FakeObserver>) {
        let driver = Arc::new(FakeDriver::default());
        let observer = Arc::new(FakeObserver::default());
        let monitor = Monitor::new(
            Box::new(driver.clone()),
            Box::new(observer.clone()),
            Arc::new(SuppressionWindow::default()),
        );
        (monitor, driver, observer)
    }

    #[test]
    fn start_attaches_hook_and_registers_observer() {
        let (monitor, driver, observer) = monitor();

        monitor.start_monitoring().unwrap();
        assert!(monitor.is_running());
        assert!(driver.is_attached());
        assert!(observer.registered.load(Ordering::SeqCst));
    }

    #[test]
    fn double_start_and_double_stop_are_no_ops() {
        let (monitor, driver, _) = monitor();

        monitor.start_monitoring().unwrap();
        monitor.start_monitoring().unwrap();
        assert_eq!(driver.attach_calls.load(Ordering::SeqCst), 1);

        monitor.stop_monitoring();
        monitor.stop_monitoring();
        assert_eq!(driver.detach_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn permission_denied_leaves_monitor_stopped() {
        let (monitor, driver, observer) = monitor();
        driver.deny_permission.store(true, Ordering::SeqCst);

        let result = monitor.start_monitoring();
        assert!(matches!(result, Err(TapGuardError::PermissionDenied)));
        assert!(!monitor.is_running());
        assert!(!observer.registered.load(Ordering::SeqCst));
    }

    #[test]
    fn start_after_stop_resumes() {
        let (monitor, driver, observer) = monitor();

        monitor.start_monitoring().unwrap();
        monitor.stop_monitoring();
        assert!(!monitor.is_running());
        assert!(!observer.registered.load(Ordering::SeqCst));

        monitor.start_monitoring().unwrap();
        assert!(monitor.is_running());
        assert!(observer.registered.load(Ordering::SeqCst));
        assert_eq!(driver.attach_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn toggle_flips_between_running_and_stopped() {
        let (monitor, _, _) = monitor();

        assert!(monitor.toggle_enabled().unwrap());
        assert!(monitor.is_running());
        assert!(!monitor.toggle_enabled().unwrap());
        assert!(!monitor.is_running());
    }

    #[test]
    fn window_updates_flow_through_the_monitor() {
        let (monitor, _, _) = monitor();

        assert_eq!(monitor.suppression_window_ms(), 500);
        monitor.set_suppression_window_ms(300).unwrap();
        assert_eq!(monitor.suppression_window_ms(), 300);
        assert!(monitor.set_suppression_window_ms(0).is_err());
        assert_eq!(monitor.suppression_window_ms(), 300);
    }
}
