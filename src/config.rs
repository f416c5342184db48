//! Configuration management for TapGuard

use crate::policy::DEFAULT_WINDOW_MS;

/// Configuration for the suppressor
#[derive(Debug, Clone)]
pub struct Config {
    /// How long after a keystroke pointer events are suppressed, in milliseconds
    pub suppression_window_ms: u64,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suppression_window_ms: DEFAULT_WINDOW_MS,
            verbose: false,
        }
    }
}

impl Config {
    /// Create a Config from an externally stored window setting.
    ///
    /// Settings storage is owned by the caller; a missing or non-positive
    /// value yields the default window.
    pub fn from_stored_window(millis: Option<i64>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = millis {
            if ms > 0 {
                config.suppression_window_ms = ms as u64;
            }
        }
        config
    }

    /// Create a new Config with a custom suppression window
    pub fn with_window_ms(mut self, millis: u64) -> Self {
        self.suppression_window_ms = millis;
        self
    }

    /// Enable verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_window_falls_back_to_default() {
        assert_eq!(
            Config::from_stored_window(None).suppression_window_ms,
            DEFAULT_WINDOW_MS
        );
        assert_eq!(
            Config::from_stored_window(Some(0)).suppression_window_ms,
            DEFAULT_WINDOW_MS
        );
        assert_eq!(
            Config::from_stored_window(Some(-250)).suppression_window_ms,
            DEFAULT_WINDOW_MS
        );
        assert_eq!(
            Config::from_stored_window(Some(350)).suppression_window_ms,
            350
        );
    }
}
