// Application state module
// Manages runtime state shared across requests

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use super::types::Config;

/// Application state
///
/// Owns everything a handler may touch: the immutable configuration, the
/// request counter behind `/incremental`, and cached config values for fast
/// access without locks.
pub struct AppState {
    pub config: Config,

    /// Counter exposed via `GET /incremental`. Starts at 0, never resets.
    pub counter: AtomicI64,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Self {
            config: config.clone(),
            counter: AtomicI64::new(0),
            cached_access_log,
        }
    }

    /// Increment the shared counter and return the new value
    pub fn next_count(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should load");
        AppState::new(&cfg)
    }

    #[test]
    fn test_counter_starts_at_zero() {
        let state = test_state();
        assert_eq!(state.counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sequential_increments() {
        let state = test_state();
        for expected in 1..=5 {
            assert_eq!(state.next_count(), expected);
        }
    }
}
