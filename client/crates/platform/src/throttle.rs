//! Issue Throttling
//!
//! Sliding-window throttle for client-initiated resend flows.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Throttle configuration
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl ThrottleConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// In-memory sliding-window throttle keyed by caller-chosen strings
#[derive(Debug, Default)]
pub struct IssueThrottle {
    hits: Mutex<HashMap<String, Vec<i64>>>,
}

impl IssueThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request at `now_ms` and report whether it is allowed
    ///
    /// Disallowed requests are not recorded, so a burst cannot extend
    /// its own lockout.
    pub fn check_and_record(&self, key: &str, config: &ThrottleConfig, now_ms: i64) -> bool {
        let mut hits = self.hits.lock().expect("throttle poisoned");
        let window_start = now_ms - config.window_ms();

        let entry = hits.entry(key.to_string()).or_default();
        entry.retain(|&t| t > window_start);

        if entry.len() >= config.max_requests as usize {
            return false;
        }

        entry.push(now_ms);
        true
    }
}
