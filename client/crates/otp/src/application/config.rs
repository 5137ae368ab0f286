//! Application Configuration
//!
//! Configuration for the verification-code application layer.

use std::time::Duration;

/// Re-export ThrottleConfig from platform
pub use platform::throttle::ThrottleConfig;

/// Verification-code application configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    pub code_length: usize,
    /// Code TTL (10 minutes)
    pub code_ttl: Duration,
    /// Caller-visible deadline for the delivery channel
    pub delivery_timeout: Duration,
    /// Issue-frequency window per (email, purpose)
    pub issue_throttle: ThrottleConfig,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl: Duration::from_secs(10 * 60), // 10 minutes
            delivery_timeout: Duration::from_secs(10),
            issue_throttle: ThrottleConfig::new(5, 300),
        }
    }
}

impl OtpConfig {
    /// Get code TTL in milliseconds
    pub fn code_ttl_ms(&self) -> i64 {
        self.code_ttl.as_millis() as i64
    }
}
