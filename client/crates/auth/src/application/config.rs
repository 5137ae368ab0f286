//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Refresh the session this long before the access token expires
    pub refresh_leeway: Duration,
    /// Local-storage key for the fast-path onboarding hint
    pub onboarding_flag_key: String,
    /// Run read-time onboarding repair as part of login
    pub reconcile_on_login: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_leeway: Duration::from_secs(30),
            onboarding_flag_key: "has_completed_initial_flow".to_string(),
            reconcile_on_login: true,
        }
    }
}

impl AuthConfig {
    /// Get refresh leeway in milliseconds
    pub fn refresh_leeway_ms(&self) -> i64 {
        self.refresh_leeway.as_millis() as i64
    }
}
