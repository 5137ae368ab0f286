//! Domain Entities
//!
//! Core business entities for the verification-code domain.

use std::fmt;
use uuid::Uuid;

use crate::domain::services::code_matches;
use crate::domain::value_objects::CodePurpose;

/// IssuedCode entity - a single-use code bound to an (email, purpose) pair
#[derive(Clone)]
pub struct IssuedCode {
    pub id: Uuid,
    pub email: String,
    pub purpose: CodePurpose,
    code: String,
    pub expires_at_ms: i64,
    pub created_at_ms: i64,
    pub consumed: bool,
}

impl IssuedCode {
    /// Create a new issued code
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(
        email: impl Into<String>,
        purpose: CodePurpose,
        code: String,
        ttl_ms: i64,
        now_ms: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            purpose,
            code,
            expires_at_ms: now_ms + ttl_ms,
            created_at_ms: now_ms,
            consumed: false,
        }
    }

    /// Check if the code has expired at the given instant
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    /// Constant-time comparison against a submitted candidate
    pub fn matches(&self, candidate: &str) -> bool {
        code_matches(&self.code, candidate)
    }

    /// Mark the code as used; further matches must be rejected as reuse
    pub fn mark_consumed(&mut self) {
        self.consumed = true;
    }

    /// Access the code value for delivery only
    pub(crate) fn value(&self) -> &str {
        &self.code
    }
}

impl fmt::Debug for IssuedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCode")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("purpose", &self.purpose)
            .field("code", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .field("consumed", &self.consumed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_expiry() {
        let code = IssuedCode::new("a@b.com", CodePurpose::Signup, "482913".into(), 600_000, 0);

        assert_eq!(code.expires_at_ms, 600_000);
        assert!(!code.is_expired_at(600_000));
        assert!(code.is_expired_at(600_001));
    }

    #[test]
    fn test_code_matches() {
        let code = IssuedCode::new("a@b.com", CodePurpose::Signup, "482913".into(), 600_000, 0);

        assert!(code.matches("482913"));
        assert!(!code.matches("482914"));
        assert!(!code.matches("48291"));
    }

    #[test]
    fn test_mark_consumed() {
        let mut code =
            IssuedCode::new("a@b.com", CodePurpose::Signup, "482913".into(), 600_000, 0);
        assert!(!code.consumed);

        code.mark_consumed();
        assert!(code.consumed);
    }

    #[test]
    fn test_debug_redacts_value() {
        let code = IssuedCode::new("a@b.com", CodePurpose::Signup, "482913".into(), 600_000, 0);
        let debug = format!("{:?}", code);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("482913"));
    }
}
