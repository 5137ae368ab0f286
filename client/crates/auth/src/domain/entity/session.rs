//! Session Entity
//!
//! A live, time-bounded authentication grant. At most one exists per
//! client, owned by the session manager.

use std::fmt;

use crate::domain::entity::identity::Identity;
use kernel::id::IdentityId;

/// Session entity
#[derive(Clone, PartialEq)]
pub struct Session {
    /// Bearer token for authenticated remote calls
    pub access_token: String,
    /// Token exchanged for a fresh pair on expiry
    pub refresh_token: String,
    /// Access-token expiry (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Identity snapshot taken when the session was granted
    pub identity: Identity,
}

impl Session {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_at_ms: i64,
        identity: Identity,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at_ms,
            identity,
        }
    }

    /// Check if the access token has expired at the given instant
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Check if the session should be refreshed, given a leeway window
    ///
    /// Refreshing slightly early keeps a request started just before
    /// expiry from racing the deadline.
    pub fn needs_refresh_at(&self, now_ms: i64, leeway_ms: i64) -> bool {
        now_ms + leeway_ms >= self.expires_at_ms
    }

    pub fn identity_id(&self) -> IdentityId {
        self.identity.identity_id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .field("identity_id", &self.identity.identity_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, metadata::IdentityMetadata};
    use chrono::Utc;
    use kernel::id::Id;

    fn identity() -> Identity {
        let now = Utc::now();
        Identity {
            identity_id: Id::new(),
            email: Email::new("traveler@example.com").unwrap(),
            email_verified: true,
            metadata: IdentityMetadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_expiry() {
        let session = Session::new("at".into(), "rt".into(), 10_000, identity());

        assert!(!session.is_expired_at(9_999));
        assert!(session.is_expired_at(10_000));
    }

    #[test]
    fn test_needs_refresh_with_leeway() {
        let session = Session::new("at".into(), "rt".into(), 10_000, identity());

        assert!(!session.needs_refresh_at(5_000, 1_000));
        assert!(session.needs_refresh_at(9_500, 1_000));
        assert!(session.needs_refresh_at(11_000, 0));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let session = Session::new(
            "secret-access".into(),
            "secret-refresh".into(),
            10_000,
            identity(),
        );
        let debug = format!("{:?}", session);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
