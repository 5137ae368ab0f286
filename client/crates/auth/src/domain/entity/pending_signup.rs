//! Pending Signup Entity
//!
//! Transient holder for phase-1 signup data. Lives only in process
//! memory between `initiate` and `complete`; the password inside is
//! zeroized when the holder drops, and nothing here is ever persisted.

use std::fmt;

use crate::domain::entity::profile::ProfilePatch;
use crate::domain::value_object::{email::Email, password::RawPassword};
use kernel::id::SignupFlowId;

/// In-progress signup data
pub struct PendingSignup {
    /// Distinguishes this flow instance from any replacement
    pub flow_id: SignupFlowId,
    pub email: Email,
    password: RawPassword,
    /// Profile fields collected so far
    pub profile: ProfilePatch,
    pub created_at_ms: i64,
}

impl PendingSignup {
    pub fn new(email: Email, password: RawPassword, profile: ProfilePatch, now_ms: i64) -> Self {
        Self {
            flow_id: SignupFlowId::new(),
            email,
            password,
            profile,
            created_at_ms: now_ms,
        }
    }

    /// Access the held credential for account creation and auto-login
    pub fn password(&self) -> &RawPassword {
        &self.password
    }

    /// Fold later-collected profile fields into the draft
    pub fn merge_profile(&mut self, patch: ProfilePatch) {
        self.profile.merge(patch);
    }
}

impl fmt::Debug for PendingSignup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSignup")
            .field("flow_id", &self.flow_id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("created_at_ms", &self.created_at_ms)
            .finish()
    }
}
