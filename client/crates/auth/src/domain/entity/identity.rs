//! Identity Entity
//!
//! Snapshot of the remote identity-provider user record. The remote
//! service owns this data; the client only reads it and patches
//! metadata. Identities are never deleted by this subsystem.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, metadata::IdentityMetadata};
use kernel::id::IdentityId;

/// Identity entity
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Opaque stable identifier assigned by the identity provider
    pub identity_id: IdentityId,
    /// Login email
    pub email: Email,
    /// Whether ownership of the email has been proven
    pub email_verified: bool,
    /// Arbitrary metadata map (onboarding flag, display name, avatar)
    pub metadata: IdentityMetadata,
    /// Created timestamp (remote)
    pub created_at: DateTime<Utc>,
    /// Updated timestamp (remote)
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Authoritative onboarding flag from metadata
    pub fn has_completed_onboarding(&self) -> bool {
        self.metadata.has_completed_onboarding()
    }

    /// Display name from metadata, if set
    pub fn display_name(&self) -> Option<&str> {
        self.metadata.display_name()
    }
}
