//! Profile Entity
//!
//! Relational record keyed 1:1 by identity id, mirroring a subset of
//! Identity data plus app-specific personal fields. Its existence is
//! only eventually consistent with the Identity: the write can fail
//! independently of account creation, and the reconciler repairs the
//! gap at read time.

use chrono::{DateTime, Utc};

use kernel::id::IdentityId;

/// Profile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub identity_id: IdentityId,
    /// Mirrors Identity email
    pub email: String,
    /// Mirrors Identity verified flag
    pub email_verified: bool,
    /// Replicated onboarding flag (identity metadata is authoritative)
    pub has_completed_onboarding: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// IATA code of the usual departure airport
    pub home_airport: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a bare profile for a new identity
    pub fn new(identity_id: IdentityId, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            identity_id,
            email: email.into(),
            email_verified: false,
            has_completed_onboarding: false,
            first_name: None,
            last_name: None,
            home_airport: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(verified) = patch.email_verified {
            self.email_verified = verified;
        }
        if let Some(complete) = patch.has_completed_onboarding {
            self.has_completed_onboarding = complete;
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(home_airport) = &patch.home_airport {
            self.home_airport = Some(home_airport.clone());
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for a profile; `None` fields are left untouched
///
/// Also serves as the draft the signup flow collects before a profile
/// row exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub has_completed_onboarding: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub home_airport: Option<String>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    /// Patch containing only the onboarding flag
    pub fn onboarding(complete: bool) -> Self {
        Self {
            has_completed_onboarding: Some(complete),
            ..Self::default()
        }
    }

    /// Overlay another patch; its set fields win
    pub fn merge(&mut self, other: ProfilePatch) {
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.email_verified.is_some() {
            self.email_verified = other.email_verified;
        }
        if other.has_completed_onboarding.is_some() {
            self.has_completed_onboarding = other.has_completed_onboarding;
        }
        if other.first_name.is_some() {
            self.first_name = other.first_name;
        }
        if other.last_name.is_some() {
            self.last_name = other.last_name;
        }
        if other.home_airport.is_some() {
            self.home_airport = other.home_airport;
        }
        if other.bio.is_some() {
            self.bio = other.bio;
        }
    }

    /// Display name derived from the name fields, if any
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    #[test]
    fn test_new_profile_defaults() {
        let profile = Profile::new(Id::new(), "traveler@example.com");
        assert_eq!(profile.email, "traveler@example.com");
        assert!(!profile.email_verified);
        assert!(!profile.has_completed_onboarding);
        assert!(profile.first_name.is_none());
    }

    #[test]
    fn test_apply_patch() {
        let mut profile = Profile::new(Id::new(), "traveler@example.com");
        profile.apply(&ProfilePatch {
            first_name: Some("Aki".into()),
            home_airport: Some("HND".into()),
            has_completed_onboarding: Some(true),
            ..ProfilePatch::default()
        });

        assert_eq!(profile.first_name.as_deref(), Some("Aki"));
        assert_eq!(profile.home_airport.as_deref(), Some("HND"));
        assert!(profile.has_completed_onboarding);
        // Untouched fields survive
        assert_eq!(profile.email, "traveler@example.com");
    }

    #[test]
    fn test_merge_later_fields_win() {
        let mut draft = ProfilePatch {
            first_name: Some("Aki".into()),
            home_airport: Some("HND".into()),
            ..ProfilePatch::default()
        };
        draft.merge(ProfilePatch {
            first_name: Some("Akira".into()),
            bio: Some("Weekend hiker".into()),
            ..ProfilePatch::default()
        });

        assert_eq!(draft.first_name.as_deref(), Some("Akira"));
        assert_eq!(draft.home_airport.as_deref(), Some("HND"));
        assert_eq!(draft.bio.as_deref(), Some("Weekend hiker"));
    }

    #[test]
    fn test_display_name() {
        let patch = ProfilePatch {
            first_name: Some("Aki".into()),
            last_name: Some("Tanaka".into()),
            ..ProfilePatch::default()
        };
        assert_eq!(patch.display_name().as_deref(), Some("Aki Tanaka"));

        let patch = ProfilePatch {
            first_name: Some("Aki".into()),
            ..ProfilePatch::default()
        };
        assert_eq!(patch.display_name().as_deref(), Some("Aki"));

        assert_eq!(ProfilePatch::default().display_name(), None);
    }

    #[test]
    fn test_onboarding_patch_is_minimal() {
        let patch = ProfilePatch::onboarding(true);
        assert_eq!(patch.has_completed_onboarding, Some(true));
        assert!(patch.email.is_none());
        assert!(!patch.is_empty());
    }
}
