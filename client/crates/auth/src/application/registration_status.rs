//! Registration Status Use Case
//!
//! Pure query aggregating profile existence, the replicated onboarding
//! flag, and travel-preferences existence into a routing decision. The
//! aggregation is conservative: a single missing signal keeps the user
//! out of the main dashboard.

use std::sync::Arc;

use crate::domain::repository::{ProfileStore, TravelPreferencesStore};
use crate::domain::value_object::registration_status::RegistrationStatus;
use crate::error::AuthResult;
use kernel::id::IdentityId;

/// Registration status use case
pub struct RegistrationStatusUseCase<P, T>
where
    P: ProfileStore,
    T: TravelPreferencesStore,
{
    profiles: Arc<P>,
    preferences: Arc<T>,
}

impl<P, T> RegistrationStatusUseCase<P, T>
where
    P: ProfileStore,
    T: TravelPreferencesStore,
{
    pub fn new(profiles: Arc<P>, preferences: Arc<T>) -> Self {
        Self {
            profiles,
            preferences,
        }
    }

    pub async fn execute(&self, identity_id: IdentityId) -> AuthResult<RegistrationStatus> {
        let profile = self.profiles.get_profile(identity_id).await?;
        let preferences_exist = self.preferences.preferences_exist(identity_id).await?;

        let onboarded = profile
            .as_ref()
            .is_some_and(|p| p.has_completed_onboarding);
        let status = RegistrationStatus::aggregate(profile.is_some(), onboarded, preferences_exist);

        tracing::debug!(
            identity_id = %identity_id,
            status = %status,
            profile_exists = profile.is_some(),
            onboarded,
            preferences_exist,
            "Registration status aggregated"
        );

        Ok(status)
    }
}
