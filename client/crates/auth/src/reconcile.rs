//! Onboarding-Status Reconciler
//!
//! The onboarding flag is replicated into three stores: identity
//! metadata (authoritative), the profile record, and a local-storage
//! hint. The writes are not transactional, so the copies can diverge;
//! this component converges them. Authority order is fixed: identity
//! metadata wins, and a stale local read can never downgrade it.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::profile::ProfilePatch;
use crate::domain::repository::{IdentityGateway, ProfileStore};
use crate::domain::value_object::metadata::IdentityMetadata;
use crate::error::{AuthError, AuthResult};
use kernel::id::IdentityId;
use platform::local_store::LocalStore;

/// Onboarding-status reconciler
pub struct OnboardingReconciler<G, P>
where
    G: IdentityGateway,
    P: ProfileStore,
{
    gateway: Arc<G>,
    profiles: Arc<P>,
    local: Arc<dyn LocalStore>,
    config: Arc<AuthConfig>,
}

impl<G, P> OnboardingReconciler<G, P>
where
    G: IdentityGateway,
    P: ProfileStore,
{
    pub fn new(
        gateway: Arc<G>,
        profiles: Arc<P>,
        local: Arc<dyn LocalStore>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            gateway,
            profiles,
            local,
            config,
        }
    }

    /// Mark onboarding complete in all three stores
    ///
    /// The steps are attempted independently - a failed write never
    /// short-circuits the later ones. The operation succeeds iff the
    /// authoritative identity-metadata write succeeded; replica
    /// failures are logged and left to `reconcile` to repair.
    pub async fn mark_complete(&self, identity_id: IdentityId) -> AuthResult<()> {
        let identity_write = self
            .gateway
            .update_metadata(identity_id, &IdentityMetadata::onboarding(true))
            .await;

        let profile_write = self
            .profiles
            .upsert_profile(identity_id, &ProfilePatch::onboarding(true))
            .await;

        self.write_local_flag(true);

        if let Err(err) = &profile_write {
            AuthError::PartialWriteFailure { store: "profile" }.log();
            tracing::debug!(error = %err, identity_id = %identity_id, "Profile onboarding write failed");
        }

        match identity_write {
            Ok(_) => {
                tracing::info!(identity_id = %identity_id, "Onboarding marked complete");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    identity_id = %identity_id,
                    "Authoritative onboarding write failed"
                );
                Err(err)
            }
        }
    }

    /// Read-time repair: converge all copies on the authoritative value
    ///
    /// Safe to call repeatedly; a run that finds agreement writes
    /// nothing. Returns the converged flag.
    pub async fn reconcile(&self, identity_id: IdentityId) -> AuthResult<bool> {
        let identity = self
            .gateway
            .get_identity(identity_id)
            .await?
            .ok_or_else(|| AuthError::RemoteService("identity record missing".into()))?;
        let authoritative = identity.has_completed_onboarding();

        // Profile replica (existence itself may need repair)
        match self.profiles.get_profile(identity_id).await {
            Ok(Some(profile)) => {
                if profile.has_completed_onboarding != authoritative {
                    let patch = ProfilePatch::onboarding(authoritative);
                    if let Err(err) = self.profiles.upsert_profile(identity_id, &patch).await {
                        AuthError::PartialWriteFailure { store: "profile" }.log();
                        tracing::debug!(error = %err, "Profile repair failed");
                    } else {
                        tracing::info!(
                            identity_id = %identity_id,
                            onboarded = authoritative,
                            "Repaired profile onboarding flag"
                        );
                    }
                }
            }
            Ok(None) => {
                // The profile write lost at signup time; recreate it
                let patch = ProfilePatch {
                    email: Some(identity.email.as_str().to_string()),
                    email_verified: Some(identity.email_verified),
                    has_completed_onboarding: Some(authoritative),
                    ..ProfilePatch::default()
                };
                if let Err(err) = self.profiles.upsert_profile(identity_id, &patch).await {
                    AuthError::PartialWriteFailure { store: "profile" }.log();
                    tracing::debug!(error = %err, "Missing-profile repair failed");
                } else {
                    tracing::info!(identity_id = %identity_id, "Recreated missing profile");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not read profile during reconcile");
            }
        }

        // Local hint
        if self.read_local_flag() != authoritative {
            self.write_local_flag(authoritative);
            tracing::debug!(onboarded = authoritative, "Repaired local onboarding hint");
        }

        Ok(authoritative)
    }

    /// Fast-path hint from local storage
    ///
    /// Never authoritative; use for optimistic routing only and confirm
    /// with `reconcile` or the registration-status query.
    pub fn local_hint(&self) -> bool {
        self.read_local_flag()
    }

    fn read_local_flag(&self) -> bool {
        matches!(
            self.local
                .get(&self.config.onboarding_flag_key)
                .as_deref(),
            Some("true")
        )
    }

    fn write_local_flag(&self, complete: bool) {
        self.local.set(
            &self.config.onboarding_flag_key,
            if complete { "true" } else { "false" },
        );
    }
}
