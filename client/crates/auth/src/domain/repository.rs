//! Gateway Traits
//!
//! Interfaces for the remote collaborators this subsystem depends on.
//! The hosted backend is opaque; these are the narrow shapes consumed
//! from it. Implementations are in the infrastructure layer.

use crate::domain::entity::{
    identity::Identity,
    profile::{Profile, ProfilePatch},
    session::Session,
};
use crate::domain::value_object::{email::Email, metadata::IdentityMetadata};
use crate::error::AuthResult;
use kernel::id::IdentityId;

/// Remote identity service gateway
#[trait_variant::make(IdentityGateway: Send)]
pub trait LocalIdentityGateway {
    /// Create an identity; the password is hashed remotely
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
        metadata: &IdentityMetadata,
    ) -> AuthResult<Identity>;

    /// Exchange credentials for a session
    async fn authenticate(&self, email: &Email, password: &str) -> AuthResult<Session>;

    /// Exchange a refresh token for a fresh session
    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session>;

    /// Fetch an identity by id
    async fn get_identity(&self, identity_id: IdentityId) -> AuthResult<Option<Identity>>;

    /// Look up an identity by login email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Merge a metadata patch into the identity record
    async fn update_metadata(
        &self,
        identity_id: IdentityId,
        patch: &IdentityMetadata,
    ) -> AuthResult<Identity>;

    /// Trigger the remote password-reset email
    async fn send_password_reset(&self, email: &Email) -> AuthResult<()>;

    /// Set a new password using a recovery token from the reset email
    async fn apply_password_reset(
        &self,
        recovery_token: &str,
        new_password: &str,
    ) -> AuthResult<()>;

    /// Change the login email
    async fn update_email(
        &self,
        identity_id: IdentityId,
        new_email: &Email,
        password: Option<&str>,
    ) -> AuthResult<Identity>;

    /// Change the password; the remote verifies the current one
    async fn update_password(
        &self,
        identity_id: IdentityId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()>;
}

/// Remote profile store gateway
#[trait_variant::make(ProfileStore: Send)]
pub trait LocalProfileStore {
    /// Fetch the profile for an identity
    async fn get_profile(&self, identity_id: IdentityId) -> AuthResult<Option<Profile>>;

    /// Create-or-update the profile with a partial patch
    async fn upsert_profile(
        &self,
        identity_id: IdentityId,
        patch: &ProfilePatch,
    ) -> AuthResult<Profile>;

    /// Cheap existence probe
    async fn profile_exists(&self, identity_id: IdentityId) -> AuthResult<bool>;
}

/// Travel-preferences existence probe
///
/// The preferences record itself is ordinary travel-domain CRUD and out
/// of scope here; registration-status aggregation only needs to know
/// whether one exists.
#[trait_variant::make(TravelPreferencesStore: Send)]
pub trait LocalTravelPreferencesStore {
    async fn preferences_exist(&self, identity_id: IdentityId) -> AuthResult<bool>;
}
