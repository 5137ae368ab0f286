//! Sign In Use Case
//!
//! Authenticates a user and installs the session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::{IdentityGateway, ProfileStore};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};
use crate::reconcile::OnboardingReconciler;
use crate::session::SessionManager;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug, Clone)]
pub struct SignInOutput {
    pub identity: Identity,
}

/// Sign in use case
pub struct SignInUseCase<G, P>
where
    G: IdentityGateway,
    P: ProfileStore,
{
    gateway: Arc<G>,
    sessions: Arc<SessionManager<G>>,
    reconciler: Arc<OnboardingReconciler<G, P>>,
    config: Arc<AuthConfig>,
}

impl<G, P> SignInUseCase<G, P>
where
    G: IdentityGateway,
    P: ProfileStore,
{
    pub fn new(
        gateway: Arc<G>,
        sessions: Arc<SessionManager<G>>,
        reconciler: Arc<OnboardingReconciler<G, P>>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            gateway,
            sessions,
            reconciler,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A malformed address can't match an account; report it the same
        // way as a wrong password
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        // Verification gate: checked before any session can exist.
        // This is a hard refusal, not a warning.
        let identity = self
            .gateway
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !identity.email_verified {
            tracing::info!(identity_id = %identity.identity_id, "Login blocked: email unverified");
            return Err(AuthError::EmailUnverified);
        }

        let session = self.gateway.authenticate(&email, &input.password).await?;
        let identity = session.identity.clone();
        self.sessions.install(session);

        // Opportunistic read-time repair of the onboarding replicas
        if self.config.reconcile_on_login {
            if let Err(err) = self.reconciler.reconcile(identity.identity_id).await {
                tracing::warn!(error = %err, "Onboarding reconcile on login failed");
            }
        }

        tracing::info!(identity_id = %identity.identity_id, "User signed in");

        Ok(SignInOutput { identity })
    }
}
