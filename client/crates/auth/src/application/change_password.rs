//! Change Password Use Case
//!
//! For a signed-in user. The remote verifies the current password; the
//! client only enforces the policy on the new one.

use std::sync::Arc;

use crate::domain::repository::IdentityGateway;
use crate::domain::value_object::password::RawPassword;
use crate::error::AuthResult;
use crate::session::SessionManager;

/// Change password use case
pub struct ChangePasswordUseCase<G>
where
    G: IdentityGateway,
{
    gateway: Arc<G>,
    sessions: Arc<SessionManager<G>>,
}

impl<G> ChangePasswordUseCase<G>
where
    G: IdentityGateway,
{
    pub fn new(gateway: Arc<G>, sessions: Arc<SessionManager<G>>) -> Self {
        Self { gateway, sessions }
    }

    pub async fn execute(&self, current_password: &str, new_password: String) -> AuthResult<()> {
        let session = self.sessions.require_session().await?;
        let new_password = RawPassword::new(new_password)?;

        self.gateway
            .update_password(
                session.identity_id(),
                current_password,
                new_password.expose(),
            )
            .await?;

        tracing::info!(identity_id = %session.identity_id(), "Password changed");
        Ok(())
    }
}
