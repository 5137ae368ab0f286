//! Password Reset Use Case
//!
//! The reset email itself is sent by the identity provider; this use
//! case only triggers it and later applies the new password with the
//! recovery token from the emailed link.

use std::sync::Arc;

use crate::domain::repository::IdentityGateway;
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Password reset use case
pub struct PasswordResetUseCase<G>
where
    G: IdentityGateway,
{
    gateway: Arc<G>,
}

impl<G> PasswordResetUseCase<G>
where
    G: IdentityGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Request a reset email
    ///
    /// Anti-enumeration: an unknown address reports success exactly like
    /// a known one. Only infrastructure failures surface.
    pub async fn send(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;

        match self.gateway.send_password_reset(&email).await {
            Ok(()) => {}
            Err(AuthError::InvalidCredentials) => {
                tracing::debug!("Password reset requested for unknown address");
            }
            Err(err) => return Err(err),
        }

        tracing::info!("Password reset email requested");
        Ok(())
    }

    /// Apply a new password using the recovery token from the email
    pub async fn apply(&self, recovery_token: &str, new_password: String) -> AuthResult<()> {
        let password = RawPassword::new(new_password)?;
        self.gateway
            .apply_password_reset(recovery_token, password.expose())
            .await?;

        tracing::info!("Password reset applied");
        Ok(())
    }
}
