//! Change Email Use Case
//!
//! Two-step like signup: a code is delivered to the *new* address to
//! prove ownership before the identity record is touched.

use std::sync::Arc;

use otp::application::issue_code::IssueCodeUseCase;
use otp::application::verify_code::VerifyCodeUseCase;
use otp::domain::repository::{CodeDelivery, CodeRepository};
use otp::domain::value_objects::CodePurpose;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityGateway;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;
use crate::session::SessionManager;
use kernel::error::app_error::AppError;

/// Output of requesting an email change
#[derive(Debug, Clone)]
pub struct ChangeEmailRequested {
    pub code_expires_at_ms: i64,
}

/// Output of confirming an email change
#[derive(Debug, Clone)]
pub struct ChangeEmailOutput {
    pub identity: Identity,
}

/// Change email use case
pub struct ChangeEmailUseCase<G, R, D>
where
    G: IdentityGateway,
    R: CodeRepository,
    D: CodeDelivery,
{
    gateway: Arc<G>,
    sessions: Arc<SessionManager<G>>,
    issue_code: Arc<IssueCodeUseCase<R, D>>,
    verify_code: Arc<VerifyCodeUseCase<R>>,
}

impl<G, R, D> ChangeEmailUseCase<G, R, D>
where
    G: IdentityGateway,
    R: CodeRepository,
    D: CodeDelivery,
{
    pub fn new(
        gateway: Arc<G>,
        sessions: Arc<SessionManager<G>>,
        issue_code: Arc<IssueCodeUseCase<R, D>>,
        verify_code: Arc<VerifyCodeUseCase<R>>,
    ) -> Self {
        Self {
            gateway,
            sessions,
            issue_code,
            verify_code,
        }
    }

    /// Step 1: deliver a confirmation code to the new address
    pub async fn request(&self, new_email: &str) -> AuthResult<ChangeEmailRequested> {
        let session = self.sessions.require_session().await?;
        let new_email = Email::new(new_email)?;

        if new_email == session.identity.email {
            return Err(AppError::bad_request("New email matches the current address")
                .with_action("Enter a different email address")
                .into());
        }

        let issued = self
            .issue_code
            .execute(new_email.as_str(), CodePurpose::EmailChange)
            .await?;

        tracing::info!("Email-change code issued");
        Ok(ChangeEmailRequested {
            code_expires_at_ms: issued.expires_at_ms,
        })
    }

    /// Step 2: verify the code and update the identity record
    ///
    /// Some backends additionally require the current password for this
    /// call; pass it through when the product asks for it.
    pub async fn confirm(
        &self,
        new_email: &str,
        code: &str,
        password: Option<&str>,
    ) -> AuthResult<ChangeEmailOutput> {
        let session = self.sessions.require_session().await?;
        let new_email = Email::new(new_email)?;

        self.verify_code
            .execute(new_email.as_str(), CodePurpose::EmailChange, code)
            .await?;

        let identity = self
            .gateway
            .update_email(session.identity_id(), &new_email, password)
            .await?;

        tracing::info!(identity_id = %identity.identity_id, "Login email changed");
        Ok(ChangeEmailOutput { identity })
    }
}
