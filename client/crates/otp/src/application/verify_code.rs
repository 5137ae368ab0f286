//! Verify Code Use Case

use crate::domain::repository::CodeRepository;
use crate::domain::services::normalize_code;
use crate::domain::value_objects::CodePurpose;
use crate::error::{OtpError, OtpResult};
use platform::clock::Clock;
use std::sync::Arc;

/// Verify Code Use Case
///
/// Validates a submitted code against the live one for (email, purpose)
/// and consumes it on success. Failure order is fixed so the caller can
/// rely on it: wrong value first, then reuse, then expiry.
pub struct VerifyCodeUseCase<R>
where
    R: CodeRepository,
{
    code_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> VerifyCodeUseCase<R>
where
    R: CodeRepository,
{
    pub fn new(code_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { code_repo, clock }
    }

    pub async fn execute(&self, email: &str, purpose: CodePurpose, code: &str) -> OtpResult<()> {
        let candidate = normalize_code(code);

        let issued = self
            .code_repo
            .find(email, purpose)
            .await?
            .ok_or(OtpError::CodeInvalid)?;

        if !issued.matches(&candidate) {
            return Err(OtpError::CodeInvalid);
        }

        // Reuse of a consumed code must fail the same way every time,
        // even once the code has also expired
        if issued.consumed {
            return Err(OtpError::CodeAlreadyUsed);
        }

        if issued.is_expired_at(self.clock.now_ms()) {
            return Err(OtpError::CodeExpired);
        }

        let mut issued = issued;
        issued.mark_consumed();
        self.code_repo.update(&issued).await?;

        tracing::info!(
            code_id = %issued.id,
            purpose = %purpose,
            "Verification code consumed"
        );

        Ok(())
    }
}
