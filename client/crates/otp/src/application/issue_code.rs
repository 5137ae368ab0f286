//! Issue Code Use Case

use crate::application::config::OtpConfig;
use crate::domain::entities::IssuedCode;
use crate::domain::repository::{CodeDelivery, CodeRepository};
use crate::domain::services::generate_code;
use crate::domain::value_objects::CodePurpose;
use crate::error::{OtpError, OtpResult};
use platform::clock::Clock;
use platform::throttle::IssueThrottle;
use std::sync::Arc;

/// Output DTO for issue code
#[derive(Debug, Clone)]
pub struct IssueCodeOutput {
    pub expires_at_ms: i64,
}

/// Issue Code Use Case
///
/// Generates a fresh code for an (email, purpose) pair, replacing any
/// prior one, and hands it to the delivery channel. Issuance never
/// reports whether the address is registered anywhere.
pub struct IssueCodeUseCase<R, D>
where
    R: CodeRepository,
    D: CodeDelivery,
{
    code_repo: Arc<R>,
    delivery: Arc<D>,
    clock: Arc<dyn Clock>,
    throttle: IssueThrottle,
    config: Arc<OtpConfig>,
}

impl<R, D> IssueCodeUseCase<R, D>
where
    R: CodeRepository,
    D: CodeDelivery,
{
    pub fn new(
        code_repo: Arc<R>,
        delivery: Arc<D>,
        clock: Arc<dyn Clock>,
        config: Arc<OtpConfig>,
    ) -> Self {
        Self {
            code_repo,
            delivery,
            clock,
            throttle: IssueThrottle::new(),
            config,
        }
    }

    pub async fn execute(&self, email: &str, purpose: CodePurpose) -> OtpResult<IssueCodeOutput> {
        let now_ms = self.clock.now_ms();

        let throttle_key = format!("{}:{}", purpose.code(), email);
        if !self
            .throttle
            .check_and_record(&throttle_key, &self.config.issue_throttle, now_ms)
        {
            return Err(OtpError::ResendThrottled);
        }

        // Replaces any live code for this pair; earlier codes stop
        // validating the moment the new one is stored
        let code = IssuedCode::new(
            email,
            purpose,
            generate_code(self.config.code_length),
            self.config.code_ttl_ms(),
            now_ms,
        );
        self.code_repo.put(&code).await?;

        let delivered = tokio::time::timeout(
            self.config.delivery_timeout,
            self.delivery.deliver(email, purpose, code.value()),
        )
        .await;

        match delivered {
            Err(_elapsed) => return Err(OtpError::DeliveryTimedOut),
            Ok(Err(e)) => return Err(e),
            Ok(Ok(())) => {}
        }

        tracing::info!(
            code_id = %code.id,
            purpose = %purpose,
            expires_at_ms = code.expires_at_ms,
            "Issued verification code"
        );

        Ok(IssueCodeOutput {
            expires_at_ms: code.expires_at_ms,
        })
    }
}
