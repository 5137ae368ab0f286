//! OTP Error Types
//!
//! This module provides verification-code error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// OTP-specific result type alias
pub type OtpResult<T> = Result<T, OtpError>;

/// OTP-specific error variants
///
/// `CodeInvalid`, `CodeExpired`, and `CodeAlreadyUsed` are deliberately
/// distinct: only the latter two should be remediated by offering a resend.
#[derive(Debug, Error)]
pub enum OtpError {
    /// No matching code, or the submitted value is wrong
    #[error("Verification code is incorrect")]
    CodeInvalid,

    /// Code exists but its TTL has elapsed
    #[error("Verification code has expired")]
    CodeExpired,

    /// Code was already consumed by an earlier verification
    #[error("Verification code has already been used")]
    CodeAlreadyUsed,

    /// Issue frequency limit hit for this (email, purpose)
    #[error("Too many code requests, try again later")]
    ResendThrottled,

    /// Delivery channel did not answer within the configured deadline
    #[error("Code delivery timed out")]
    DeliveryTimedOut,

    /// Delivery channel failed outright
    #[error("Code delivery failed: {0}")]
    Delivery(String),

    /// Storage backend error
    #[error("Code store error: {0}")]
    Store(String),
}

impl OtpError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OtpError::CodeInvalid => ErrorKind::UnprocessableEntity,
            OtpError::CodeExpired => ErrorKind::Gone,
            OtpError::CodeAlreadyUsed => ErrorKind::Conflict,
            OtpError::ResendThrottled => ErrorKind::TooManyRequests,
            OtpError::DeliveryTimedOut => ErrorKind::RequestTimeout,
            OtpError::Delivery(_) => ErrorKind::ServiceUnavailable,
            OtpError::Store(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether offering "resend code" is the right remediation
    pub fn offer_resend(&self) -> bool {
        matches!(self, OtpError::CodeExpired | OtpError::CodeAlreadyUsed)
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            OtpError::Store(msg) => {
                tracing::error!(message = %msg, "Code store error");
            }
            OtpError::Delivery(msg) => {
                tracing::error!(message = %msg, "Code delivery failed");
            }
            OtpError::DeliveryTimedOut => {
                tracing::warn!("Code delivery timed out");
            }
            OtpError::ResendThrottled => {
                tracing::warn!("Code issue throttled");
            }
            _ => {
                tracing::debug!(error = %self, "Verification failed");
            }
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}
