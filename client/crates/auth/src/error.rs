//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Expected,
//! user-actionable failures stay distinct so the UI can render the
//! right remediation.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email/password pair (also used to avoid account enumeration)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Login refused until the address is verified; no session exists
    #[error("Email address has not been verified")]
    EmailUnverified,

    /// Submitted verification code is wrong
    #[error("Verification code is incorrect")]
    CodeInvalid,

    /// Verification code TTL elapsed
    #[error("Verification code has expired")]
    CodeExpired,

    /// Verification code was already consumed
    #[error("Verification code has already been used")]
    CodeAlreadyUsed,

    /// Too many code issues for this address
    #[error("Too many code requests, try again later")]
    CodeRequestThrottled,

    /// Session is gone; the user must sign in again
    #[error("Session has expired")]
    SessionExpired,

    /// Transport-level failure; the caller decides whether to retry
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// A named operation exceeded its caller-visible deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Unexpected backend failure
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// A non-authoritative replica write failed; repaired later
    #[error("Replication to {store} failed")]
    PartialWriteFailure { store: &'static str },

    /// No signup flow in the right phase for this call
    #[error("No signup in progress")]
    SignupNotInProgress,

    /// The flow moved on while this call was in flight; result discarded
    #[error("Signup flow was superseded")]
    SignupSuperseded,

    /// Input validation failure (email format, password policy)
    #[error(transparent)]
    Validation(#[from] AppError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::EmailUnverified => ErrorKind::Forbidden,
            AuthError::CodeInvalid => ErrorKind::UnprocessableEntity,
            AuthError::CodeExpired => ErrorKind::Gone,
            AuthError::CodeAlreadyUsed => ErrorKind::Conflict,
            AuthError::CodeRequestThrottled => ErrorKind::TooManyRequests,
            AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::NetworkUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Timeout(_) => ErrorKind::RequestTimeout,
            AuthError::RemoteService(_) => ErrorKind::InternalServerError,
            AuthError::PartialWriteFailure { .. } => ErrorKind::InternalServerError,
            AuthError::SignupNotInProgress => ErrorKind::Conflict,
            AuthError::SignupSuperseded => ErrorKind::Conflict,
            AuthError::Validation(e) => e.kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether offering "resend code" is the right remediation
    ///
    /// A mistyped code should be retried as-is, not re-issued.
    pub fn offer_resend(&self) -> bool {
        matches!(self, AuthError::CodeExpired | AuthError::CodeAlreadyUsed)
    }

    /// Whether the same call may succeed if simply repeated
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::NetworkUnavailable(_) | AuthError::Timeout(_)
        )
    }

    /// Whether the remote rejected our authentication material itself
    pub(crate) fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::SessionExpired
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::RemoteService(msg) => {
                tracing::error!(message = %msg, "Remote service error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::PartialWriteFailure { store } => {
                tracing::warn!(store = store, "Replica write failed, reconciler will repair");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionExpired => {
                tracing::info!("Session expired");
            }
            AuthError::NetworkUnavailable(msg) => {
                tracing::warn!(message = %msg, "Network unavailable");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<otp::OtpError> for AuthError {
    fn from(err: otp::OtpError) -> Self {
        match err {
            otp::OtpError::CodeInvalid => AuthError::CodeInvalid,
            otp::OtpError::CodeExpired => AuthError::CodeExpired,
            otp::OtpError::CodeAlreadyUsed => AuthError::CodeAlreadyUsed,
            otp::OtpError::ResendThrottled => AuthError::CodeRequestThrottled,
            otp::OtpError::DeliveryTimedOut => AuthError::Timeout("code delivery".into()),
            otp::OtpError::Delivery(msg) => AuthError::RemoteService(msg),
            otp::OtpError::Store(msg) => AuthError::Internal(msg),
        }
    }
}
