//! Raw Password Value Object
//!
//! Domain wrapper over `platform::password` with user-facing error
//! mapping. The client never hashes: the clear text exists only long
//! enough to be placed into a credential request, and is zeroized when
//! the wrapper drops.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, PasswordPolicyError};
use std::fmt;

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped; no `Clone`.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// ## Validation Rules (NIST SP 800-63B)
    /// - Minimum 8 characters
    /// - Maximum 128 characters
    /// - No control characters
    /// - No common patterns (sequential, keyboard, dictionary)
    /// - Unicode NFKC normalized
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, actual } => AppError::bad_request(format!(
                "Password must be at least {} characters (got {})",
                min, actual
            ))
            .with_action("Please choose a longer password"),

            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                max, actual
            ))
            .with_action("Please choose a shorter password"),

            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
                    .with_action("Please enter a password")
            }

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any special control characters")
            }

            PasswordPolicyError::CommonPattern => {
                AppError::bad_request("Password is too common or follows a predictable pattern")
                    .with_action("Please choose a more unique password")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Check if password has been compromised (via HIBP API)
    ///
    /// Uses k-Anonymity model - only a SHA-1 prefix is sent.
    /// Failures should be treated as non-blocking by callers.
    pub async fn is_compromised(&self) -> AppResult<bool> {
        self.0
            .check_breach()
            .await
            .map_err(|e| AppError::service_unavailable(e.to_string()))
    }

    /// Access the clear text for a remote credential call
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}
