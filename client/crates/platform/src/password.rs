//! Password Policy and Handling
//!
//! NIST SP 800-63B compliant client-side password handling:
//! - Zeroization of sensitive data
//! - Unicode NFKC normalization
//! - Optional HIBP (Have I Been Pwned) breach checking
//!
//! Hashing is deliberately absent: the hosted identity service owns the
//! credential store, so the clear text only ever exists transiently in
//! memory on its way into a request body.

use std::fmt;

use sha1::{Digest, Sha1};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// HIBP API endpoint (k-Anonymity model)
const HIBP_API_URL: &str = "https://api.pwnedpasswords.com/range/";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// Password matches common patterns (sequential, repeated)
    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Breach-check errors (non-fatal, logged by callers)
#[derive(Debug, Error)]
pub enum BreachCheckError {
    #[error("Breach check failed: {0}")]
    RequestFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped, preventing memory inspection attacks.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Validates against NIST SP 800-63B requirements:
    /// - Minimum 8 characters
    /// - Maximum 128 characters
    /// - No control characters
    /// - Not empty/whitespace only
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        // NIST: Unicode NFKC normalization before processing
        let normalized: String = raw.nfkc().collect();

        // Check for empty or whitespace-only
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NIST: Count Unicode code points (not bytes)
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Check for control characters (except space, tab, newline)
        for ch in normalized.chars() {
            if ch.is_control() && ch != ' ' && ch != '\t' && ch != '\n' {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        // Check for common weak patterns
        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    /// Access the clear text for a remote credential call
    ///
    /// The returned slice borrows the zeroized buffer; never copy it into
    /// a longer-lived owned value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Get the password as bytes for the breach-check hash
    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Check if password has been compromised using HIBP API
    ///
    /// Uses k-Anonymity model:
    /// 1. Hash password with SHA-1
    /// 2. Send only first 5 characters of hash
    /// 3. Check if full hash appears in response
    ///
    /// ## Returns
    /// - `Ok(true)` if password is compromised
    /// - `Ok(false)` if password is not found in breaches
    /// - `Err(_)` if API check failed (should be treated as non-blocking)
    pub async fn check_breach(&self) -> Result<bool, BreachCheckError> {
        // SHA-1 hash of password (uppercase hex)
        let mut hasher = Sha1::new();
        hasher.update(self.as_bytes());
        let hash = hasher.finalize();
        let hash_hex = hex_encode_upper(&hash);

        // k-Anonymity: send only first 5 chars
        let prefix = &hash_hex[..5];
        let suffix = &hash_hex[5..];

        // Query HIBP API
        let url = format!("{}{}", HIBP_API_URL, prefix);
        let response = reqwest::get(&url)
            .await
            .map_err(|e| BreachCheckError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BreachCheckError::RequestFailed(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BreachCheckError::RequestFailed(e.to_string()))?;

        // Check if our hash suffix appears in response
        // Format: SUFFIX:COUNT\r\n
        for line in body.lines() {
            if let Some((hash_suffix, _count)) = line.split_once(':') {
                if hash_suffix.eq_ignore_ascii_case(suffix) {
                    return Ok(true); // Password is compromised
                }
            }
        }

        Ok(false) // Password not found in breaches
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check for common weak patterns
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // Check for all same character (e.g., "aaaaaaaa")
    let chars: Vec<char> = lower.chars().collect();
    if !chars.is_empty() && chars.iter().all(|&c| c == chars[0]) {
        return true;
    }

    // Check for sequential numbers (e.g., "12345678")
    if is_sequential_numbers(&lower) {
        return true;
    }

    // Check for keyboard patterns
    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "qwertyuiop",
        "asdfgh",
        "asdfghjkl",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];

    for pattern in KEYBOARD_PATTERNS {
        if lower.contains(pattern) {
            return true;
        }
    }

    // Check for extremely common passwords
    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "abcdefgh",
        "letmein",
        "welcome",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "monkey",
        "shadow",
        "master",
        "dragon",
        "baseball",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Check if string is sequential numbers
fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    // Check ascending
    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));

    // Check descending
    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

/// Encode bytes as uppercase hex string
fn hex_encode_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Xy7!{}", "a".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new("".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_common_pattern() {
        let result = ClearTextPassword::new("password123".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::CommonPattern)));

        let result = ClearTextPassword::new("qwertyuiop".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::CommonPattern)));

        let result = ClearTextPassword::new("12345678".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::CommonPattern)));

        let result = ClearTextPassword::new("aaaaaaaa".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::CommonPattern)));
    }

    #[test]
    fn test_valid_password() {
        let result = ClearTextPassword::new("MySecure#Pass2024!".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_unicode_password() {
        // Unicode passwords should work
        let result = ClearTextPassword::new("パスワード安全です!".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width digits normalize to ASCII before validation
        let a = ClearTextPassword::new("Ｔｒａｖｅｌ２０２６!".to_string()).unwrap();
        let b = ClearTextPassword::new("Travel2026!".to_string()).unwrap();
        assert_eq!(a.expose(), b.expose());
    }

    #[test]
    fn test_expose_returns_clear_text() {
        let password = ClearTextPassword::new("Wander#Far2026".to_string()).unwrap();
        assert_eq!(password.expose(), "Wander#Far2026");
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("Wander#Far2026".to_string()).unwrap();
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("Wander"));
    }

    #[test]
    fn test_hex_encode_upper() {
        let bytes = [0xab, 0xcd, 0xef];
        assert_eq!(hex_encode_upper(&bytes), "ABCDEF");
    }
}
