//! Domain Services
//!
//! Pure domain logic for code generation and comparison.

use platform::crypto::{constant_time_eq, random_digits};

/// Generate a fresh numeric code of the given length
pub fn generate_code(length: usize) -> String {
    random_digits(length)
}

/// Normalize a user-submitted code (copy/paste tolerant)
///
/// Strips surrounding whitespace and any inner separators people type
/// when reading codes split into groups ("482 913", "482-913").
pub fn normalize_code(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Constant-time comparison of a stored code and a submitted candidate
pub fn code_matches(stored: &str, candidate: &str) -> bool {
    constant_time_eq(stored.as_bytes(), candidate.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        let code = generate_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("482913"), "482913");
        assert_eq!(normalize_code("  482913\n"), "482913");
        assert_eq!(normalize_code("482 913"), "482913");
        assert_eq!(normalize_code("482-913"), "482913");
    }

    #[test]
    fn test_code_matches() {
        assert!(code_matches("482913", "482913"));
        assert!(!code_matches("482913", "482914"));
        assert!(!code_matches("482913", ""));
    }
}
