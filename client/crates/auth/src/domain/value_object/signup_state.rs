//! Signup State Value Object
//!
//! Phase of the two-phase signup flow. Progression:
//! `Idle → DetailsCollected → CodeIssued → Verified → AccountCreated →
//! LoggedIn`, with `Abandoned` reachable from any non-terminal state and
//! `CodeIssued → CodeIssued` as the resend self-loop.

use std::fmt;

/// Signup flow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupState {
    /// No signup in progress
    #[default]
    Idle,

    /// Details captured, code not (yet) issued
    DetailsCollected,

    /// A verification code is out; waiting for the user to submit it
    CodeIssued,

    /// Code consumed; remote account creation underway
    Verified,

    /// Identity exists remotely but no session was established
    AccountCreated,

    /// Signup finished with a live session
    LoggedIn,

    /// Flow discarded before completion
    Abandoned,
}

impl SignupState {
    /// Get string code for serialization/logging
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DetailsCollected => "details_collected",
            Self::CodeIssued => "code_issued",
            Self::Verified => "verified",
            Self::AccountCreated => "account_created",
            Self::LoggedIn => "logged_in",
            Self::Abandoned => "abandoned",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "idle" => Some(Self::Idle),
            "details_collected" => Some(Self::DetailsCollected),
            "code_issued" => Some(Self::CodeIssued),
            "verified" => Some(Self::Verified),
            "account_created" => Some(Self::AccountCreated),
            "logged_in" => Some(Self::LoggedIn),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Check if a verification code can be submitted in this phase
    #[inline]
    pub const fn accepts_code(&self) -> bool {
        matches!(self, Self::CodeIssued)
    }

    /// Check if a code can be (re-)issued in this phase
    #[inline]
    pub const fn accepts_resend(&self) -> bool {
        matches!(self, Self::DetailsCollected | Self::CodeIssued)
    }

    /// Check if this is a terminal state
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::LoggedIn | Self::Abandoned)
    }

    /// Check if the flow can still be abandoned
    #[inline]
    pub const fn can_abandon(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for SignupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SignupState; 7] = [
        SignupState::Idle,
        SignupState::DetailsCollected,
        SignupState::CodeIssued,
        SignupState::Verified,
        SignupState::AccountCreated,
        SignupState::LoggedIn,
        SignupState::Abandoned,
    ];

    #[test]
    fn test_code_roundtrip() {
        for state in ALL {
            assert_eq!(SignupState::from_code(state.code()), Some(state));
        }
        assert_eq!(SignupState::from_code("unknown"), None);
    }

    #[test]
    fn test_accepts_code_only_when_issued() {
        for state in ALL {
            assert_eq!(state.accepts_code(), state == SignupState::CodeIssued);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(SignupState::LoggedIn.is_terminal());
        assert!(SignupState::Abandoned.is_terminal());
        assert!(!SignupState::CodeIssued.is_terminal());
        assert!(!SignupState::AccountCreated.is_terminal());
    }

    #[test]
    fn test_abandon_from_non_terminal_only() {
        for state in ALL {
            assert_eq!(state.can_abandon(), !state.is_terminal());
        }
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SignupState::default(), SignupState::Idle);
    }
}
