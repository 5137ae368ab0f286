//! OTP (Verification Code) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - In-memory implementations and delivery adapters
//!
//! ## Security Model
//! - Codes are single-use and bound to an (email, purpose) pair
//! - Re-issuing for the same pair replaces the prior code wholesale
//! - Code comparison is constant-time
//! - Issue frequency is throttled; issuance never reveals whether an
//!   address is registered

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::OtpConfig;
pub use application::issue_code::{IssueCodeOutput, IssueCodeUseCase};
pub use application::verify_code::VerifyCodeUseCase;
pub use domain::value_objects::CodePurpose;
pub use error::{OtpError, OtpResult};
pub use infra::memory::MemoryCodeRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
}

pub mod store {
    pub use crate::infra::memory::MemoryCodeRepository as CodeStore;
}

#[cfg(test)]
mod tests;
