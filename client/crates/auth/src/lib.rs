//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, gateway traits
//! - `application/` - Use cases and the orchestrator facade
//! - `infra/` - HTTP gateway implementations
//! - `session` - Session manager (single source of truth for login state)
//! - `reconcile` - Onboarding-status replication repair
//!
//! ## Features
//! - Two-phase signup (details → emailed code → account + auto-login)
//! - Email-verification gate on login
//! - Single-flight session refresh with observable session state
//! - Three-store onboarding-status reconciliation
//! - Password reset, email change, password change
//!
//! ## Security Model
//! - Credentials are hashed remotely; clear text is zeroized in memory
//! - Verification codes are single-use, purpose-bound, compared in
//!   constant time
//! - Issue/reset endpoints never reveal whether an address is registered

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod reconcile;
pub mod session;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::orchestrator::AuthOrchestrator;
pub use error::{AuthError, AuthResult};
pub use reconcile::OnboardingReconciler;
pub use session::SessionManager;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::identity::Identity;
    pub use crate::domain::entity::pending_signup::PendingSignup;
    pub use crate::domain::entity::profile::{Profile, ProfilePatch};
    pub use crate::domain::entity::session::Session;
    pub use crate::domain::value_object::email::Email;
    pub use crate::domain::value_object::metadata::IdentityMetadata;
    pub use crate::domain::value_object::password::RawPassword;
    pub use crate::domain::value_object::registration_status::RegistrationStatus;
    pub use crate::domain::value_object::signup_state::SignupState;
}

pub mod store {
    pub use crate::infra::http::{ApiClient, ApiConfig};
}
