//! Repository Traits
//!
//! Interfaces for code storage and out-of-band delivery.
//! Implementations are in the infrastructure layer.

use crate::domain::entities::IssuedCode;
use crate::domain::value_objects::CodePurpose;
use crate::error::OtpResult;
use uuid::Uuid;

/// Code repository trait
///
/// At most one live code exists per (email, purpose) pair; `put` replaces
/// any prior entry for the pair.
#[trait_variant::make(CodeRepository: Send)]
pub trait LocalCodeRepository {
    /// Store a code, replacing any existing code for its (email, purpose)
    async fn put(&self, code: &IssuedCode) -> OtpResult<()>;

    /// Find the current code for an (email, purpose) pair
    async fn find(&self, email: &str, purpose: CodePurpose) -> OtpResult<Option<IssuedCode>>;

    /// Persist an updated code (e.g., after consumption)
    async fn update(&self, code: &IssuedCode) -> OtpResult<()>;

    /// Remove a code by ID
    async fn remove(&self, code_id: Uuid) -> OtpResult<()>;

    /// Clean up expired codes
    async fn cleanup_expired(&self, now_ms: i64) -> OtpResult<u64>;
}

/// Out-of-band delivery trait (email sender, dev logger, ...)
#[trait_variant::make(CodeDelivery: Send)]
pub trait LocalCodeDelivery {
    /// Hand the code to the delivery channel
    async fn deliver(&self, email: &str, purpose: CodePurpose, code: &str) -> OtpResult<()>;
}
