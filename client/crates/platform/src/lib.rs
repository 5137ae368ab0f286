//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Clock port for testable time handling
//! - Numeric code generation and constant-time comparison
//! - Client-side password policy (NIST SP 800-63B, zeroized memory)
//! - Local key-value storage abstraction
//! - Issue-throttle window for resend flows

pub mod clock;
pub mod crypto;
pub mod local_store;
pub mod password;
pub mod throttle;
