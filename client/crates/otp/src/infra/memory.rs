//! In-Memory Repository and Delivery Implementations
//!
//! The client holds issued codes in process memory for the lifetime of a
//! flow; nothing here survives a reload, which is the intended contract
//! for transient signup state.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::entities::IssuedCode;
use crate::domain::repository::{CodeDelivery, CodeRepository};
use crate::domain::value_objects::CodePurpose;
use crate::error::OtpResult;

/// In-memory code repository keyed by (email, purpose)
#[derive(Debug, Default)]
pub struct MemoryCodeRepository {
    codes: Mutex<HashMap<(String, CodePurpose), IssuedCode>>,
}

impl MemoryCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeRepository for MemoryCodeRepository {
    async fn put(&self, code: &IssuedCode) -> OtpResult<()> {
        self.codes
            .lock()
            .expect("code store poisoned")
            .insert((code.email.clone(), code.purpose), code.clone());
        Ok(())
    }

    async fn find(&self, email: &str, purpose: CodePurpose) -> OtpResult<Option<IssuedCode>> {
        Ok(self
            .codes
            .lock()
            .expect("code store poisoned")
            .get(&(email.to_string(), purpose))
            .cloned())
    }

    async fn update(&self, code: &IssuedCode) -> OtpResult<()> {
        let mut codes = self.codes.lock().expect("code store poisoned");
        let key = (code.email.clone(), code.purpose);
        // Only overwrite the same issuance; a replacement issued meanwhile wins
        if codes.get(&key).is_some_and(|c| c.id == code.id) {
            codes.insert(key, code.clone());
        }
        Ok(())
    }

    async fn remove(&self, code_id: Uuid) -> OtpResult<()> {
        self.codes
            .lock()
            .expect("code store poisoned")
            .retain(|_, c| c.id != code_id);
        Ok(())
    }

    async fn cleanup_expired(&self, now_ms: i64) -> OtpResult<u64> {
        let mut codes = self.codes.lock().expect("code store poisoned");
        let before = codes.len();
        codes.retain(|_, c| !c.is_expired_at(now_ms));
        Ok((before - codes.len()) as u64)
    }
}

/// Delivery adapter that logs the code instead of sending it
///
/// Development only; never wire this into a build that talks to real
/// users.
#[derive(Debug, Default)]
pub struct TracingCodeDelivery;

impl CodeDelivery for TracingCodeDelivery {
    async fn deliver(&self, email: &str, purpose: CodePurpose, code: &str) -> OtpResult<()> {
        tracing::info!(email = %email, purpose = %purpose, code = %code, "Would deliver code");
        Ok(())
    }
}

/// Delivery adapter that captures the last code per address
///
/// Lets flow tests read what "arrived" without a real channel.
#[derive(Debug, Default)]
pub struct CapturingCodeDelivery {
    delivered: Mutex<HashMap<(String, CodePurpose), String>>,
}

impl CapturingCodeDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last code delivered to this (email, purpose), if any
    pub fn last_code(&self, email: &str, purpose: CodePurpose) -> Option<String> {
        self.delivered
            .lock()
            .expect("capture poisoned")
            .get(&(email.to_string(), purpose))
            .cloned()
    }
}

impl CodeDelivery for CapturingCodeDelivery {
    async fn deliver(&self, email: &str, purpose: CodePurpose, code: &str) -> OtpResult<()> {
        self.delivered
            .lock()
            .expect("capture poisoned")
            .insert((email.to_string(), purpose), code.to_string());
        Ok(())
    }
}
