//! Identity Metadata Value Object
//!
//! The identity provider attaches an arbitrary JSON map to every user
//! record. This wrapper gives the handful of keys this client relies on
//! typed accessors while leaving unknown keys untouched, so a metadata
//! patch never clobbers fields written by other apps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key for the authoritative onboarding flag
pub const KEY_HAS_COMPLETED_ONBOARDING: &str = "has_completed_onboarding";
/// Key for the user-facing display name
pub const KEY_DISPLAY_NAME: &str = "display_name";
/// Key for the avatar image URL
pub const KEY_AVATAR_URL: &str = "avatar_url";

/// Arbitrary key-value metadata carried on an Identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMetadata(Map<String, Value>);

impl IdentityMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch containing only the onboarding flag
    pub fn onboarding(complete: bool) -> Self {
        let mut metadata = Self::new();
        metadata.set_has_completed_onboarding(complete);
        metadata
    }

    /// Raw access to an arbitrary key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set an arbitrary key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Merge another metadata map over this one (patch semantics)
    pub fn merge(&mut self, patch: &IdentityMetadata) {
        for (k, v) in &patch.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Authoritative onboarding flag; absent means not completed
    pub fn has_completed_onboarding(&self) -> bool {
        self.0
            .get(KEY_HAS_COMPLETED_ONBOARDING)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_has_completed_onboarding(&mut self, complete: bool) {
        self.0
            .insert(KEY_HAS_COMPLETED_ONBOARDING.into(), Value::Bool(complete));
    }

    pub fn display_name(&self) -> Option<&str> {
        self.0.get(KEY_DISPLAY_NAME).and_then(Value::as_str)
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.0
            .insert(KEY_DISPLAY_NAME.into(), Value::String(name.into()));
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.0.get(KEY_AVATAR_URL).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_flag_default_false() {
        let metadata = IdentityMetadata::new();
        assert!(!metadata.has_completed_onboarding());
    }

    #[test]
    fn test_onboarding_flag_roundtrip() {
        let mut metadata = IdentityMetadata::new();
        metadata.set_has_completed_onboarding(true);
        assert!(metadata.has_completed_onboarding());

        metadata.set_has_completed_onboarding(false);
        assert!(!metadata.has_completed_onboarding());
    }

    #[test]
    fn test_non_boolean_flag_treated_as_incomplete() {
        let mut metadata = IdentityMetadata::new();
        metadata.set(KEY_HAS_COMPLETED_ONBOARDING, Value::String("yes".into()));
        assert!(!metadata.has_completed_onboarding());
    }

    #[test]
    fn test_merge_preserves_unknown_keys() {
        let mut metadata = IdentityMetadata::new();
        metadata.set("theme", Value::String("dark".into()));

        metadata.merge(&IdentityMetadata::onboarding(true));

        assert!(metadata.has_completed_onboarding());
        assert_eq!(
            metadata.get("theme").and_then(Value::as_str),
            Some("dark")
        );
    }

    #[test]
    fn test_display_name() {
        let mut metadata = IdentityMetadata::new();
        assert_eq!(metadata.display_name(), None);

        metadata.set_display_name("Aki");
        assert_eq!(metadata.display_name(), Some("Aki"));
    }

    #[test]
    fn test_serde_transparent() {
        let metadata = IdentityMetadata::onboarding(true);
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"has_completed_onboarding":true}"#);
    }
}
