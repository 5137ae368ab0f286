//! Local Storage Abstraction
//!
//! Narrow key-value port over whatever the host environment offers
//! (browser local storage, a settings file, plain memory). Values stored
//! here are hints only; nothing behind this trait is authoritative.

use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value port for client-local persistence
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory implementation
///
/// Doubles as the non-browser default and the test backend; contents do
/// not survive the process, which matches the "hint only" contract.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("local store poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("local store poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("local store poisoned").remove(key);
    }
}
