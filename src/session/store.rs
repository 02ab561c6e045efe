use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Fixed key for the wizard profile + completed-step blob
pub const WIZARD_STORAGE_KEY: &str = "shelfmate-wizard";

/// Fixed key for the chat transcript blob
pub const CHAT_STORAGE_KEY: &str = "shelfmate-chat";

/// Durable key-value storage for client session blobs
///
/// Injected into the session types so they can be tested without a real
/// backend. Values are opaque JSON strings.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str);
}

/// Loads and parses a stored blob
///
/// Corrupted or unparseable blobs are treated as absent, never fatal.
pub fn load_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupted session blob");
            None
        }
    }
}

/// Serializes and stores a blob
pub fn save_json<T: Serialize>(store: &dyn SessionStore, key: &str, value: &T) -> AppResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| AppError::Storage(e.to_string()))?;
    store.set(key, &raw)
}

/// File-backed store: one JSON file per key under a directory
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| AppError::Storage(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| AppError::Storage(e.to_string()))
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}

/// In-memory store used by tests
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}
