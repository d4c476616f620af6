//! Session persistence for the last connected wallet provider
//!
//! The session record is a single string slot holding the id of the last descriptor that
//! connected successfully. It is written on success, cleared on disconnect and read once at
//! startup. Nothing here validates the id: the coordinator checks it against the registry.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage key holding the last-used provider id.
pub const SESSION_KEY: &str = "wallet_provider";

/// Durable slot for the last successfully connected provider id.
pub trait SessionStore: Send + Sync {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, id: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store, mostly for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(id: &str) -> Self {
        Self {
            slot: Mutex::new(Some(id.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, id: &str) -> Result<()> {
        *self.slot.lock() = Some(id.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Key-value file that survives process restarts but lives under the temp directory,
/// so it does not outlive the machine session.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .context("Failed to read session storage file")?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).context("Failed to parse session storage")
    }

    fn store(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create session storage directory")?;
        }

        let temp_path = self.path.with_extension("tmp");
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize session storage")?;
        std::fs::write(&temp_path, content).context("Failed to write session storage file")?;

        // Rename is atomic on Unix-like systems; fall back to copy across devices
        std::fs::rename(&temp_path, &self.path)
            .or_else(|_| {
                std::fs::copy(&temp_path, &self.path)?;
                std::fs::remove_file(&temp_path)?;
                Ok::<(), std::io::Error>(())
            })
            .context("Failed to finalize session storage file")
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(SESSION_KEY))
    }

    fn write(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(SESSION_KEY.to_string(), id.to_string());
        self.store(&entries)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        if entries.remove(SESSION_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.store(&entries)
    }
}

/// Default location of the session file: `$TMPDIR/evm-wallet-connect/session.json`.
pub fn default_session_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("evm-wallet-connect");
    path.push("session.json");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.read().unwrap(), None);

        store.write("metamask").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("metamask"));

        store.write("ledger").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("ledger"));

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        let store = FileSessionStore::new(path.clone());
        assert_eq!(store.read().unwrap(), None);
        assert!(!path.exists()); // Nothing is written until the first record

        store.write("walletconnect").unwrap();
        assert!(path.exists());

        // A fresh instance sees the record, as after a page reload
        let reopened = FileSessionStore::new(path.clone());
        assert_eq!(reopened.read().unwrap().as_deref(), Some("walletconnect"));

        reopened.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileSessionStore::new(path.clone());
        store.write("trezor").unwrap();
        store.clear().unwrap();

        let content: HashMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content.get("theme").map(String::as_str), Some("dark"));
        assert!(!content.contains_key(SESSION_KEY));
    }

    #[test]
    fn test_clear_without_file_is_noop() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileSessionStore::new(path.clone());

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(path.clone());
        assert!(store.read().is_err());

        // Writes refuse to replace a file they cannot parse
        assert!(store.write("metamask").is_err());
        assert!(store.clear().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }
}
