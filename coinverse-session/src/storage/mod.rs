//! Durable key-value persistence behind the credential and endpoint stores.
//!
//! Backends never surface errors to callers: a failed read looks like a
//! missing key and a failed write is logged here and otherwise ignored.

mod credentials;
mod endpoint;

pub use credentials::CredentialStore;
pub use endpoint::EndpointStore;

use arc_swap::ArcSwapOption;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::SessionError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`; `None` removes the key.
    fn set(&self, key: &str, value: Option<&str>);
}

/// JSON map on disk, readable and writable by the owner only.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(dir: &Path) -> Result<Self, SessionError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                SessionError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        let path = dir.join("session.json");
        let entries = Self::read_entries(&path);

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let parsed = fs::read_to_string(path)
            .map_err(SessionError::from)
            .and_then(|json| serde_json::from_str(&json).map_err(SessionError::from));

        match parsed {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(entries)?;

        // Write next to the target, then rename over it.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| SessionError::Storage(format!("Failed to write session file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)
                .map_err(|e| {
                    SessionError::Storage(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| {
                SessionError::Storage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| SessionError::Storage(format!("Failed to replace session file: {}", e)))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Option<&str>) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };

        match value {
            Some(value) => entries.insert(key.to_string(), value.to_string()),
            None => entries.remove(key),
        };

        if let Err(e) = self.persist(&entries) {
            tracing::warn!(key, error = %e, "Failed to persist session value");
        }
    }
}

/// Process-local store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Option<&str>) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        match value {
            Some(value) => entries.insert(key.to_string(), value.to_string()),
            None => entries.remove(key),
        };
    }
}

/// One key of a backend fronted by an atomically swapped in-memory copy, so
/// reads always see the last write of this process.
///
/// Writers are serialized so the copy and the backend agree on which write
/// came last.
struct Shadowed {
    key: &'static str,
    backend: Arc<dyn KeyValueStore>,
    current: ArcSwapOption<String>,
    writer: Mutex<()>,
}

impl Shadowed {
    fn new(key: &'static str, backend: Arc<dyn KeyValueStore>) -> Self {
        let current = ArcSwapOption::from(backend.get(key).map(Arc::new));
        Self {
            key,
            backend,
            current,
            writer: Mutex::new(()),
        }
    }

    fn get(&self) -> Option<String> {
        self.current.load_full().map(|value| value.as_ref().clone())
    }

    fn set(&self, value: Option<&str>) {
        let _guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.backend.set(self.key, value);
        self.current.store(value.map(|v| Arc::new(v.to_string())));
    }
}
