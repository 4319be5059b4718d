//! JSON-file-backed key-value store

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};
use tracing::{debug, warn};

use super::KeyValueStore;

/// Key-value store persisted as a single JSON object on disk.
///
/// The whole map is rewritten on every `set`, so the file always reflects the
/// last committed mutation. A missing or malformed file yields an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path, loading any existing entries
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    debug!("Ignoring malformed store file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// The sibling path written before renaming over the real file
    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }

    /// Write the full entry map back to disk.
    ///
    /// The payload goes to a sibling temp file first and is renamed into
    /// place, so a crash mid-write leaves the previous file intact instead
    /// of a truncated one.
    fn flush(&self, entries: &HashMap<String, String>) {
        let payload = match serde_json::to_string_pretty(entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize store entries: {}", e);
                return;
            }
        };

        let staged = self.staging_path();
        if let Err(e) = fs::write(&staged, payload) {
            warn!("Failed to write store file {}: {}", staged.display(), e);
            return;
        }
        if let Err(e) = fs::rename(&staged, &self.path) {
            warn!("Failed to replace store file {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                self.flush(&entries);
            }
            Err(e) => {
                warn!("Failed to lock store entries: {}", e);
            }
        }
    }
}
