//! Key-value storage backends for the cache
//!
//! The cache never talks to a concrete medium directly. It is handed something
//! implementing [`KeyValueStorage`], which lets the same cache run against a
//! directory on disk in the CLI and an in-memory map in tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backend refused the write because it is full
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// A previous holder of the storage lock panicked
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Minimal string key-value medium, modelled on browser local storage
pub trait KeyValueStorage: Send + Sync {
    /// Reads the raw value for a key, `None` if the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a raw value, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a key. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Lists every key currently stored
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-process storage backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    /// Maximum total bytes (keys + values) the storage will hold
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates an empty, unbounded storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage that rejects writes past `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the storage holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;

        if let Some(quota) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.keys().cloned().collect())
    }
}

/// Storage that keeps one JSON file per key in a directory
///
/// Uses `~/.cache/rideau/` on Linux by default, or the equivalent XDG path on
/// other platforms. ASCII alphanumerics, `_` and `-` are kept in file names;
/// every other byte of a key is written as `%XX`, so distinct keys never share
/// a file and `keys()` reports them unchanged.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a FileStorage in the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "rideau")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStorage rooted at a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entry files
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling temp file, then rename over the target
        let path = self.path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(decode_key)
            {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

fn is_file_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Maps a storage key to a file-safe name
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if is_file_safe(byte) {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name
}

/// Inverse of [`encode_key`]; `None` for names this storage did not write
fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut key = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                key.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            byte if is_file_safe(byte) => {
                key.push(byte);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = FileStorage::with_dir(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();

        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
        storage.remove_item("a").unwrap();
        assert!(storage.get_item("a").unwrap().is_none());
        // Removing again is fine
        storage.remove_item("a").unwrap();
    }

    #[test]
    fn test_memory_storage_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();

        let result = storage.set_item("other", "123456789");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert!(storage.get_item("other").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_quota_allows_overwrite_of_same_key() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "1234567").unwrap();
        storage.set_item("k", "7654321").unwrap();

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("7654321"));
    }

    #[test]
    fn test_file_storage_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let storage = FileStorage::with_dir(nested.clone());

        storage.set_item("entry", "{}").unwrap();

        assert!(nested.join("entry.json").exists());
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(storage.get_item("nothing").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_keys_lists_json_entries_only() {
        let (storage, temp_dir) = create_test_storage();
        storage.set_item("first", "1").unwrap();
        storage.set_item("second", "2").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_file_storage_keys_on_missing_dir_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = FileStorage::with_dir(temp_dir.path().join("absent"));
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("rideau_cache_property_details_123"), "rideau_cache_property_details_123");
        assert_eq!(encode_key("a/b:c"), "a%2Fb%3Ac");
        assert_eq!(decode_key("a%2Fb%3Ac").as_deref(), Some("a/b:c"));
        assert_eq!(decode_key("bad%zz"), None);
        assert_eq!(decode_key("has space"), None);
    }

    #[test]
    fn test_file_storage_keeps_similar_keys_apart() {
        let (storage, _temp_dir) = create_test_storage();
        storage.set_item("a.b", "dot").unwrap();
        storage.set_item("a_b", "underscore").unwrap();
        storage.set_item("café", "accent").unwrap();

        assert_eq!(storage.get_item("a.b").unwrap().as_deref(), Some("dot"));
        assert_eq!(storage.get_item("a_b").unwrap().as_deref(), Some("underscore"));

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a.b".to_string(), "a_b".to_string(), "café".to_string()]);

        storage.remove_item("a.b").unwrap();
        assert_eq!(storage.get_item("a_b").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(storage) = FileStorage::new() {
            let path_str = storage.dir.to_string_lossy();
            assert!(path_str.contains("rideau"), "Cache path should contain project name");
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
