//! Durable key-value storage for exchange-rate snapshots.
//!
//! The cache is two fixed string keys, mirroring the browser-local storage
//! the admin form originally used. The store is an opaque cache, not a
//! database: every operation is best-effort and I/O failures degrade to
//! "no value" instead of propagating.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key holding the cached rate, stored as a decimal string.
pub const RATE_KEY: &str = "exchange_rate_tzs_usd";
/// Key holding the fetch time, stored as epoch milliseconds.
pub const FETCHED_AT_KEY: &str = "exchange_rate_fetch_time";

/// Opaque string key-value cache.
pub trait RateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local store, used in tests and for callers that opt out of
/// durable caching.
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryRateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// File-backed store holding one flat JSON object of string keys.
///
/// A corrupt or missing file reads as empty; write failures are swallowed.
#[derive(Debug, Clone)]
pub struct FileRateStore {
    path: PathBuf,
}

impl FileRateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$BEI_CACHE_DIR/rates.json`, falling back to `~/.cache/bei/rates.json`
    /// and finally a path relative to the working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(dir) = std::env::var("BEI_CACHE_DIR") {
            return Path::new(&dir).join("rates.json");
        }
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(".cache").join("bei").join("rates.json");
        }
        PathBuf::from(".bei-rates.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> HashMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|body| serde_json::from_str(&body).ok())
            .unwrap_or_default()
    }

    fn write_entries(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(body) = serde_json::to_string_pretty(entries) {
            let _ = fs::write(&self.path, body);
        }
    }
}

impl RateStore for FileRateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn put(&self, key: &str, value: &str) {
        let mut entries = self.read_entries();
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.read_entries();
        if entries.remove(key).is_some() {
            self.write_entries(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_keys() {
        let store = MemoryRateStore::new();
        assert_eq!(store.get(RATE_KEY), None);

        store.put(RATE_KEY, "2516.35");
        store.put(FETCHED_AT_KEY, "1700000000000");
        assert_eq!(store.get(RATE_KEY).as_deref(), Some("2516.35"));
        assert_eq!(store.get(FETCHED_AT_KEY).as_deref(), Some("1700000000000"));

        store.remove(RATE_KEY);
        assert_eq!(store.get(RATE_KEY), None);
    }

    #[test]
    fn file_store_round_trips_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileRateStore::new(dir.path().join("rates.json"));

        assert_eq!(store.get(RATE_KEY), None);
        store.put(RATE_KEY, "2516.35");
        store.put(FETCHED_AT_KEY, "1700000000000");

        // A second handle on the same path sees the persisted values.
        let reopened = FileRateStore::new(dir.path().join("rates.json"));
        assert_eq!(reopened.get(RATE_KEY).as_deref(), Some("2516.35"));

        reopened.remove(RATE_KEY);
        assert_eq!(store.get(RATE_KEY), None);
        assert_eq!(store.get(FETCHED_AT_KEY).as_deref(), Some("1700000000000"));
    }

    #[test]
    fn file_store_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rates.json");
        std::fs::write(&path, "not json at all {{{").expect("write");

        let store = FileRateStore::new(&path);
        assert_eq!(store.get(RATE_KEY), None);

        // Writing through the corrupt file replaces it.
        store.put(RATE_KEY, "2500");
        assert_eq!(store.get(RATE_KEY).as_deref(), Some("2500"));
    }

    #[test]
    fn file_store_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileRateStore::new(dir.path().join("nested").join("rates.json"));
        store.put(RATE_KEY, "2500");
        assert_eq!(store.get(RATE_KEY).as_deref(), Some("2500"));
    }
}
