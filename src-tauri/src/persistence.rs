use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::state::Settings;

pub const STORE_FILE: &str = "the-break.json";
const SETTINGS_KEY: &str = "settings";

/// Key/value store with JSON values, shaped like the browser's local storage
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// One JSON object on disk, rewritten on every `set`
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse store file {:?}", path))?
        } else {
            tracing::info!("No store file at {:?}, starting empty", path);
            Map::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join("the-break").join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file {:?}", self.path))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.lock();
        // Memory only changes once the file holds the new value
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// Volatile store, for hosts without a writable data directory
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Open the JSON file store at `path`, or a volatile one when that fails
pub fn file_or_memory(path: Result<PathBuf>) -> Arc<dyn Storage> {
    match path.and_then(|path| JsonFileStorage::open(path)) {
        Ok(storage) => {
            tracing::info!("Using store file {:?}", storage.path());
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!("Failed to open store file: {:#}. Stories will not persist.", e);
            Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(feature = "desktop")]
pub use tauri_store::TauriStore;

#[cfg(feature = "desktop")]
mod tauri_store {
    use std::sync::Arc;
    use anyhow::Result;
    use serde_json::Value;
    use tauri::{AppHandle, Runtime};
    use tauri_plugin_store::{Store, StoreExt};

    use super::{Storage, STORE_FILE};

    /// Storage backed by `tauri-plugin-store` in the app data directory
    pub struct TauriStore<R: Runtime> {
        store: Arc<Store<R>>,
    }

    impl<R: Runtime> TauriStore<R> {
        pub fn open(app_handle: &AppHandle<R>) -> Result<Self> {
            let store = app_handle.store(STORE_FILE)?;
            Ok(Self { store })
        }
    }

    impl<R: Runtime> Storage for TauriStore<R> {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            Ok(self.store.get(key))
        }

        fn set(&self, key: &str, value: Value) -> Result<()> {
            self.store.set(key, value);
            self.store.save()?;
            Ok(())
        }
    }
}

pub fn load_settings(storage: &dyn Storage) -> Settings {
    match storage.get(SETTINGS_KEY) {
        Ok(Some(value)) => match serde_json::from_value::<Settings>(value) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to deserialize stored settings: {}. Using defaults.", e);
                Settings::default()
            }
        },
        Ok(None) => {
            tracing::info!("No stored settings found. Using defaults.");
            Settings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read settings store: {:#}. Using defaults.", e);
            Settings::default()
        }
    }
}

pub fn save_settings(storage: &dyn Storage, settings: &Settings) {
    match serde_json::to_value(settings) {
        Ok(value) => {
            if let Err(e) = storage.set(SETTINGS_KEY, value) {
                tracing::error!("Failed to save settings store to disk: {:#}", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORE_FILE);

        let storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", json!(["a", "b"])).unwrap();

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(json!(["a", "b"])));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "plain file").unwrap();

        let storage = JsonFileStorage::open(blocker.join(STORE_FILE)).unwrap();
        assert!(storage.set("k", json!(1)).is_err());
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_is_used_when_it_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let storage = file_or_memory(Ok(path.clone()));
        storage.set("k", json!("v")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unreadable_store_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{not json").unwrap();

        let storage = file_or_memory(Ok(path.clone()));
        storage.set("k", json!("v")).unwrap();
        assert_eq!(storage.get("k").unwrap(), Some(json!("v")));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");

        let storage = file_or_memory(Err(anyhow::anyhow!("no data directory")));
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn default_path_lives_under_the_app_directory() {
        if let Ok(path) = JsonFileStorage::default_path() {
            assert!(path.ends_with(Path::new("the-break").join(STORE_FILE)));
        }
    }

    #[test]
    fn corrupt_store_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{not json").unwrap();

        assert!(JsonFileStorage::open(&path).is_err());
    }

    #[test]
    fn settings_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.playback.words_per_minute = 120;

        save_settings(&storage, &settings);
        assert_eq!(load_settings(&storage), settings);
    }

    #[test]
    fn bad_settings_fall_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.set(SETTINGS_KEY, json!("nonsense")).unwrap();
        assert_eq!(load_settings(&storage), Settings::default());
    }
}
