//! Persisted view preferences: last symbol and limit

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use services_common::{CLIENT_DEFAULT_LIMIT, PREF_LIMIT_KEY, PREF_SYMBOL_KEY};

/// Environment variable overriding the preference directory
pub const CACHE_DIR_ENV: &str = "TRADE_VIEWER_CACHE_DIR";
const PREFERENCES_FILE: &str = "preferences.json";

/// Preference storage errors
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key/value storage for preferences
pub trait KeyValueStore {
    /// Read a key
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Write a key
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Delete a key; absent keys are not an error
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written
    fn remove(&mut self, key: &str) -> Result<(), PreferenceError>;
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PreferenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON file store, one object of string values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `preferences.json` inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFERENCES_FILE))
    }

    /// `$TRADE_VIEWER_CACHE_DIR`, else the platform config dir, else `./cache`
    #[must_use]
    pub fn default_location() -> Self {
        let dir = std::env::var_os(CACHE_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("trade-viewer")))
            .unwrap_or_else(|| PathBuf::from("cache"));
        Self::in_dir(dir)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            debug!("No preference file found at: {}", self.path.display());
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        debug!("Preferences written to: {}", self.path.display());
        Ok(())
    }

    /// Current entries, starting over if the file is unreadable JSON
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        match self.read_all() {
            Err(PreferenceError::Corrupt(e)) => {
                warn!("Discarding corrupt preference file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), PreferenceError> {
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Symbol and limit last used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPreferences {
    pub symbol: Option<String>,
    pub limit: String,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            symbol: None,
            limit: CLIENT_DEFAULT_LIMIT.to_string(),
        }
    }
}

/// Reads and writes [`ViewPreferences`] through a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct ViewPreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> ViewPreferenceStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Remember `symbol` and `limit`. A blank symbol clears the stored one.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written
    pub fn save(&mut self, symbol: &str, limit: &str) -> Result<(), PreferenceError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            self.store.remove(PREF_SYMBOL_KEY)?;
        } else {
            self.store.set(PREF_SYMBOL_KEY, &symbol)?;
        }
        self.store.set(PREF_LIMIT_KEY, limit)?;
        info!(symbol = %symbol, limit = limit, "Saved view preferences");
        Ok(())
    }

    /// Stored preferences, with defaults for anything missing or unreadable
    pub fn load(&self) -> ViewPreferences {
        let read = |key: &str| match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read preference '{}': {}", key, e);
                None
            }
        };

        ViewPreferences {
            symbol: read(PREF_SYMBOL_KEY),
            limit: read(PREF_LIMIT_KEY).unwrap_or_else(|| CLIENT_DEFAULT_LIMIT.to_string()),
        }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_defaults_when_empty() {
        let prefs = ViewPreferenceStore::new(MemoryKeyValueStore::default());
        assert_eq!(prefs.load(), ViewPreferences::default());
        assert_eq!(prefs.load().limit, "100");
    }

    #[test]
    fn test_save_then_load() {
        let mut prefs = ViewPreferenceStore::new(MemoryKeyValueStore::default());
        prefs.save(" ethusdt ", "250").unwrap();
        assert_eq!(
            prefs.load(),
            ViewPreferences {
                symbol: Some("ETHUSDT".to_string()),
                limit: "250".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_symbol_removes_key() {
        let mut prefs = ViewPreferenceStore::new(MemoryKeyValueStore::default());
        prefs.save("BTCUSDT", "10").unwrap();
        prefs.save("  ", "20").unwrap();

        let store = prefs.into_inner();
        assert_eq!(store.get(PREF_SYMBOL_KEY).unwrap(), None);
        assert_eq!(store.get(PREF_LIMIT_KEY).unwrap().as_deref(), Some("20"));
    }
}
