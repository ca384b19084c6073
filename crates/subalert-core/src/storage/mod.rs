mod config;
pub mod database;
pub mod flag_file;

pub use config::{Config, LedgerBackend, LedgerConfig, ReminderConfig};
pub use database::SqliteStore;
pub use flag_file::JsonFileStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};
use crate::ledger::{KeyValueStore, MemoryStore, PrunableStore};

/// Returns `~/.config/subalert[-dev]/` based on SUBALERT_ENV.
///
/// Set SUBALERT_ENV=dev to use development data directory, or
/// SUBALERT_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SUBALERT_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SUBALERT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("subalert-dev")
            } else {
                base_dir.join("subalert")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// A flag store chosen at runtime from [`LedgerConfig`].
pub enum AnyStore {
    Sqlite(SqliteStore),
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Open the configured backend.
    pub fn open(config: &LedgerConfig) -> Result<Self, crate::ReminderError> {
        let store = match config.backend {
            LedgerBackend::Memory => AnyStore::Memory(MemoryStore::new()),
            LedgerBackend::Sqlite => AnyStore::Sqlite(SqliteStore::open(&config.resolved_path()?)?),
            LedgerBackend::File => AnyStore::File(JsonFileStore::open(config.resolved_path()?)?),
        };
        tracing::debug!(backend = ?config.backend, "opened ledger store");
        Ok(store)
    }
}

impl KeyValueStore for AnyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.get(key),
            AnyStore::File(s) => s.get(key),
            AnyStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.set(key, value),
            AnyStore::File(s) => s.set(key, value),
            AnyStore::Memory(s) => s.set(key, value),
        }
    }
}

impl PrunableStore for AnyStore {
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.keys(),
            AnyStore::File(s) => s.keys(),
            AnyStore::Memory(s) => s.keys(),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.remove(key),
            AnyStore::File(s) => s.remove(key),
            AnyStore::Memory(s) => s.remove(key),
        }
    }
}
