//! Reminder dedup ledger.
//!
//! The ledger remembers which (category, subscription, threshold, day)
//! reminders were already shown. It is a best-effort capability: callers
//! only ever see `has -> bool` and `set -> ()`. Storage failures are logged
//! and swallowed by [`StoreLedger`], so a broken store can at worst cause a
//! duplicate reminder, never a failed call.

pub mod key;
pub mod memory;

pub use key::FlagKey;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Value written for a set flag.
pub const FLAG_SET: &str = "1";

/// Best-effort suppression flags.
pub trait Ledger {
    /// Whether the flag was set. Unreadable flags count as unset.
    fn has(&self, key: &FlagKey) -> bool;

    /// Set the flag. Failures are dropped.
    fn set(&mut self, key: &FlagKey);
}

/// Raw string key-value store behind a ledger.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores that can enumerate and delete keys, used for maintenance.
pub trait PrunableStore: KeyValueStore {
    /// All keys, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Delete every flag whose day key is earlier than `day_key`.
    ///
    /// Keys without a trailing day key are left alone. Returns the number
    /// of keys removed.
    fn prune_before(&mut self, day_key: &str) -> Result<usize, StoreError> {
        let stale: Vec<String> = self
            .keys()?
            .into_iter()
            .filter(|key| FlagKey::day_of(key).is_some_and(|day| day < day_key))
            .collect();

        for key in &stale {
            self.remove(key)?;
        }
        Ok(stale.len())
    }
}

/// Adapts any [`KeyValueStore`] into a never-failing [`Ledger`].
#[derive(Debug, Default)]
pub struct StoreLedger<S> {
    store: S,
}

impl<S: KeyValueStore> StoreLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> Ledger for StoreLedger<S> {
    fn has(&self, key: &FlagKey) -> bool {
        match self.store.get(key.as_str()) {
            Ok(value) => value.as_deref() == Some(FLAG_SET),
            Err(e) => {
                tracing::warn!(key = key.as_str(), error = %e, "ledger read failed, treating as unset");
                false
            }
        }
    }

    fn set(&mut self, key: &FlagKey) {
        if let Err(e) = self.store.set(key.as_str(), FLAG_SET) {
            tracing::warn!(key = key.as_str(), error = %e, "ledger write failed, flag dropped");
        }
    }
}
