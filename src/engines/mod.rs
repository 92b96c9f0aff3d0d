use crate::{KvError, Result};

/// Trait for an in-memory key-value storage engine.
///
/// Implementors provide a concurrent string-to-string mapping with
/// put, get, delete and key enumeration.
///
/// Engines must be cloneable (cheaply, via `Arc`) and safe to share
/// across threads: every clone is a handle onto the same mapping, so
/// the shell and each worker of a thread pool can hold their own.
pub trait KvsEngine: Clone + Send + Sync + 'static {
    /// Sets the value of a string key to a string.
    ///
    /// If the key already exists, the previous value is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::EmptyKeyOrValue`] without touching the store if
    /// either the key or the value is empty or whitespace-only.
    fn put(&self, key: String, value: String) -> Result<()>;

    /// Gets the value of a given key.
    ///
    /// Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Option<String>;

    /// Removes a given key.
    ///
    /// Returns `false` if the key did not exist.
    fn delete(&self, key: &str) -> bool;

    /// Returns every key currently present, each exactly once, in no
    /// particular order.
    fn keys(&self) -> Vec<String>;

    /// Returns the number of keys currently present.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks that neither the key nor the value is blank.
pub(crate) fn validate(key: &str, value: &str) -> Result<()> {
    if key.trim().is_empty() || value.trim().is_empty() {
        return Err(KvError::EmptyKeyOrValue);
    }
    Ok(())
}

mod locked;
mod sharded;

pub use self::locked::LockedKvStore;
pub use self::sharded::{ShardedKvStore, MAX_SHARDS};
