use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{validate, KvsEngine};
use crate::Result;

/// A key-value store guarded by a single reader-writer lock.
///
/// Readers proceed in parallel, but every write excludes all other
/// operations. Simpler than [`ShardedKvStore`](super::ShardedKvStore),
/// and the baseline it is benchmarked against.
#[derive(Clone, Default)]
pub struct LockedKvStore {
    map: Arc<RwLock<HashMap<String, String>>>,
}

impl LockedKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvsEngine for LockedKvStore {
    fn put(&self, key: String, value: String) -> Result<()> {
        validate(&key, &value)?;
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn delete(&self, key: &str) -> bool {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    fn keys(&self) -> Vec<String> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
