use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{validate, KvsEngine};
use crate::Result;

type Shard = RwLock<HashMap<String, String>>;

/// Upper bound on the shard count.
pub const MAX_SHARDS: usize = 1024;

/// A key-value store split into independently locked shards.
///
/// Each key is routed to one shard by hash. Operations on keys that
/// land in different shards never contend; operations on the same key
/// serialize on its shard's `RwLock`, which makes them linearizable.
/// No operation ever holds more than one shard lock.
#[derive(Clone)]
pub struct ShardedKvStore {
    /// Always a power of two in length.
    shards: Arc<[Shard]>,
    hasher: RandomState,
}

impl ShardedKvStore {
    /// Creates an empty store with a shard count derived from the
    /// number of CPUs.
    pub fn new() -> Self {
        Self::with_shards(num_cpus::get().saturating_mul(4))
    }

    /// Creates an empty store with at least `shards` shards.
    ///
    /// The count is clamped to `1..=MAX_SHARDS` and rounded up to the
    /// next power of two.
    pub fn with_shards(shards: usize) -> Self {
        let count = shards.clamp(1, MAX_SHARDS).next_power_of_two();
        let shards = (0..count)
            .map(|_| RwLock::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into();
        ShardedKvStore {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Number of shards backing this store.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &str) -> &Shard {
        let hash = self.hasher.hash_one(key) as usize;
        &self.shards[hash & (self.shards.len() - 1)]
    }

    fn read(shard: &Shard) -> RwLockReadGuard<'_, HashMap<String, String>> {
        // A panicking writer cannot leave a half-inserted entry behind.
        shard.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(shard: &Shard) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        shard.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ShardedKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvsEngine for ShardedKvStore {
    fn put(&self, key: String, value: String) -> Result<()> {
        validate(&key, &value)?;
        Self::write(self.shard(&key)).insert(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        Self::read(self.shard(key)).get(key).cloned()
    }

    fn delete(&self, key: &str) -> bool {
        Self::write(self.shard(key)).remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        // Shards are visited one at a time; each contributes a consistent
        // view of its own disjoint key set.
        let mut keys = Vec::new();
        for shard in self.shards.iter() {
            keys.extend(Self::read(shard).keys().cloned());
        }
        keys
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| Self::read(shard).len()).sum()
    }
}
