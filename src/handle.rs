use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::config::{Compaction, Config};
use crate::pool::{Pool, PoolKey};

/// Groups keys into a [`Pool`] by a registry key.
///
/// This is the registry for values without reference counting. The pool owns the values, the
/// registry only remembers their keys. Removing a value from the pool is what makes it vanish from
/// lookups, there is no separate deregistration. Each query takes the pool to resolve against;
/// using a pool other than the one the keys were created in gives unspecified (but safe) results.
pub struct HandleRegistry<K> {
    store: HashMap<K, Vec<PoolKey>>,
    config: Config,
}

impl<K: Eq + Hash> HandleRegistry<K> {
    pub fn new() -> Self {
        HandleRegistry::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        HandleRegistry {
            store: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a pooled value under a key, after all values previously added to that key.
    pub fn add<V>(&mut self, pool: &Pool<V>, key: K, handle: PoolKey) {
        let handles = self.store.entry(key).or_default();

        if let Compaction::OnAdd = self.config.compaction {
            let dropped = retain_live(pool, handles);
            if dropped > 0 {
                log::debug!("Dropped {} stale handles before registering", dropped);
            }
        }

        handles.push(handle);
        log::trace!("Registered {:?}, {} handles now stored under key", handle, handles.len());
    }

    /// The handles under the key still present in the pool, in the order they were added.
    pub fn get<Q, V>(&self, pool: &Pool<V>, key: &Q) -> Vec<PoolKey>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles(key)
            .iter()
            .copied()
            .filter(|&handle| pool.contains(handle))
            .collect()
    }

    /// Like `get` but resolve the handles to the values themselves.
    pub fn values<'pool, Q, V>(&self, pool: &'pool Pool<V>, key: &Q) -> Vec<&'pool V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles(key)
            .iter()
            .filter_map(|&handle| pool.get(handle))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'_ K> {
        self.store.keys()
    }

    /// The number of handles, stale or not, stored for a key.
    pub fn stored<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles(key).len()
    }

    /// The number of stored handles of a key whose value has left the pool.
    pub fn tombstones<Q, V>(&self, pool: &Pool<V>, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handles(key)
            .iter()
            .filter(|&&handle| !pool.contains(handle))
            .count()
    }

    /// Drop all stale handles, returning how many there were.
    pub fn compact<V>(&mut self, pool: &Pool<V>) -> usize {
        let dropped: usize = self
            .store
            .values_mut()
            .map(|handles| retain_live(pool, handles))
            .sum();

        if dropped > 0 {
            log::debug!("Compacted {} stale handles", dropped);
        }

        dropped
    }

    fn handles<Q>(&self, key: &Q) -> &[PoolKey]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn retain_live<V>(pool: &Pool<V>, handles: &mut Vec<PoolKey>) -> usize {
    let before = handles.len();
    handles.retain(|&handle| pool.contains(handle));
    before - handles.len()
}

impl<K: Eq + Hash> Default for HandleRegistry<K> {
    fn default() -> Self {
        HandleRegistry::new()
    }
}
