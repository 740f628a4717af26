use slotmap::{DefaultKey, SlotMap};

/// Owns values on behalf of its users, handing out keys to refer to them.
///
/// This is the explicitly managed counterpart to reference counting. A value lives exactly until
/// it is removed from the pool, and all keys referring to it become stale at that moment. Keys are
/// versioned: a slot reused by a later insertion is not reachable through older keys.
pub struct Pool<V> {
    items: SlotMap<DefaultKey, V>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey(DefaultKey);

/// A handle on a value inside the pool.
pub struct PoolEntry<'pool, V> {
    /// The key of the slot map referring to this entry.
    key: DefaultKey,
    /// The value inside the pool.
    value: &'pool mut V,
}

impl<V> Pool<V> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Pool {
            items: SlotMap::new(),
        }
    }

    /// Get a mutable handle of a value in the pool.
    pub fn entry(&mut self, PoolKey(key): PoolKey) -> Option<PoolEntry<'_, V>> {
        Some(PoolEntry {
            key,
            value: self.items.get_mut(key)?,
        })
    }

    /// Gift the pool a value.
    pub fn insert(&mut self, value: V) -> PoolEntry<'_, V> {
        let key = self.items.insert(value);

        PoolEntry {
            key,
            value: &mut self.items[key],
        }
    }

    pub fn get(&self, PoolKey(key): PoolKey) -> Option<&V> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, PoolKey(key): PoolKey) -> Option<&mut V> {
        self.items.get_mut(key)
    }

    /// Take a value out of the pool, invalidating all of its keys.
    pub fn remove(&mut self, PoolKey(key): PoolKey) -> Option<V> {
        self.items.remove(key)
    }

    pub fn contains(&self, PoolKey(key): PoolKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<V> PoolEntry<'_, V> {
    pub fn key(&self) -> PoolKey {
        PoolKey(self.key)
    }

    pub fn value(&self) -> &V {
        self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.value
    }
}

impl<V> Default for Pool<V> {
    fn default() -> Self {
        Pool::new()
    }
}

#[test]
fn stale_keys_do_not_see_reused_slots() {
    let mut pool = Pool::new();
    let old = pool.insert("old").key();
    assert_eq!(pool.remove(old), Some("old"));

    let new = pool.insert("new").key();
    assert_ne!(old, new);
    assert!(pool.get(old).is_none());
    assert_eq!(pool.get(new), Some(&"new"));
    assert_eq!(pool.len(), 1);
}
