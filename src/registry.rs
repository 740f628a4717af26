use core::fmt;
use core::iter::FusedIterator;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::config::{Compaction, Config};
use crate::pointer::SharedPointer;

/// Groups non-owning references to shared values by key.
///
/// Values are registered through their strong pointer (`Rc<V>` or `Arc<V>`) but only a weak
/// observer is kept. A value disappears from lookups as soon as its last owner lets go of it, the
/// registry never extends its life.
///
/// ```
/// use std::rc::Rc;
/// use shared_registry::registry::SharedRegistry;
///
/// let mut registry = SharedRegistry::new();
/// let x = Rc::new("x");
/// let y = Rc::new("y");
///
/// registry.add("a", &x);
/// registry.add("a", &y);
/// assert_eq!(registry.get("a"), [x.clone(), y.clone()]);
///
/// drop(x);
/// assert_eq!(registry.get("a"), [y]);
/// assert!(registry.get("b").is_empty());
/// ```
pub struct SharedRegistry<K, P: SharedPointer> {
    /// Every weak reference ever added, per key, in the order of addition.
    ///
    /// Entries whose referent is gone stay here as tombstones until compacted.
    store: HashMap<K, Vec<P::Weak>>,
    config: Config,
}

/// The values still alive under one key, see [`SharedRegistry::iter`].
pub struct Live<'reg, P: SharedPointer> {
    slots: core::slice::Iter<'reg, P::Weak>,
}

impl<K: Eq + Hash, P: SharedPointer> SharedRegistry<K, P> {
    /// Create an empty registry which never compacts on its own.
    pub fn new() -> Self {
        SharedRegistry::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        SharedRegistry {
            store: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a value under a key, after all values previously added to that key.
    ///
    /// Only a weak reference is stored. The same value may be added multiple times, it is then
    /// also returned multiple times.
    pub fn add(&mut self, key: K, value: &P) {
        let values = self.store.entry(key).or_default();

        if let Compaction::OnAdd = self.config.compaction {
            let dropped = retain_live::<P>(values);
            if dropped > 0 {
                log::debug!("Dropped {} tombstones before registering", dropped);
            }
        }

        values.push(P::downgrade(value));
        log::trace!("Registered value, {} slots now stored under key", values.len());
    }

    /// Collect all values under the key which are still alive, in the order they were added.
    ///
    /// Returns an empty list for keys that were never used.
    pub fn get<Q>(&self, key: &Q) -> Vec<P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.iter(key).collect()
    }

    /// Iterate the values under the key which are still alive.
    ///
    /// Each value is upgraded when it is reached. A value whose last owner is dropped during the
    /// iteration is not yielded if it had not been reached yet.
    pub fn iter<Q>(&self, key: &Q) -> Live<'_, P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slots = self.store.get(key).map(Vec::as_slice).unwrap_or(&[]);

        Live {
            slots: slots.iter(),
        }
    }

    /// All keys that have had a value added, in arbitrary order.
    ///
    /// This includes keys whose values have all been dropped.
    pub fn keys(&self) -> impl Iterator<Item = &'_ K> {
        self.store.keys()
    }

    /// The number of slots, live or not, stored for a key.
    pub fn stored<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(key).map_or(0, Vec::len)
    }

    /// The number of stored slots of a key whose referent is gone.
    pub fn tombstones<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(key).map_or(0, |values| {
            values.iter().filter(|weak| P::is_dangling(weak)).count()
        })
    }

    /// Drop the slots of all values that are gone, returning how many there were.
    ///
    /// The order of the remaining values is not changed.
    pub fn compact(&mut self) -> usize {
        let dropped: usize = self
            .store
            .values_mut()
            .map(|values| retain_live::<P>(values))
            .sum();

        if dropped > 0 {
            log::debug!(
                "Compacted {} tombstones across {} keys",
                dropped,
                self.store.len()
            );
        }

        dropped
    }
}

/// Keep the entries whose referent is alive, return the number removed.
fn retain_live<P: SharedPointer>(values: &mut Vec<P::Weak>) -> usize {
    let before = values.len();
    values.retain(|weak| !P::is_dangling(weak));
    before - values.len()
}

impl<K: Eq + Hash, P: SharedPointer> Default for SharedRegistry<K, P> {
    fn default() -> Self {
        SharedRegistry::new()
    }
}

impl<K: fmt::Debug, P: SharedPointer> fmt::Debug for SharedRegistry<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, values) in &self.store {
            map.entry(key, &values.len());
        }
        map.finish()
    }
}

impl<P: SharedPointer> Iterator for Live<'_, P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.slots.by_ref().find_map(|weak| P::upgrade(weak))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<P: SharedPointer> FusedIterator for Live<'_, P> {}

#[test]
fn compaction_on_add_bounds_storage() {
    use std::rc::Rc;

    let mut registry = SharedRegistry::with_config(Config::with_compaction(Compaction::OnAdd));
    let keep = Rc::new(0u32);
    registry.add(0u8, &keep);

    for i in 1..100u32 {
        let temporary = Rc::new(i);
        registry.add(0u8, &temporary);
    }

    // The last temporary is dropped only after it was added.
    assert_eq!(registry.stored(&0), 2);
    assert_eq!(registry.tombstones(&0), 1);
    assert_eq!(registry.get(&0), [keep]);
}

#[test]
fn no_compaction_keeps_tombstones() {
    use std::rc::Rc;

    let mut registry = SharedRegistry::new();
    for i in 0..10u32 {
        registry.add("k", &Rc::new(i));
    }

    assert_eq!(registry.stored("k"), 10);
    assert_eq!(registry.tombstones("k"), 10);
    assert!(registry.get("k").is_empty());

    assert_eq!(registry.compact(), 10);
    assert_eq!(registry.stored("k"), 0);
    assert_eq!(registry.keys().count(), 1);
}
