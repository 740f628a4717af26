//! Lookups of values owned by a pool, registered through their keys.
#[path = "util.rs"]
mod util;

use shared_registry::config::{Compaction, Config};
use shared_registry::handle::HandleRegistry;
use shared_registry::pool::Pool;

use self::util::{init_logging, Widget};

#[test]
fn end_to_end() {
    init_logging();
    let mut pool = Pool::new();
    let mut registry = HandleRegistry::new();

    let x = pool.insert(Widget { name: "x" }).key();
    let y = pool.insert(Widget { name: "y" }).key();
    let z = pool.insert(Widget { name: "z" }).key();

    registry.add(&pool, "a", x);
    registry.add(&pool, "a", y);
    registry.add(&pool, "b", z);

    assert_eq!(registry.get(&pool, "a"), [x, y]);
    assert_eq!(registry.get(&pool, "b"), [z]);
    assert!(registry.get(&pool, "c").is_empty());

    let names: Vec<_> = registry
        .values(&pool, "a")
        .into_iter()
        .map(|widget| widget.name)
        .collect();
    assert_eq!(names, ["x", "y"]);
}

#[test]
fn removal_hides_the_value() {
    init_logging();
    let mut pool = Pool::new();
    let mut registry = HandleRegistry::new();

    let x = pool.insert(1u32).key();
    let y = pool.insert(2u32).key();
    registry.add(&pool, "a", x);
    registry.add(&pool, "a", y);

    assert_eq!(pool.remove(x), Some(1));
    assert_eq!(registry.get(&pool, "a"), [y]);
    assert_eq!(registry.values(&pool, "a"), [&2]);
    assert_eq!(registry.tombstones(&pool, "a"), 1);

    pool.remove(y);
    assert!(registry.get(&pool, "a").is_empty());
    assert_eq!(registry.stored("a"), 2);
}

#[test]
fn reused_slot_is_not_resurrected() {
    init_logging();
    let mut pool = Pool::new();
    let mut registry = HandleRegistry::new();

    let old = pool.insert("old").key();
    registry.add(&pool, 0u8, old);
    pool.remove(old);

    let new = pool.insert("new").key();
    assert!(registry.get(&pool, &0).is_empty());
    assert!(registry.values(&pool, &0).is_empty());
    assert!(pool.contains(new));
}

#[test]
fn entries_can_be_modified_in_place() {
    init_logging();
    let mut pool = Pool::new();
    let mut registry = HandleRegistry::new();

    let key = pool.insert(String::from("before")).key();
    registry.add(&pool, "a", key);

    let mut entry = pool.entry(key).expect("value is in the pool");
    entry.value_mut().push_str(" and after");
    assert_eq!(entry.value(), "before and after");

    assert_eq!(registry.values(&pool, "a"), [&String::from("before and after")]);

    pool.get_mut(key).expect("value is in the pool").clear();
    assert_eq!(registry.values(&pool, "a"), [&String::new()]);
}

#[test]
fn compaction() {
    init_logging();
    let mut pool = Pool::new();
    let mut registry = HandleRegistry::new();

    let keys: Vec<_> = (0..6).map(|i| pool.insert(i).key()).collect();
    for &key in &keys {
        registry.add(&pool, "a", key);
    }

    for &key in keys.iter().step_by(2) {
        pool.remove(key);
    }

    assert_eq!(registry.compact(&pool), 3);
    assert_eq!(registry.stored("a"), 3);
    assert_eq!(registry.get(&pool, "a"), [keys[1], keys[3], keys[5]]);
}

#[test]
fn compaction_on_add() {
    init_logging();
    let mut pool = Pool::new();
    let config = Config::with_compaction(Compaction::OnAdd);
    let mut registry = HandleRegistry::with_config(config);
    assert_eq!(registry.config(), &config);

    for i in 0..10 {
        let key = pool.insert(i).key();
        registry.add(&pool, "a", key);
        pool.remove(key);
    }

    assert_eq!(registry.stored("a"), 1);
    assert_eq!(registry.tombstones(&pool, "a"), 1);
    assert!(pool.is_empty());
    assert_eq!(registry.keys().collect::<Vec<_>>(), [&"a"]);
}
