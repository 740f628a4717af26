// This is almost certainly not all used in all tests.
#![allow(dead_code)]
use shared_registry::pointer::SharedPointer;

/// A value without structural equality, so that only identity can be compared.
#[derive(Debug)]
pub struct Widget {
    pub name: &'static str,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assert that two lists hold the very same pointers, in order.
pub fn assert_same<P: SharedPointer + core::fmt::Debug>(found: &[P], expected: &[&P]) {
    assert_eq!(
        found.len(),
        expected.len(),
        "Expected {:?}, found {:?}",
        expected,
        found,
    );

    for (idx, (found, expected)) in found.iter().zip(expected).enumerate() {
        assert!(
            P::ptr_eq(found, expected),
            "Mismatch at index {}: expected {:?}, found {:?}",
            idx,
            expected,
            found,
        );
    }
}
