use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// A strong, reference counted pointer that can hand out non-owning observers.
///
/// The registries never hold a value of this type. They store `Self::Weak` and try to recover a
/// strong pointer on each lookup, which fails once every strong owner has been dropped.
pub trait SharedPointer: Sized {
    /// The observer which does not keep the referent alive.
    type Weak: Clone;

    fn downgrade(this: &Self) -> Self::Weak;

    /// Get back a strong pointer, or `None` if the referent was reclaimed.
    fn upgrade(weak: &Self::Weak) -> Option<Self>;

    /// Check if the referent is gone, without creating a strong pointer.
    fn is_dangling(weak: &Self::Weak) -> bool {
        Self::upgrade(weak).is_none()
    }

    /// Identity, not equality of the pointee.
    fn ptr_eq(this: &Self, other: &Self) -> bool;
}

impl<T: ?Sized> SharedPointer for Rc<T> {
    type Weak = rc::Weak<T>;

    fn downgrade(this: &Self) -> Self::Weak {
        Rc::downgrade(this)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }

    fn is_dangling(weak: &Self::Weak) -> bool {
        weak.strong_count() == 0
    }

    fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(this, other)
    }
}

impl<T: ?Sized> SharedPointer for Arc<T> {
    type Weak = sync::Weak<T>;

    fn downgrade(this: &Self) -> Self::Weak {
        Arc::downgrade(this)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }

    fn is_dangling(weak: &Self::Weak) -> bool {
        weak.strong_count() == 0
    }

    fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(this, other)
    }
}

#[test]
fn dangling_after_last_owner() {
    let strong = Rc::new(5u8);
    let weak = SharedPointer::downgrade(&strong);
    assert!(!<Rc<u8>>::is_dangling(&weak));

    let second = Rc::clone(&strong);
    drop(strong);
    assert!(!<Rc<u8>>::is_dangling(&weak));

    drop(second);
    assert!(<Rc<u8>>::is_dangling(&weak));
    assert!(<Rc<u8>>::upgrade(&weak).is_none());
}

#[test]
fn unsized_pointees() {
    let strong: Arc<str> = Arc::from("shared");
    let weak = SharedPointer::downgrade(&strong);
    let back = <Arc<str>>::upgrade(&weak).expect("still owned");
    assert!(SharedPointer::ptr_eq(&strong, &back));
}
