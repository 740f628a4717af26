//! ## Quick guide
//!
//! 1. Create a `SharedRegistry` where owners and observers can both reach it
//! 2. Owners `add` their reference counted values under some key
//! 3. Observers `get` the values of a key that some owner still holds on to
//!
//! The registry never keeps a value alive. Dropping the last `Rc` or `Arc` of a value removes it
//! from all lookups, in every registry it was added to.
//!
//! When values are not reference counted, put them into a [`pool::Pool`] and register their keys
//! with a [`handle::HandleRegistry`] instead. Removing a value from the pool then takes the place
//! of dropping the last owner.
//!
//! Neither registry compacts its storage of gone values unless configured to, see
//! [`config::Compaction`].
pub mod config;
pub mod handle;
pub mod pointer;
pub mod pool;
pub mod registry;

pub use self::registry::SharedRegistry;
