//! # dexpack Testkit
//!
//! Test utilities for dexpack.
//!
//! This crate provides:
//! - A counting reference implementation of the codec collaborator seams
//!   ([`FakeClass`], [`CountingPool`], [`CountingCodec`])
//! - Collection builders for common test shapes
//! - Property-based test generators using proptest
//!
//! The serialized form the reference pool produces is a trivial text
//! listing - one line per interned class with its section costs - so tests
//! can read written segments back and verify partitions exactly.
//!
//! ## Usage
//!
//! ```rust
//! use dexpack_codec::{ClassPool, PoolFactory};
//! use dexpack_store::{InMemoryStore, SegmentStore};
//! use dexpack_testkit::{classes_with_methods, CountingPoolFactory, FakeClass};
//!
//! let classes = classes_with_methods(3, 1);
//! let factory: CountingPoolFactory<&FakeClass> = CountingPoolFactory::new();
//!
//! let mut pool = factory.new_pool();
//! for class in &classes {
//!     pool.intern_class(&class);
//! }
//! assert_eq!(pool.counts().methods, 3);
//!
//! let mut store = InMemoryStore::new();
//! pool.write_to(&mut store).unwrap();
//! assert!(store.size() > 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
