//! # dexpack Core
//!
//! Capacity-bounded multidex segmentation engine.
//!
//! This crate packs a class collection into one or more fixed-capacity
//! segment containers (`classes.dex`, `classes2.dex`, ...), splitting
//! whenever any pool section would exceed its ceiling. It provides:
//!
//! - [`SegmentWriter`] - the packing engine, single-threaded or with a
//!   worker pool draining one shared sequence
//! - [`BatchedClasses`] / [`SharedCursor`] - lock-bounded batched iteration
//!   over the shared sequence
//! - [`BasicSegmentNamer`] - the standard multidex naming sequence
//! - [`DirectoryContainer`] / [`SingletonContainer`] /
//!   [`MergedContainerFile`] - container enumeration and merging
//! - [`write_raw`] / [`read_raw_file`] - single-file segments without
//!   naming or splitting
//!
//! The binary container layout itself is a collaborator: the engine works
//! through the `dexpack_codec` traits and the `dexpack_store` sinks,
//! never touching bytes.
//!
//! ## Concurrency model
//!
//! In multi-threaded mode, `N` workers each own a private prefetched batch
//! and an exclusive pool; the only shared state is the cursor (sequence
//! plus name counter) behind one lock. Workers block only on that lock -
//! once per batch refill and once per segment finalization - and serialize
//! segments outside it. Cross-worker segment naming order is a race by
//! design; the guarantee is a complete partition with every class in
//! exactly one capacity-respecting segment, not byte-identical output to a
//! single-threaded run.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod config;
mod container;
mod cursor;
mod error;
mod namer;
mod raw;
mod source;
mod writer;

pub use cancel::CancelToken;
pub use config::{WriteConfig, DEFAULT_BATCH_SIZE};
pub use container::{
    ClassContainer, ContainerEntry, DirectoryContainer, EntryName, MergedContainerFile,
    SingletonContainer,
};
pub use cursor::{ClassFeed, CursorState, SharedCursor};
pub use error::{CoreError, CoreResult};
pub use namer::{BasicSegmentNamer, NameOrdering, NameSequence, SegmentNamer};
pub use raw::{read_raw_bytes, read_raw_file, write_raw, write_raw_file};
pub use source::{BatchedClasses, ClassSource, DirectClasses};
pub use writer::{SegmentObserver, SegmentWriter};
