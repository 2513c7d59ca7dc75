//! # dexpack Codec
//!
//! Codec collaborator interfaces for dexpack.
//!
//! The segmentation engine treats the binary container format as an
//! external collaborator: it interns classes into an opaque pool, compares
//! the pool's section counters against capacity limits, and asks the pool
//! to serialize itself into a sink. This crate defines those seams:
//!
//! - [`ClassDef`] - an opaque class definition with a unique type name
//! - [`ClassFile`] / [`FileDecoder`] - a parsed container and its parser
//! - [`ClassPool`] / [`PoolFactory`] - the incremental segment builder with
//!   `mark`/`reset` checkpointing and three section counters
//! - [`SectionCounts`] / [`SectionLimits`] - the counters and their ceilings
//! - [`FormatVersion`] / [`newest_version`] - version reconciliation for
//!   merged containers
//!
//! No type in this crate knows a byte of container layout; a concrete dex
//! codec implements the traits, and `dexpack_testkit` provides a counting
//! reference implementation for tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod class;
mod decoder;
mod error;
mod pool;
mod version;

pub use class::{ClassDef, ClassFile};
pub use decoder::FileDecoder;
pub use error::{CodecError, CodecResult};
pub use pool::{ClassPool, PoolFactory, SectionCounts, SectionLimits, DEFAULT_SECTION_LIMIT};
pub use version::{newest_version, FormatVersion};
