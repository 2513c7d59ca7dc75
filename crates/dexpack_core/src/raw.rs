//! Raw single-file segment read and write.
//!
//! The raw path bypasses naming and splitting entirely: one collection,
//! one pool, one sink. It exists for containers that live in a bare file
//! rather than a multidex directory. Overflow has no recovery here - there
//! is no next segment to spill into.

use crate::container::EntryName;
use crate::error::CoreResult;
use crate::writer::{handle_overflow, SegmentObserver};
use dexpack_codec::{ClassDef, ClassFile, ClassPool, FileDecoder, PoolFactory, SectionLimits};
use dexpack_store::{FileStore, SegmentStore};
use std::path::Path;
use tracing::debug;

/// Writes the whole collection as one raw segment into `store`.
///
/// Returns the number of classes written. The observer, if any, receives a
/// single record under [`EntryName::Undefined`].
///
/// # Errors
///
/// Any overflow is fatal: [`crate::CoreError::MinimumUnmet`] reports how
/// far the write got, or [`crate::CoreError::ClassTooLarge`] if the very
/// first class cannot fit.
pub fn write_raw<C, F, S>(
    store: &mut S,
    classes: &[C],
    pools: &F,
    limits: &SectionLimits,
    observer: Option<&dyn SegmentObserver>,
    target: &Path,
) -> CoreResult<usize>
where
    C: ClassDef,
    F: PoolFactory,
    F::Pool: ClassPool<Class = C>,
    S: SegmentStore,
{
    let mut pool = pools.new_pool();
    let mut class_count = 0usize;

    for class in classes {
        pool.intern_class(class);
        if pool.counts().exceeds(limits) {
            handle_overflow(class_count, classes.len(), class.type_name())?;
        }
        class_count += 1;
    }

    if let Some(observer) = observer {
        observer.record(target, &EntryName::Undefined, class_count);
    }
    pool.write_to(store)?;
    store.flush()?;
    debug!(path = %target.display(), classes = class_count, "raw segment written");

    Ok(class_count)
}

/// Writes the whole collection as one raw segment file at `path`.
///
/// # Errors
///
/// As [`write_raw`], plus file creation and sync failures.
pub fn write_raw_file<C, F>(
    path: &Path,
    classes: &[C],
    pools: &F,
    limits: &SectionLimits,
    observer: Option<&dyn SegmentObserver>,
) -> CoreResult<usize>
where
    C: ClassDef,
    F: PoolFactory,
    F::Pool: ClassPool<Class = C>,
{
    let mut store = FileStore::create(path)?;
    let count = write_raw(&mut store, classes, pools, limits, observer, path)?;
    store.sync()?;
    Ok(count)
}

/// Parses one raw container from `data` starting at `offset`.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid container.
pub fn read_raw_bytes<D: FileDecoder>(
    decoder: &D,
    data: &[u8],
    offset: usize,
) -> CoreResult<D::File> {
    Ok(decoder.parse(data, offset)?)
}

/// Reads and parses one raw container file.
///
/// The observer, if any, receives a record of the classes found, under
/// [`EntryName::Undefined`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid
/// container.
pub fn read_raw_file<D: FileDecoder>(
    decoder: &D,
    path: &Path,
    observer: Option<&dyn SegmentObserver>,
) -> CoreResult<D::File> {
    let data = std::fs::read(path)?;
    let file = decoder.parse(&data, 0)?;
    if let Some(observer) = observer {
        observer.record(path, &EntryName::Undefined, file.classes().len());
    }
    Ok(file)
}
