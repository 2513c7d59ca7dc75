//! Sink factories mapping segment names to fresh stores.

use crate::error::{StoreError, StoreResult};
use crate::file::FileStore;
use crate::store::SegmentStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opens the output sink for a named segment.
///
/// The segmentation engine produces a stream of (segment name, finalized
/// pool) pairs; a sink factory turns each name into the sink the pool
/// serializes into. Factories are shared across worker threads, so they
/// must be `Send + Sync`; the stores they hand out are exclusively owned
/// by one worker.
pub trait SinkFactory: Send + Sync {
    /// The store type this factory produces.
    type Store: SegmentStore;

    /// Identity of the container being written, used for reporting.
    fn target(&self) -> &Path;

    /// Opens a fresh sink for the given segment name.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be created.
    fn create(&self, name: &str) -> StoreResult<Self::Store>;
}

/// A sink factory writing segment files into one directory.
///
/// # Example
///
/// ```no_run
/// use dexpack_store::{DirectorySinks, SinkFactory, SegmentStore};
/// use std::path::Path;
///
/// let sinks = DirectorySinks::new("out");
/// let mut store = sinks.create("classes.dex").unwrap();
/// store.write_all(b"segment bytes").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySinks {
    root: PathBuf,
}

impl DirectorySinks {
    /// Creates a factory rooted at the given directory.
    ///
    /// The directory itself is not created here; it must exist by the time
    /// the first sink is opened.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SinkFactory for DirectorySinks {
    type Store = FileStore;

    fn target(&self) -> &Path {
        &self.root
    }

    fn create(&self, name: &str) -> StoreResult<FileStore> {
        FileStore::create(&self.root.join(name))
    }
}

/// A sink factory collecting segments in memory, keyed by name.
///
/// Suitable for tests that need to inspect every written segment without
/// touching the file system. The factory is cheaply cloneable; clones share
/// the same segment map.
///
/// # Example
///
/// ```rust
/// use dexpack_store::{MemorySinks, SinkFactory, SegmentStore};
///
/// let sinks = MemorySinks::new();
/// let mut store = sinks.create("classes.dex").unwrap();
/// store.write_all(b"segment bytes").unwrap();
/// assert_eq!(sinks.contents("classes.dex").unwrap(), b"segment bytes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySinks {
    target: PathBuf,
    files: Arc<Mutex<BTreeMap<String, Arc<Mutex<Vec<u8>>>>>>,
}

impl MemorySinks {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: PathBuf::from("<memory>"),
            files: Arc::default(),
        }
    }

    /// Returns the written segment names in lexicographic order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.files.lock().keys().cloned().collect()
    }

    /// Returns the bytes written for a segment, if it exists.
    #[must_use]
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().get(name).map(|buf| buf.lock().clone())
    }

    /// Returns the number of segments written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Returns `true` if no segments have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl SinkFactory for MemorySinks {
    type Store = MemorySink;

    fn target(&self) -> &Path {
        &self.target
    }

    fn create(&self, name: &str) -> StoreResult<MemorySink> {
        let mut files = self.files.lock();
        if files.contains_key(name) {
            return Err(StoreError::duplicate_segment(name));
        }
        let buf = Arc::new(Mutex::new(Vec::new()));
        files.insert(name.to_owned(), Arc::clone(&buf));
        Ok(MemorySink { buf })
    }
}

/// A sink handle produced by [`MemorySinks`].
///
/// Writes land in the factory's shared segment map as they happen.
#[derive(Debug)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SegmentStore for MemorySink {
    fn write_all(&mut self, data: &[u8]) -> StoreResult<()> {
        self.buf.lock().extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn size(&self) -> u64 {
        self.buf.lock().len() as u64
    }
}
