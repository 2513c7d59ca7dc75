//! File-based segment store for on-disk output.

use crate::error::StoreResult;
use crate::store::SegmentStore;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based segment store.
///
/// Creates (or truncates) the target file on construction and appends all
/// written bytes to it. An existing file at the same path is overwritten;
/// segment names are expected to be unique within one output directory.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use dexpack_store::{FileStore, SegmentStore};
/// use std::path::Path;
///
/// let mut store = FileStore::create(Path::new("classes.dex")).unwrap();
/// store.write_all(b"segment bytes").unwrap();
/// store.sync().unwrap();  // Ensure data is durable
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: File,
    written: u64,
}

impl FileStore {
    /// Creates a segment file at the given path, truncating any existing
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    /// Creates a segment file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be created.
    pub fn create_with_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::create(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentStore for FileStore {
    fn write_all(&mut self, data: &[u8]) -> StoreResult<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.file.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn size(&self) -> u64 {
        self.written
    }
}
