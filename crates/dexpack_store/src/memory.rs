//! In-memory segment store for testing.

use crate::error::StoreResult;
use crate::store::SegmentStore;

/// An in-memory segment store.
///
/// This store collects all written bytes in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral output that doesn't need persistence
///
/// # Example
///
/// ```rust
/// use dexpack_store::{InMemoryStore, SegmentStore};
///
/// let mut store = InMemoryStore::new();
/// store.write_all(b"test data").unwrap();
/// assert_eq!(store.size(), 9);
/// assert_eq!(store.data(), b"test data");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Vec<u8>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the store and returns the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl SegmentStore for InMemoryStore {
    fn write_all(&mut self, data: &[u8]) -> StoreResult<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        // In-memory store has no pending writes
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        // In-memory store has nothing to make durable
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.size(), 0);
        assert!(store.data().is_empty());
    }

    #[test]
    fn memory_write_accumulates() {
        let mut store = InMemoryStore::new();

        store.write_all(b"hello").unwrap();
        store.write_all(b" world").unwrap();

        assert_eq!(store.size(), 11);
        assert_eq!(store.data(), b"hello world");
    }

    #[test]
    fn memory_empty_write() {
        let mut store = InMemoryStore::new();
        store.write_all(b"").unwrap();
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn memory_into_bytes() {
        let mut store = InMemoryStore::new();
        store.write_all(b"segment").unwrap();
        assert_eq!(store.into_bytes(), b"segment");
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut store = InMemoryStore::new();
        store.write_all(b"data").unwrap();
        assert!(store.flush().is_ok());
        assert!(store.sync().is_ok());
    }
}
