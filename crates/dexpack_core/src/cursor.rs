//! The lock-protected owner of the shared class sequence.
//!
//! In multi-threaded mode many workers drain one forward-only sequence.
//! Rather than handing the raw iterator to every worker, the cursor owns
//! it - together with the name counter - behind a single mutex, and exposes
//! only batch-granularity operations. The same lock orders segment naming
//! and the observer callback, so a worker finalizing a segment performs
//! naming, reporting and its batch refill in one acquisition.

use crate::namer::{NameSequence, SegmentNamer};
use parking_lot::{Mutex, MutexGuard};

/// Pulls classes from the locked shared sequence.
///
/// Implemented by [`CursorState`]; batched sources refill through this
/// seam while the cursor lock is already held.
pub trait ClassFeed<C> {
    /// Pulls the next class, or `None` when the sequence is exhausted.
    fn pull(&mut self) -> Option<C>;
}

/// The shared cursor: one class sequence and one name counter behind one
/// lock.
#[derive(Debug)]
pub struct SharedCursor<I: Iterator, N> {
    state: Mutex<CursorState<I, N>>,
}

/// The lock-protected cursor state.
///
/// Only ever touched through a [`SharedCursor`] guard; the raw sequence
/// never escapes.
#[derive(Debug)]
pub struct CursorState<I: Iterator, N> {
    classes: I,
    names: NameSequence<N>,
}

impl<I: Iterator, N: SegmentNamer> SharedCursor<I, N> {
    /// Creates a cursor over a class sequence and a fresh name sequence.
    pub fn new(classes: I, namer: N) -> Self {
        Self {
            state: Mutex::new(CursorState {
                classes,
                names: NameSequence::new(namer),
            }),
        }
    }

    /// Locks the cursor state.
    ///
    /// Worker threads block here; the guard should be held only for
    /// batch-granularity work (a prefetch, or naming plus refill at segment
    /// finalization).
    pub fn lock(&self) -> MutexGuard<'_, CursorState<I, N>> {
        self.state.lock()
    }
}

impl<I: Iterator, N: SegmentNamer> CursorState<I, N> {
    /// Returns the next segment name.
    pub fn next_name(&mut self) -> String {
        self.names.next_name()
    }

    /// Returns how many segment names have been assigned.
    #[must_use]
    pub fn names_assigned(&self) -> usize {
        self.names.produced()
    }
}

impl<I: Iterator, N: SegmentNamer> ClassFeed<I::Item> for CursorState<I, N> {
    fn pull(&mut self) -> Option<I::Item> {
        self.classes.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::BasicSegmentNamer;

    #[test]
    fn pull_drains_the_sequence_once() {
        let cursor = SharedCursor::new(0..3, BasicSegmentNamer::new());

        let mut state = cursor.lock();
        assert_eq!(state.pull(), Some(0));
        assert_eq!(state.pull(), Some(1));
        assert_eq!(state.pull(), Some(2));
        assert_eq!(state.pull(), None);
    }

    #[test]
    fn names_are_assigned_in_lock_order() {
        let cursor = SharedCursor::new(std::iter::empty::<u32>(), BasicSegmentNamer::new());

        assert_eq!(cursor.lock().next_name(), "classes.dex");
        assert_eq!(cursor.lock().next_name(), "classes2.dex");
        assert_eq!(cursor.lock().names_assigned(), 2);
    }

    #[test]
    fn cursor_is_shared_across_threads() {
        let cursor = SharedCursor::new(0..1000u32, BasicSegmentNamer::new());

        let totals: Vec<usize> = std::thread::scope(|scope| {
            (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut pulled = 0;
                        while cursor.lock().pull().is_some() {
                            pulled += 1;
                        }
                        pulled
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(totals.iter().sum::<usize>(), 1000);
    }
}
