//! Worker-side views of the class sequence.
//!
//! The segmentation engine consumes classes through [`ClassSource`]: peek
//! at the next class without committing, then either take it (it fit) or
//! leave it in place (it overflowed and seeds the next segment). The
//! single-threaded path wraps the collection iterator directly; the
//! multi-threaded path prefetches private batches from the shared cursor so
//! lock contention is bounded by the batch size, not the item count.

use crate::cursor::{ClassFeed, SharedCursor};
use crate::namer::SegmentNamer;
use std::collections::VecDeque;
use std::iter::Peekable;

/// A worker's view of the class sequence, with non-consuming look-ahead.
pub trait ClassSource {
    /// The class type yielded by this source.
    type Class;

    /// Returns `true` if another class is available.
    fn has_next(&mut self) -> bool;

    /// Returns the next class without consuming it.
    fn peek(&mut self) -> Option<&Self::Class>;

    /// Consumes and returns the next class.
    fn take(&mut self) -> Option<Self::Class>;

    /// Refills this source from `feed` while the cursor lock is already
    /// held.
    ///
    /// Called by the engine at segment finalization so that naming and the
    /// refill share one lock acquisition. Sources that do not buffer ignore
    /// it.
    fn refill_from(&mut self, feed: &mut dyn ClassFeed<Self::Class>);
}

/// Direct pass-through source for the single-threaded path.
///
/// Owns the collection iterator outright; no lock is ever touched for
/// class access.
pub struct DirectClasses<I: Iterator> {
    classes: Peekable<I>,
}

impl<I: Iterator> DirectClasses<I> {
    /// Creates a source over the given iterator.
    pub fn new(classes: I) -> Self {
        Self {
            classes: classes.peekable(),
        }
    }
}

impl<I: Iterator> ClassSource for DirectClasses<I> {
    type Class = I::Item;

    fn has_next(&mut self) -> bool {
        self.classes.peek().is_some()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.classes.peek()
    }

    fn take(&mut self) -> Option<I::Item> {
        self.classes.next()
    }

    fn refill_from(&mut self, _feed: &mut dyn ClassFeed<I::Item>) {}
}

/// Batched source draining the shared cursor.
///
/// Maintains a private FIFO batch of prefetched classes. Construction
/// performs one locked prefetch; `has_next` and `peek` never touch the
/// lock; `take` refills as soon as the batch empties. With `K` classes
/// reaching this worker and batch size `B`, the worker acquires the lock
/// for roughly `K / B` prefetches instead of once per class.
pub struct BatchedClasses<'c, I: Iterator, N> {
    cursor: &'c SharedCursor<I, N>,
    batch: VecDeque<I::Item>,
    batch_size: usize,
    refills: usize,
}

impl<'c, I: Iterator, N: SegmentNamer> BatchedClasses<'c, I, N> {
    /// Creates a source over the shared cursor and performs the initial
    /// prefetch.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn new(cursor: &'c SharedCursor<I, N>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        let mut source = Self {
            cursor,
            batch: VecDeque::with_capacity(batch_size),
            batch_size,
            refills: 0,
        };
        source.preload();
        source
    }

    /// Acquires the cursor lock and fills the batch up to the batch size.
    pub fn preload(&mut self) {
        let cursor = self.cursor;
        let mut state = cursor.lock();
        self.refill_from(&mut *state);
    }

    /// Returns how many locked prefetches this source has performed.
    ///
    /// Diagnostic; includes the construction prefetch and finalization
    /// refills.
    #[must_use]
    pub fn refills(&self) -> usize {
        self.refills
    }
}

impl<'c, I: Iterator, N: SegmentNamer> ClassSource for BatchedClasses<'c, I, N> {
    type Class = I::Item;

    fn has_next(&mut self) -> bool {
        !self.batch.is_empty()
    }

    fn peek(&mut self) -> Option<&I::Item> {
        self.batch.front()
    }

    fn take(&mut self) -> Option<I::Item> {
        let item = self.batch.pop_front();
        if item.is_some() && self.batch.is_empty() {
            self.preload();
        }
        item
    }

    fn refill_from(&mut self, feed: &mut dyn ClassFeed<I::Item>) {
        self.refills += 1;
        while self.batch.len() < self.batch_size {
            match feed.pull() {
                Some(class) => self.batch.push_back(class),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::BasicSegmentNamer;

    fn cursor_over(
        count: u32,
    ) -> SharedCursor<std::ops::Range<u32>, BasicSegmentNamer> {
        SharedCursor::new(0..count, BasicSegmentNamer::new())
    }

    #[test]
    fn direct_source_peeks_without_consuming() {
        let mut source = DirectClasses::new(0..3);

        assert!(source.has_next());
        assert_eq!(source.peek(), Some(&0));
        assert_eq!(source.peek(), Some(&0));
        assert_eq!(source.take(), Some(0));
        assert_eq!(source.take(), Some(1));
        assert_eq!(source.take(), Some(2));
        assert!(!source.has_next());
        assert_eq!(source.take(), None);
    }

    #[test]
    fn batched_source_yields_in_prefetch_order() {
        let cursor = cursor_over(10);
        let mut source = BatchedClasses::new(&cursor, 4);

        let drained: Vec<u32> = std::iter::from_fn(|| source.take()).collect();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn batched_source_peek_does_not_consume() {
        let cursor = cursor_over(3);
        let mut source = BatchedClasses::new(&cursor, 2);

        assert_eq!(source.peek(), Some(&0));
        assert_eq!(source.peek(), Some(&0));
        assert_eq!(source.take(), Some(0));
        assert_eq!(source.peek(), Some(&1));
    }

    #[test]
    fn batch_never_exceeds_batch_size() {
        let cursor = cursor_over(100);
        let mut source = BatchedClasses::new(&cursor, 7);

        while source.has_next() {
            assert!(source.batch.len() <= 7);
            source.take();
        }
    }

    #[test]
    fn refills_are_amortized_over_the_batch_size() {
        // 10 items at batch size 4: construction, refills after items 4
        // and 8, and the final empty prefetch at exhaustion.
        let cursor = cursor_over(10);
        let mut source = BatchedClasses::new(&cursor, 4);

        while source.take().is_some() {}
        assert_eq!(source.refills(), 4);
    }

    #[test]
    fn empty_cursor_yields_empty_source() {
        let cursor = cursor_over(0);
        let mut source = BatchedClasses::new(&cursor, 4);

        assert!(!source.has_next());
        assert_eq!(source.peek(), None);
        assert_eq!(source.take(), None);
    }

    #[test]
    #[should_panic(expected = "batch_size must be positive")]
    fn zero_batch_size_panics() {
        let cursor = cursor_over(1);
        let _ = BatchedClasses::new(&cursor, 0);
    }

    #[test]
    fn every_item_is_yielded_to_exactly_one_source() {
        let cursor = SharedCursor::new(0..1000u32, BasicSegmentNamer::new());

        let mut collected: Vec<u32> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut source = BatchedClasses::new(&cursor, 16);
                        let mut items = Vec::new();
                        while let Some(item) = source.take() {
                            items.push(item);
                        }
                        items
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        collected.sort_unstable();
        assert_eq!(collected, (0..1000).collect::<Vec<_>>());
    }
}
