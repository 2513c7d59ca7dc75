//! The capacity-bounded segmentation engine.
//!
//! The engine fills one pool per segment through a strict protocol: peek at
//! the next class without consuming it, checkpoint the pool, intern the
//! class, and compare the section counters against the limits. If the pool
//! overflowed, roll the intern back and finalize the segment - the peeked
//! class was never consumed, so it becomes the first class of the next
//! segment. Peeking before consuming is what makes overflow recoverable
//! over a shared, forward-only sequence: a consumed class could not be
//! pushed back.
//!
//! Segment finalization takes the shared cursor lock exactly once: the
//! segment name is assigned, the observer notified, and the worker's batch
//! refilled in the same acquisition. Serialization happens outside the
//! lock, so segment I/O overlaps across workers.

use crate::cancel::CancelToken;
use crate::config::WriteConfig;
use crate::container::EntryName;
use crate::cursor::SharedCursor;
use crate::error::{CoreError, CoreResult};
use crate::namer::SegmentNamer;
use crate::source::{BatchedClasses, ClassSource, DirectClasses};
use dexpack_codec::{ClassDef, ClassPool, PoolFactory, SectionLimits};
use dexpack_store::{SegmentStore, SinkFactory};
use std::path::Path;
use tracing::debug;

/// Receives one record per finalized segment.
///
/// On the multidex write path the callback runs under the shared cursor
/// lock, so records arrive in name-assignment order and the implementation
/// needs no ordering of its own.
pub trait SegmentObserver: Send + Sync {
    /// Records a finalized segment of `class_count` classes written as
    /// `name` into `target`.
    fn record(&self, target: &Path, name: &EntryName, class_count: usize);
}

/// Writes a class collection as one or more capacity-bounded segments.
///
/// The writer borrows its collaborators - a pool factory and a sink
/// factory - and carries the run configuration. One writer performs one
/// run per [`write`](Self::write) call.
///
/// # Example
///
/// ```rust
/// use dexpack_core::{BasicSegmentNamer, SegmentWriter, WriteConfig};
/// use dexpack_codec::SectionLimits;
/// use dexpack_store::MemorySinks;
/// use dexpack_testkit::{classes_with_methods, CountingPoolFactory, FakeClass};
///
/// let classes = classes_with_methods(250, 1);
/// let pools: CountingPoolFactory<&FakeClass> = CountingPoolFactory::new();
/// let sinks = MemorySinks::new();
/// let config = WriteConfig::new().limits(SectionLimits {
///     methods: 100,
///     ..SectionLimits::default()
/// });
///
/// let writer = SegmentWriter::new(&pools, &sinks, config);
/// let segments = writer.write(classes.iter(), BasicSegmentNamer::new()).unwrap();
/// assert_eq!(segments, 3);
/// ```
pub struct SegmentWriter<'a, F, S> {
    pools: &'a F,
    sinks: &'a S,
    config: WriteConfig,
    observer: Option<&'a dyn SegmentObserver>,
    cancel: CancelToken,
}

impl<'a, F, S> SegmentWriter<'a, F, S> {
    /// Creates a writer over the given collaborators.
    pub fn new(pools: &'a F, sinks: &'a S, config: WriteConfig) -> Self {
        Self {
            pools,
            sinks,
            config,
            observer: None,
            cancel: CancelToken::new(),
        }
    }

    /// Sets the per-segment observer.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn SegmentObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sets the cancellation token workers observe.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl<'a, F, S> SegmentWriter<'a, F, S>
where
    F: PoolFactory + Sync,
    S: SinkFactory,
{
    /// Runs the segmentation and returns the number of segments written.
    ///
    /// Dispatches on the configuration: the forced single-segment mode and
    /// `thread_count <= 1` use the direct single-threaded path; otherwise
    /// `thread_count` workers drain the sequence through batched shared
    /// iteration. Worker 0 alone carries the primary-segment requirement.
    ///
    /// # Errors
    ///
    /// Returns an error if a class cannot fit an empty segment, the primary
    /// segment overflows below its required minimum, a sink fails, or the
    /// run is cancelled. In multi-threaded mode every worker is joined
    /// before the first error (in worker order) is reported.
    pub fn write<C, I, N>(&self, classes: I, namer: N) -> CoreResult<usize>
    where
        C: ClassDef + Send,
        I: IntoIterator<Item = C>,
        I::IntoIter: Send,
        N: SegmentNamer + Send,
        F::Pool: ClassPool<Class = C>,
    {
        let config = &self.config;

        if !config.multi_dex {
            // Forced single segment: capacity is ignored by construction,
            // so the whole collection lands in one segment.
            let cursor = SharedCursor::new(std::iter::empty::<C>(), namer);
            let mut source = DirectClasses::new(classes.into_iter());
            return write_segments(
                &mut source,
                &cursor,
                self.pools,
                self.sinks,
                &SectionLimits::unbounded(),
                0,
                false,
                true,
                self.observer,
                &self.cancel,
            );
        }

        if config.thread_count <= 1 {
            let cursor = SharedCursor::new(std::iter::empty::<C>(), namer);
            let mut source = DirectClasses::new(classes.into_iter());
            return write_segments(
                &mut source,
                &cursor,
                self.pools,
                self.sinks,
                &config.limits,
                config.min_main_count,
                config.minimal_main,
                false,
                self.observer,
                &self.cancel,
            );
        }

        let cursor = SharedCursor::new(classes.into_iter(), namer);

        // Construct the batched sources up front: each constructor performs
        // its initial prefetch, and a later worker whose prefetch comes up
        // empty is discarded rather than scheduled.
        let mut sources = Vec::with_capacity(config.thread_count);
        for index in 0..config.thread_count {
            let mut source = BatchedClasses::new(&cursor, config.batch_size);
            if index != 0 && !source.has_next() {
                break;
            }
            sources.push(source);
        }

        let results: Vec<CoreResult<usize>> = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(sources.len());
            for (index, mut source) in sources.into_iter().enumerate() {
                let (min_main_count, minimal_main) = if index == 0 {
                    (config.min_main_count, config.minimal_main)
                } else {
                    (0, false)
                };
                let cursor = &cursor;
                let pools = self.pools;
                let sinks = self.sinks;
                let limits = config.limits;
                let observer = self.observer;
                let cancel = self.cancel.clone();
                handles.push(scope.spawn(move || {
                    debug!(worker = index, "segment worker started");
                    write_segments(
                        &mut source,
                        cursor,
                        pools,
                        sinks,
                        &limits,
                        min_main_count,
                        minimal_main,
                        false,
                        observer,
                        &cancel,
                    )
                }));
            }
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        // Every worker has been observed; report the first failure in
        // worker order, or the total segment count.
        let mut segments = 0;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(count) => segments += count,
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(segments),
        }
    }
}

/// The packing loop one engine instance runs to completion.
///
/// `force_first` makes the loop produce a segment even when the source is
/// already exhausted (the forced single-segment mode). The primary-segment
/// requirement applies to the first segment this call produces and is
/// cleared afterwards.
#[allow(clippy::too_many_arguments)]
fn write_segments<Src, I, N, F, S>(
    source: &mut Src,
    cursor: &SharedCursor<I, N>,
    pools: &F,
    sinks: &S,
    limits: &SectionLimits,
    mut min_main_count: usize,
    mut minimal_main: bool,
    force_first: bool,
    observer: Option<&dyn SegmentObserver>,
    cancel: &CancelToken,
) -> CoreResult<usize>
where
    Src: ClassSource<Class = I::Item>,
    I: Iterator,
    I::Item: ClassDef,
    N: SegmentNamer,
    F: PoolFactory,
    F::Pool: ClassPool<Class = I::Item>,
    S: SinkFactory,
{
    let mut segments = 0usize;
    let mut force = force_first;

    while force || source.has_next() {
        force = false;
        cancel.check()?;

        let mut pool = pools.new_pool();
        let mut class_count = 0usize;

        while source.has_next() {
            if minimal_main && class_count >= min_main_count {
                break;
            }
            let overflowed = {
                let Some(class) = source.peek() else { break };
                pool.mark();
                pool.intern_class(class);
                if pool.counts().exceeds(limits) {
                    Some(class.type_name().to_owned())
                } else {
                    None
                }
            };
            match overflowed {
                Some(type_name) => {
                    pool.reset();
                    handle_overflow(class_count, min_main_count, &type_name)?;
                    // Recoverable: the rejected class was never consumed
                    // and seeds the next segment.
                    break;
                }
                None => {
                    source.take();
                    class_count += 1;
                }
            }
        }

        let name = {
            let mut state = cursor.lock();
            let name = state.next_name();
            if let Some(observer) = observer {
                observer.record(sinks.target(), &EntryName::named(name.as_str()), class_count);
            }
            source.refill_from(&mut *state);
            name
        };

        let mut store = sinks.create(&name)?;
        pool.write_to(&mut store)?;
        store.flush()?;
        debug!(segment = %name, classes = class_count, "segment written");

        segments += 1;
        min_main_count = 0;
        minimal_main = false;
    }

    Ok(segments)
}

/// The overflow policy: decides whether an overflowed segment may simply
/// end early.
///
/// A segment still short of its required minimum cannot be finalized, and
/// an empty segment that overflowed on its very first class can never fit
/// that class anywhere.
pub(crate) fn handle_overflow(
    class_count: usize,
    min_count: usize,
    type_name: &str,
) -> CoreResult<()> {
    if class_count < min_count {
        return Err(CoreError::minimum_unmet(class_count, min_count));
    }
    if class_count == 0 {
        return Err(CoreError::class_too_large(type_name));
    }
    Ok(())
}
