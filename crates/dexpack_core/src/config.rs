//! Write configuration.

use dexpack_codec::SectionLimits;

/// Number of classes a worker prefetches from the shared sequence per lock
/// acquisition.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Configuration for a segmentation run.
#[derive(Debug, Clone)]
pub struct WriteConfig {
    /// Whether to split into multiple segments. When `false`, exactly one
    /// segment is written containing the whole collection, ignoring the
    /// section limits.
    pub multi_dex: bool,

    /// Minimum class count the primary (first) segment must reach.
    pub min_main_count: usize,

    /// Whether the primary segment must stop growing exactly at
    /// `min_main_count` instead of filling to capacity.
    pub minimal_main: bool,

    /// Number of worker threads (1 selects the single-threaded path).
    pub thread_count: usize,

    /// Classes prefetched from the shared sequence per lock acquisition.
    pub batch_size: usize,

    /// Section ceilings applied identically to every segment.
    pub limits: SectionLimits,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            multi_dex: true,
            min_main_count: 0,
            minimal_main: false,
            thread_count: 1,
            batch_size: DEFAULT_BATCH_SIZE,
            limits: SectionLimits::default(),
        }
    }
}

impl WriteConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to split into multiple segments.
    #[must_use]
    pub const fn multi_dex(mut self, value: bool) -> Self {
        self.multi_dex = value;
        self
    }

    /// Sets the primary segment minimum class count.
    #[must_use]
    pub const fn min_main_count(mut self, count: usize) -> Self {
        self.min_main_count = count;
        self
    }

    /// Sets whether the primary segment is minimal.
    #[must_use]
    pub const fn minimal_main(mut self, value: bool) -> Self {
        self.minimal_main = value;
        self
    }

    /// Sets the worker thread count.
    #[must_use]
    pub const fn thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Sets the prefetch batch size.
    #[must_use]
    pub const fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the section ceilings.
    #[must_use]
    pub const fn limits(mut self, limits: SectionLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WriteConfig::default();
        assert!(config.multi_dex);
        assert!(!config.minimal_main);
        assert_eq!(config.min_main_count, 0);
        assert_eq!(config.thread_count, 1);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn builder_pattern() {
        let config = WriteConfig::new()
            .multi_dex(false)
            .min_main_count(42)
            .minimal_main(true)
            .thread_count(4)
            .batch_size(16)
            .limits(SectionLimits::uniform(100));

        assert!(!config.multi_dex);
        assert_eq!(config.min_main_count, 42);
        assert!(config.minimal_main);
        assert_eq!(config.thread_count, 4);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.limits, SectionLimits::uniform(100));
    }
}
