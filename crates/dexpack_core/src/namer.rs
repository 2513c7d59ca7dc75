//! Segment naming.
//!
//! Output segments follow the conventional multidex sequence:
//! `classes.dex`, `classes2.dex`, `classes3.dex`, ... The first name carries
//! no number and numbering starts at 2, so the sequence round-trips through
//! [`SegmentNamer::index_of`] unambiguously.

use std::cmp::Ordering;

/// Maps segment indexes to output names and back.
///
/// Implementations must be bijective over valid names:
/// `index_of(&name_for(i)) == Some(i)` for every index.
pub trait SegmentNamer: Send + Sync {
    /// Returns the name of the segment at `index` (0-based).
    fn name_for(&self, index: usize) -> String;

    /// Returns the index a valid segment name refers to.
    fn index_of(&self, name: &str) -> Option<usize>;

    /// Returns `true` if `name` belongs to this namer's sequence.
    fn is_valid(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

impl<T: SegmentNamer + ?Sized> SegmentNamer for &T {
    fn name_for(&self, index: usize) -> String {
        (**self).name_for(index)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        (**self).index_of(name)
    }
}

/// The standard `classes.dex` / `classesN.dex` namer.
///
/// # Example
///
/// ```rust
/// use dexpack_core::{BasicSegmentNamer, SegmentNamer};
///
/// let namer = BasicSegmentNamer::new();
/// assert_eq!(namer.name_for(0), "classes.dex");
/// assert_eq!(namer.name_for(1), "classes2.dex");
/// assert_eq!(namer.index_of("classes10.dex"), Some(9));
/// assert!(!namer.is_valid("classes1.dex"));
/// ```
#[derive(Debug, Clone)]
pub struct BasicSegmentNamer {
    prefix: String,
    extension: String,
}

impl Default for BasicSegmentNamer {
    fn default() -> Self {
        Self {
            prefix: "classes".to_owned(),
            extension: ".dex".to_owned(),
        }
    }
}

impl BasicSegmentNamer {
    /// Creates the default `classes` / `.dex` namer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namer with a custom prefix and extension.
    #[must_use]
    pub fn with_format(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }
}

impl SegmentNamer for BasicSegmentNamer {
    fn name_for(&self, index: usize) -> String {
        if index == 0 {
            format!("{}{}", self.prefix, self.extension)
        } else {
            format!("{}{}{}", self.prefix, index + 1, self.extension)
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let middle = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.extension.as_str())?;
        if middle.is_empty() {
            return Some(0);
        }
        // Numbering starts at 2; leading zeros would alias valid names.
        if middle.starts_with('0') || !middle.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: usize = middle.parse().ok()?;
        if number < 2 {
            return None;
        }
        Some(number - 1)
    }
}

/// Stateful producer of the next segment name.
///
/// Used by the segmentation engine under the shared cursor lock, so name
/// assignment order equals segment finalization order.
#[derive(Debug)]
pub struct NameSequence<N> {
    namer: N,
    next_index: usize,
}

impl<N: SegmentNamer> NameSequence<N> {
    /// Creates a sequence starting at the first segment name.
    #[must_use]
    pub fn new(namer: N) -> Self {
        Self {
            namer,
            next_index: 0,
        }
    }

    /// Returns the next name in the sequence.
    pub fn next_name(&mut self) -> String {
        let name = self.namer.name_for(self.next_index);
        self.next_index += 1;
        name
    }

    /// Returns how many names have been produced.
    #[must_use]
    pub fn produced(&self) -> usize {
        self.next_index
    }
}

/// Total order over entry names used when enumerating a container
/// directory.
///
/// Names the namer recognizes sort by their segment index; unrecognized
/// names sort after all recognized ones, lexicographically among
/// themselves.
#[derive(Debug, Clone)]
pub struct NameOrdering<N> {
    namer: N,
}

impl<N: SegmentNamer> NameOrdering<N> {
    /// Creates an ordering for the given namer.
    #[must_use]
    pub fn new(namer: N) -> Self {
        Self { namer }
    }

    /// Compares two entry names.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.namer.index_of(a), self.namer.index_of(b)) {
            (Some(i), Some(j)) => i.cmp(&j),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}
