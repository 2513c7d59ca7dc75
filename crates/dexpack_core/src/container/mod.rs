//! Multi-segment containers.
//!
//! A container maps entry names to parsed container files. Directory
//! containers enumerate segment files on disk; singleton containers wrap
//! one file that has no meaningful entry name; a merged view flattens a
//! container back into a single class collection for re-packing.

mod directory;
mod merged;
mod singleton;

pub use directory::DirectoryContainer;
pub use merged::MergedContainerFile;
pub use singleton::SingletonContainer;

use dexpack_codec::ClassFile;
use std::fmt;

/// The name of a container entry.
///
/// Some containers hold a single file that genuinely has no name (a raw
/// segment read from a bare file). That case is an explicit variant, not a
/// sentinel value: match on [`EntryName::Undefined`] rather than comparing
/// against a magic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryName {
    /// The entry has no name.
    Undefined,
    /// The entry is named within its container.
    Named(String),
}

impl EntryName {
    /// Creates a named entry name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the name, or `None` for an undefined entry name.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Undefined => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Returns `true` if this entry has no name.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("<unnamed>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// One entry of a container: a name and the parsed file under it.
#[derive(Debug, Clone)]
pub struct ContainerEntry<F> {
    name: EntryName,
    file: F,
}

impl<F> ContainerEntry<F> {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: EntryName, file: F) -> Self {
        Self { name, file }
    }

    /// Returns the entry name.
    #[must_use]
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    /// Returns the parsed file.
    #[must_use]
    pub fn file(&self) -> &F {
        &self.file
    }

    /// Consumes the entry and returns the parsed file.
    #[must_use]
    pub fn into_file(self) -> F {
        self.file
    }
}

/// A container of named class files.
pub trait ClassContainer {
    /// The parsed file type the entries hold.
    type File: ClassFile;

    /// Returns the entries in container order.
    fn entries(&self) -> &[ContainerEntry<Self::File>];

    /// Looks up an entry by name.
    fn entry(&self, name: &EntryName) -> Option<&ContainerEntry<Self::File>> {
        self.entries().iter().find(|entry| entry.name() == name)
    }
}
