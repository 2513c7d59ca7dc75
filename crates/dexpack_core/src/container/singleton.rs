//! Single-entry container.

use crate::container::{ClassContainer, ContainerEntry, EntryName};
use dexpack_codec::ClassFile;

/// A container wrapping exactly one parsed file.
///
/// Used for raw segments read from bare files, which have no entry name of
/// their own; the entry is [`EntryName::Undefined`] unless one is supplied.
#[derive(Debug, Clone)]
pub struct SingletonContainer<F> {
    entries: [ContainerEntry<F>; 1],
}

impl<F: ClassFile> SingletonContainer<F> {
    /// Wraps a file under an undefined entry name.
    #[must_use]
    pub fn new(file: F) -> Self {
        Self::with_name(EntryName::Undefined, file)
    }

    /// Wraps a file under the given entry name.
    #[must_use]
    pub fn with_name(name: EntryName, file: F) -> Self {
        Self {
            entries: [ContainerEntry::new(name, file)],
        }
    }

    /// Returns the wrapped file.
    #[must_use]
    pub fn file(&self) -> &F {
        self.entries[0].file()
    }
}

impl<F: ClassFile> ClassContainer for SingletonContainer<F> {
    type File = F;

    fn entries(&self) -> &[ContainerEntry<F>] {
        &self.entries
    }
}
