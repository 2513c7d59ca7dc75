//! Merged view over a multi-entry container.

use crate::container::ClassContainer;
use crate::error::{CoreError, CoreResult};
use dexpack_codec::{newest_version, ClassDef, ClassFile, FormatVersion};
use std::collections::HashSet;

/// A container flattened into one class collection.
///
/// Entries are visited in container order and their classes concatenated,
/// so re-packing a merged container preserves segment order. Each type may
/// appear in at most one entry; a collision is a [`CoreError::DuplicateType`]
/// defect in the input, not something the engine repairs. The merged format
/// version is the newest any entry declares.
///
/// Classes are borrowed from the container; nothing is copied.
#[derive(Debug)]
pub struct MergedContainerFile<'a, C> {
    classes: Vec<&'a C>,
    version: Option<FormatVersion>,
}

impl<'a, C> MergedContainerFile<'a, C> {
    /// Flattens a container into one class collection.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateType`] if two entries define the same
    /// type.
    pub fn from_container<K>(container: &'a K) -> CoreResult<Self>
    where
        K: ClassContainer,
        K::File: ClassFile<Class = C>,
        C: ClassDef,
    {
        let entries = container.entries();

        // A single entry cannot collide with itself; skip the bookkeeping.
        if entries.len() == 1 {
            let file = entries[0].file();
            return Ok(Self {
                classes: file.classes().iter().collect(),
                version: file.version(),
            });
        }

        let mut classes: Vec<&'a C> = Vec::new();
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut version = None;

        for entry in entries {
            let file = entry.file();
            for class in file.classes() {
                if !seen.insert(class.type_name()) {
                    return Err(CoreError::duplicate_type(class.type_name()));
                }
                classes.push(class);
            }
            version = newest_version(version, file.version());
        }

        Ok(Self { classes, version })
    }

    /// Returns the merged classes in entry order.
    #[must_use]
    pub fn classes(&self) -> &[&'a C] {
        &self.classes
    }

    /// Iterates over the merged classes.
    pub fn iter(&self) -> impl Iterator<Item = &'a C> + '_ {
        self.classes.iter().copied()
    }

    /// Returns the reconciled format version.
    #[must_use]
    pub fn version(&self) -> Option<FormatVersion> {
        self.version
    }

    /// Returns the total class count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the container held no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<'a, C: ClassDef> ClassFile for MergedContainerFile<'a, C> {
    type Class = &'a C;

    fn classes(&self) -> &[&'a C] {
        &self.classes
    }

    fn version(&self) -> Option<FormatVersion> {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ContainerEntry, EntryName, SingletonContainer};
    use dexpack_testkit::{FakeClass, FakeFile};

    struct VecContainer {
        entries: Vec<ContainerEntry<FakeFile>>,
    }

    impl ClassContainer for VecContainer {
        type File = FakeFile;

        fn entries(&self) -> &[ContainerEntry<FakeFile>] {
            &self.entries
        }
    }

    fn entry(name: &str, classes: Vec<FakeClass>, version: u32) -> ContainerEntry<FakeFile> {
        ContainerEntry::new(
            EntryName::named(name),
            FakeFile::new(classes, Some(FormatVersion::new(version))),
        )
    }

    #[test]
    fn merges_entries_in_container_order() {
        let container = VecContainer {
            entries: vec![
                entry(
                    "classes.dex",
                    vec![FakeClass::new("La;"), FakeClass::new("Lb;")],
                    37,
                ),
                entry("classes2.dex", vec![FakeClass::new("Lc;")], 39),
            ],
        };

        let merged = MergedContainerFile::from_container(&container).unwrap();

        let names: Vec<_> = merged.iter().map(|class| class.type_name()).collect();
        assert_eq!(names, vec!["La;", "Lb;", "Lc;"]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.version(), Some(FormatVersion::new(39)));
    }

    #[test]
    fn duplicate_types_across_entries_are_rejected() {
        let container = VecContainer {
            entries: vec![
                entry("classes.dex", vec![FakeClass::new("La;")], 39),
                entry("classes2.dex", vec![FakeClass::new("La;")], 39),
            ],
        };

        let result = MergedContainerFile::from_container(&container);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateType { type_name }) if type_name == "La;"
        ));
    }

    #[test]
    fn single_entry_skips_duplicate_detection() {
        // One parsed file is trusted as-is, matching the read path for
        // singleton containers.
        let file = FakeFile::new(
            vec![FakeClass::new("La;"), FakeClass::new("La;")],
            Some(FormatVersion::new(39)),
        );
        let container = SingletonContainer::new(file);

        let merged = MergedContainerFile::from_container(&container).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_container_merges_to_nothing() {
        let container = VecContainer { entries: vec![] };

        let merged = MergedContainerFile::from_container(&container).unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.version(), None);
    }
}
