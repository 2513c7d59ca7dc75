//! Directory-backed container.

use crate::container::{ClassContainer, ContainerEntry, EntryName};
use crate::error::{CoreError, CoreResult};
use crate::namer::{NameOrdering, SegmentNamer};
use dexpack_codec::{ClassFile, FileDecoder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A container enumerated from segment files in one directory.
///
/// Only regular files whose names the namer recognizes are considered;
/// everything else in the directory is ignored. Entries are ordered by the
/// namer's segment index, so `classes.dex` comes before `classes2.dex`
/// before `classes10.dex` regardless of directory enumeration order.
#[derive(Debug)]
pub struct DirectoryContainer<F> {
    directory: PathBuf,
    entries: Vec<ContainerEntry<F>>,
}

impl<F: ClassFile> DirectoryContainer<F> {
    /// Enumerates and parses the segment files in `directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be read
    /// - A recognized segment file fails to parse
    /// - Two entries carry the same name
    pub fn open<D, N>(directory: &Path, namer: &N, decoder: &D) -> CoreResult<Self>
    where
        D: FileDecoder<File = F>,
        N: SegmentNamer + ?Sized,
    {
        let mut named: Vec<(String, F)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !namer.is_valid(&name) {
                continue;
            }
            if !seen.insert(name.clone()) {
                return Err(CoreError::duplicate_entry_name(name));
            }
            let data = std::fs::read(&path)?;
            let file = decoder.parse(&data, 0)?;
            named.push((name, file));
        }

        let ordering = NameOrdering::new(namer);
        named.sort_by(|a, b| ordering.compare(&a.0, &b.0));

        let entries = named
            .into_iter()
            .map(|(name, file)| ContainerEntry::new(EntryName::named(name), file))
            .collect();

        Ok(Self {
            directory: directory.to_path_buf(),
            entries,
        })
    }

    /// Returns the directory this container was enumerated from.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory held no recognized segment files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: ClassFile> ClassContainer for DirectoryContainer<F> {
    type File = F;

    fn entries(&self) -> &[ContainerEntry<F>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::BasicSegmentNamer;
    use dexpack_codec::{ClassPool, FormatVersion};
    use dexpack_store::FileStore;
    use dexpack_testkit::{CountingCodec, CountingPool, FakeClass, FakeFile};
    use tempfile::tempdir;

    fn write_segment(path: &Path, classes: &[FakeClass], version: u32) {
        let mut pool: CountingPool<FakeClass> =
            CountingPool::new(Some(FormatVersion::new(version)));
        for class in classes {
            pool.intern_class(class);
        }
        let mut store = FileStore::create(path).unwrap();
        pool.write_to(&mut store).unwrap();
    }

    #[test]
    fn open_orders_entries_by_segment_index() {
        let dir = tempdir().unwrap();
        // Written out of order on purpose.
        write_segment(
            &dir.path().join("classes10.dex"),
            &[FakeClass::new("Lj;")],
            39,
        );
        write_segment(&dir.path().join("classes.dex"), &[FakeClass::new("La;")], 39);
        write_segment(
            &dir.path().join("classes2.dex"),
            &[FakeClass::new("Lb;")],
            39,
        );

        let container: DirectoryContainer<FakeFile> =
            DirectoryContainer::open(dir.path(), &BasicSegmentNamer::new(), &CountingCodec::new())
                .unwrap();

        let names: Vec<_> = container
            .entries()
            .iter()
            .map(|entry| entry.name().to_string())
            .collect();
        assert_eq!(names, vec!["classes.dex", "classes2.dex", "classes10.dex"]);
    }

    #[test]
    fn open_ignores_unrecognized_files() {
        let dir = tempdir().unwrap();
        write_segment(&dir.path().join("classes.dex"), &[FakeClass::new("La;")], 39);
        std::fs::write(dir.path().join("resources.arsc"), b"not a segment").unwrap();
        std::fs::write(dir.path().join("classes1.dex"), b"invalid name").unwrap();
        std::fs::create_dir(dir.path().join("classes2.dex")).unwrap();

        let container: DirectoryContainer<FakeFile> =
            DirectoryContainer::open(dir.path(), &BasicSegmentNamer::new(), &CountingCodec::new())
                .unwrap();

        assert_eq!(container.len(), 1);
        assert_eq!(container.directory(), dir.path());
    }

    #[test]
    fn open_empty_directory() {
        let dir = tempdir().unwrap();

        let container: DirectoryContainer<FakeFile> =
            DirectoryContainer::open(dir.path(), &BasicSegmentNamer::new(), &CountingCodec::new())
                .unwrap();

        assert!(container.is_empty());
    }

    #[test]
    fn open_propagates_parse_errors() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("classes.dex"), b"garbage\n").unwrap();

        let result: CoreResult<DirectoryContainer<FakeFile>> =
            DirectoryContainer::open(dir.path(), &BasicSegmentNamer::new(), &CountingCodec::new());

        assert!(matches!(result, Err(CoreError::Codec(_))));
    }

    #[test]
    fn entry_lookup_by_name() {
        let dir = tempdir().unwrap();
        write_segment(&dir.path().join("classes.dex"), &[FakeClass::new("La;")], 39);

        let container: DirectoryContainer<FakeFile> =
            DirectoryContainer::open(dir.path(), &BasicSegmentNamer::new(), &CountingCodec::new())
                .unwrap();

        assert!(container.entry(&EntryName::named("classes.dex")).is_some());
        assert!(container.entry(&EntryName::named("classes2.dex")).is_none());
    }
}
