//! Reference collaborators and collection builders.
//!
//! The counting implementations here satisfy the codec seams with the
//! simplest semantics that exercise the engine: every class carries an
//! explicit section cost, interning adds costs, and the serialized form is
//! a text listing tests can parse back.

use dexpack_codec::{
    ClassDef, ClassFile, ClassPool, CodecError, CodecResult, FileDecoder, FormatVersion,
    PoolFactory, SectionCounts,
};
use dexpack_store::SegmentStore;
use std::marker::PhantomData;

/// A class definition with an explicit section cost.
///
/// The counting pool needs to know how much a class grows each section;
/// real codecs derive that from class content, the testkit carries it
/// directly.
pub trait CostedClass: ClassDef {
    /// Returns the section cost of interning this class.
    fn costs(&self) -> SectionCounts;
}

impl<T: CostedClass + ?Sized> CostedClass for &T {
    fn costs(&self) -> SectionCounts {
        (**self).costs()
    }
}

/// A fake class definition with a name and fixed section costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeClass {
    type_name: String,
    costs: SectionCounts,
}

impl FakeClass {
    /// Creates a class costing one type reference and nothing else.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            costs: SectionCounts::new(1, 0, 0),
        }
    }

    /// Sets the section costs of this class.
    #[must_use]
    pub fn with_costs(mut self, types: usize, fields: usize, methods: usize) -> Self {
        self.costs = SectionCounts::new(types, fields, methods);
        self
    }
}

impl ClassDef for FakeClass {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl CostedClass for FakeClass {
    fn costs(&self) -> SectionCounts {
        self.costs
    }
}

/// Builds `count` classes, each costing one type and `methods_each` method
/// references.
///
/// Type names are unique and ordered (`Lfake/C0000;`, `Lfake/C0001;`, ...).
#[must_use]
pub fn classes_with_methods(count: usize, methods_each: usize) -> Vec<FakeClass> {
    (0..count)
        .map(|i| FakeClass::new(format!("Lfake/C{i:04};")).with_costs(1, 0, methods_each))
        .collect()
}

/// A parsed container file holding fake classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFile {
    classes: Vec<FakeClass>,
    version: Option<FormatVersion>,
}

impl FakeFile {
    /// Creates a file from classes and an optional version.
    #[must_use]
    pub fn new(classes: Vec<FakeClass>, version: Option<FormatVersion>) -> Self {
        Self { classes, version }
    }
}

impl ClassFile for FakeFile {
    type Class = FakeClass;

    fn classes(&self) -> &[FakeClass] {
        &self.classes
    }

    fn version(&self) -> Option<FormatVersion> {
        self.version
    }
}

/// A reference [`ClassPool`] that counts section costs additively.
///
/// Interning appends the class to an entry list and adds its costs to the
/// counters; `mark`/`reset` snapshot and restore both. `write_to`
/// serializes the listing format [`CountingCodec`] parses back:
///
/// ```text
/// dexpack-counting <version|->
/// <type_name> <types> <fields> <methods>
/// ...
/// ```
#[derive(Debug)]
pub struct CountingPool<C> {
    version: Option<FormatVersion>,
    counts: SectionCounts,
    entries: Vec<(String, SectionCounts)>,
    marked: Option<(SectionCounts, usize)>,
    _class: PhantomData<fn() -> C>,
}

impl<C> CountingPool<C> {
    /// Creates an empty pool declaring the given version.
    #[must_use]
    pub fn new(version: Option<FormatVersion>) -> Self {
        Self {
            version,
            counts: SectionCounts::default(),
            entries: Vec::new(),
            marked: None,
            _class: PhantomData,
        }
    }

    /// Returns the type names interned so far, in intern order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl<C: CostedClass> ClassPool for CountingPool<C> {
    type Class = C;

    fn mark(&mut self) {
        self.marked = Some((self.counts, self.entries.len()));
    }

    fn intern_class(&mut self, class: &C) {
        let costs = class.costs();
        self.counts.types += costs.types;
        self.counts.fields += costs.fields;
        self.counts.methods += costs.methods;
        self.entries.push((class.type_name().to_owned(), costs));
    }

    fn reset(&mut self) {
        if let Some((counts, len)) = self.marked.take() {
            self.counts = counts;
            self.entries.truncate(len);
        }
    }

    fn counts(&self) -> SectionCounts {
        self.counts
    }

    fn write_to(&mut self, store: &mut dyn SegmentStore) -> CodecResult<()> {
        let mut out = String::new();
        match self.version {
            Some(version) => out.push_str(&format!("dexpack-counting {}\n", version.as_u32())),
            None => out.push_str("dexpack-counting -\n"),
        }
        for (name, costs) in &self.entries {
            out.push_str(&format!(
                "{name} {} {} {}\n",
                costs.types, costs.fields, costs.methods
            ));
        }
        store.write_all(out.as_bytes())?;

        self.entries.clear();
        self.counts = SectionCounts::default();
        self.marked = None;
        Ok(())
    }
}

/// Factory producing [`CountingPool`]s for each segment.
#[derive(Debug, Clone, Default)]
pub struct CountingPoolFactory<C> {
    version: Option<FormatVersion>,
    _class: PhantomData<fn() -> C>,
}

impl<C> CountingPoolFactory<C> {
    /// Creates a factory producing version-less pools.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: None,
            _class: PhantomData,
        }
    }

    /// Sets the version written into each segment listing.
    #[must_use]
    pub fn with_version(mut self, version: FormatVersion) -> Self {
        self.version = Some(version);
        self
    }
}

impl<C: CostedClass> PoolFactory for CountingPoolFactory<C> {
    type Pool = CountingPool<C>;

    fn new_pool(&self) -> CountingPool<C> {
        CountingPool::new(self.version)
    }
}

/// Decoder for the listing format [`CountingPool`] writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingCodec;

impl CountingCodec {
    /// Creates a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FileDecoder for CountingCodec {
    type File = FakeFile;

    fn parse(&self, data: &[u8], offset: usize) -> CodecResult<FakeFile> {
        let data = data.get(offset..).ok_or(CodecError::UnexpectedEof)?;
        let text = std::str::from_utf8(data)
            .map_err(|_| CodecError::invalid_container("listing is not valid UTF-8"))?;

        let mut lines = text.lines();
        let header = lines.next().ok_or(CodecError::UnexpectedEof)?;
        let version = match header.strip_prefix("dexpack-counting ") {
            Some("-") => None,
            Some(raw) => Some(FormatVersion::new(raw.parse().map_err(|_| {
                CodecError::invalid_container(format!("bad version: {raw}"))
            })?)),
            None => return Err(CodecError::invalid_container("missing listing header")),
        };

        let mut classes = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split(' ');
            let name = parts
                .next()
                .ok_or_else(|| CodecError::invalid_container("missing type name"))?;
            let mut next_count = || -> CodecResult<usize> {
                parts
                    .next()
                    .ok_or_else(|| CodecError::invalid_container("missing section cost"))?
                    .parse()
                    .map_err(|_| CodecError::invalid_container("bad section cost"))
            };
            let types = next_count()?;
            let fields = next_count()?;
            let methods = next_count()?;
            classes.push(FakeClass::new(name).with_costs(types, fields, methods));
        }

        Ok(FakeFile::new(classes, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexpack_store::InMemoryStore;

    #[test]
    fn intern_adds_costs() {
        let mut pool: CountingPool<FakeClass> = CountingPool::new(None);

        pool.intern_class(&FakeClass::new("La;").with_costs(1, 2, 3));
        pool.intern_class(&FakeClass::new("Lb;").with_costs(1, 0, 4));

        assert_eq!(pool.counts(), SectionCounts::new(2, 2, 7));
        assert_eq!(pool.type_names(), vec!["La;", "Lb;"]);
    }

    #[test]
    fn reset_restores_mark() {
        let mut pool: CountingPool<FakeClass> = CountingPool::new(None);
        pool.intern_class(&FakeClass::new("La;").with_costs(1, 0, 1));

        pool.mark();
        pool.intern_class(&FakeClass::new("Lb;").with_costs(1, 0, 100));
        assert_eq!(pool.counts().methods, 101);

        pool.reset();
        assert_eq!(pool.counts(), SectionCounts::new(1, 0, 1));
        assert_eq!(pool.type_names(), vec!["La;"]);
    }

    #[test]
    fn write_then_parse_round_trips() {
        let mut pool: CountingPool<FakeClass> =
            CountingPool::new(Some(FormatVersion::new(39)));
        pool.intern_class(&FakeClass::new("La;").with_costs(1, 2, 3));
        pool.intern_class(&FakeClass::new("Lb;").with_costs(1, 0, 0));

        let mut store = InMemoryStore::new();
        pool.write_to(&mut store).unwrap();

        let file = CountingCodec::new().parse(store.data(), 0).unwrap();
        assert_eq!(file.version(), Some(FormatVersion::new(39)));
        assert_eq!(file.classes().len(), 2);
        assert_eq!(file.classes()[0], FakeClass::new("La;").with_costs(1, 2, 3));
        assert_eq!(file.classes()[1], FakeClass::new("Lb;").with_costs(1, 0, 0));
    }

    #[test]
    fn write_clears_the_pool() {
        let mut pool: CountingPool<FakeClass> = CountingPool::new(None);
        pool.intern_class(&FakeClass::new("La;"));

        let mut store = InMemoryStore::new();
        pool.write_to(&mut store).unwrap();

        assert_eq!(pool.counts(), SectionCounts::default());
        assert!(pool.type_names().is_empty());
    }

    #[test]
    fn parse_rejects_garbage() {
        let codec = CountingCodec::new();
        assert!(codec.parse(b"not a listing\n", 0).is_err());
        assert!(codec.parse(b"", 0).is_err());
    }

    #[test]
    fn parse_honors_offset() {
        let data = b"junkdexpack-counting -\nLa; 1 0 0\n";
        let file = CountingCodec::new().parse(data, 4).unwrap();
        assert_eq!(file.classes().len(), 1);
        assert_eq!(file.version(), None);
    }

    #[test]
    fn builder_produces_unique_ordered_names() {
        let classes = classes_with_methods(3, 2);
        assert_eq!(classes[0].type_name(), "Lfake/C0000;");
        assert_eq!(classes[2].type_name(), "Lfake/C0002;");
        assert_eq!(classes[1].costs(), SectionCounts::new(1, 0, 2));
    }
}
