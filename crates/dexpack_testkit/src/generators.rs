//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random class collections and capacity
//! limits that maintain required invariants (unique type names, no single
//! class larger than the smallest generated limit).

use crate::fixtures::FakeClass;
use dexpack_codec::SectionLimits;
use proptest::prelude::*;

/// Largest per-class section cost the strategies produce.
///
/// [`section_limits_strategy`] never generates a ceiling below this, so a
/// generated collection never contains a class that cannot fit an empty
/// segment.
pub const MAX_CLASS_COST: usize = 4;

/// Strategy for generating class collections with unique, ordered names.
pub fn class_list_strategy(max_classes: usize) -> impl Strategy<Value = Vec<FakeClass>> {
    prop::collection::vec((1usize..=MAX_CLASS_COST, 0usize..=MAX_CLASS_COST), 0..max_classes)
        .prop_map(|costs| {
            costs
                .into_iter()
                .enumerate()
                .map(|(i, (methods, fields))| {
                    FakeClass::new(format!("Lgen/C{i:04};")).with_costs(1, fields, methods)
                })
                .collect()
        })
}

/// Strategy for generating section limits every generated class fits.
pub fn section_limits_strategy() -> impl Strategy<Value = SectionLimits> {
    (
        MAX_CLASS_COST..=64usize,
        MAX_CLASS_COST..=64usize,
        MAX_CLASS_COST..=64usize,
    )
        .prop_map(|(types, fields, methods)| SectionLimits {
            types,
            fields,
            methods,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexpack_codec::ClassDef;
    use crate::fixtures::CostedClass;

    proptest! {
        #[test]
        fn generated_names_are_unique(classes in class_list_strategy(64)) {
            let mut names: Vec<_> = classes.iter().map(|c| c.type_name().to_owned()).collect();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), classes.len());
        }

        #[test]
        fn generated_classes_fit_generated_limits(
            classes in class_list_strategy(64),
            limits in section_limits_strategy(),
        ) {
            for class in &classes {
                prop_assert!(!class.costs().exceeds(&limits));
            }
        }
    }
}
