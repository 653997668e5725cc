use std::collections::HashMap;

use buildsmith_core::naming;
use buildsmith_core::vocab::{collections, primitives, roots};

#[test]
fn primitive_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, primitives::PrimitiveId> = HashMap::new();

    for info in primitives::PRIMITIVES {
        assert_eq!(
            primitives::from_str(info.canonical),
            Some(info.id),
            "primitive canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(primitives::as_str(info.id), info.canonical);
        assert_eq!(
            primitives::from_boxed(info.boxed),
            Some(info.id),
            "boxed name not resolvable: {}",
            info.boxed
        );

        for spelling in std::iter::once(info.canonical).chain(info.aliases.iter().copied()) {
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!(
                    "duplicate primitive spelling {:?}: {:?} and {:?}",
                    spelling, prev, info.id
                );
            }
        }
    }
}

#[test]
fn collection_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, collections::CollectionKind> = HashMap::new();

    for info in collections::COLLECTION_KINDS {
        assert_eq!(collections::from_str(info.canonical), Some(info.id));
        assert_eq!(collections::as_str(info.id), info.canonical);
        assert_eq!(
            collections::from_str(info.default_impl),
            Some(info.id),
            "default implementation {} must classify as its own shape",
            info.default_impl
        );

        for spelling in std::iter::once(info.canonical).chain(info.aliases.iter().copied()) {
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!(
                    "duplicate collection spelling {:?}: {:?} and {:?}",
                    spelling, prev, info.id
                );
            }
        }
    }
}

#[test]
fn collection_and_primitive_names_do_not_overlap() {
    for info in collections::COLLECTION_KINDS {
        assert!(!primitives::is_simple_value_name(info.canonical));
        assert!(roots::from_str(info.canonical).is_none());
    }
}

#[test]
fn library_roots_resolvable_with_matching_operations() {
    for info in roots::LIBRARY_ROOTS {
        assert_eq!(roots::from_str(info.canonical), Some(info.id));
        assert_eq!(roots::as_str(info.id), info.canonical);
        assert!(!info.params.is_empty(), "{} must be generic", info.canonical);
    }
    assert_eq!(
        roots::info_for(roots::LibraryRootId::VisitableBuilder).operation,
        Some(naming::BUILD_METHOD)
    );
    assert_eq!(
        roots::info_for(roots::LibraryRootId::Editable).operation,
        Some(naming::EDIT_METHOD)
    );
    assert_eq!(
        roots::info_for(roots::LibraryRootId::Nested).operation,
        Some(naming::AND_METHOD)
    );
}

#[test]
fn generic_alphabet_has_no_duplicates() {
    let mut letters: Vec<&str> = naming::GENERIC_ALPHABET.to_vec();
    letters.sort_unstable();
    letters.dedup();
    assert_eq!(letters.len(), 26);
}
