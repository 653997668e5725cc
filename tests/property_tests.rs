//! Property-based tests for the derivation engine and the interpreter.
//!
//! These use proptest to check invariants across generated inputs that the hand-written fixtures only sample.

mod common;

use buildsmith::derive::{DerivationConfig, Deriver};
use buildsmith::eval::Value;
use buildsmith::outline::signatures;
use buildsmith_core::naming::{self, GENERIC_ALPHABET};
use proptest::prelude::*;

use common::*;

// =============================================================================
// Naming Properties
// =============================================================================

proptest! {
    /// A fresh generic letter never collides with the parameters already in scope.
    #[test]
    fn next_generic_avoids_existing(
        taken in prop::sample::subsequence(GENERIC_ALPHABET.to_vec(), 0..=GENERIC_ALPHABET.len()),
        preferred in prop::sample::select(GENERIC_ALPHABET.to_vec()),
    ) {
        let fresh = naming::next_generic(&taken, Some(preferred));
        prop_assert!(!taken.contains(&fresh.as_str()), "{fresh} is already taken in {taken:?}");
        if !taken.contains(&preferred) {
            prop_assert_eq!(fresh, preferred);
        }
    }

    /// Capitalized accessors keep the rest of the property name intact.
    #[test]
    fn accessor_names_wrap_the_property(name in "[a-z][a-zA-Z0-9]{0,8}") {
        let with = naming::with(&name);
        prop_assert!(with.starts_with("with"));
        prop_assert_eq!(with[4..].to_lowercase(), name.to_lowercase());
        prop_assert_eq!(&naming::getter(&name, false)[3..], &with[4..]);
    }
}

// =============================================================================
// Derivation Properties
// =============================================================================

fn field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 1..6).prop_map(|names| names.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every field of a plain record gets a getter and a fluent setter, in declaration order.
    #[test]
    fn plain_records_get_one_accessor_pair_per_field(names in field_names()) {
        let fields: Vec<(&str, _)> = names.iter().map(|n| (n.as_str(), int())).collect();
        let decl = record("Generated", &fields);
        let mut repo = scene_repo();
        repo.register_buildable(decl.clone());

        let family = Deriver::new(&mut repo, DerivationConfig::default())
            .derive_family(&decl)
            .expect("plain records always derive");

        let expected: Vec<String> = names
            .iter()
            .flat_map(|n| [format!("{}()", naming::getter(n, false)), format!("{}(int)", naming::with(n))])
            .collect();
        prop_assert_eq!(signatures(&family.fluent_interface), expected);
        prop_assert_eq!(family.builder.constructors.len(), 8);
    }

    /// Deriving twice from scratch yields the same declarations.
    #[test]
    fn derivation_is_deterministic(names in field_names()) {
        let fields: Vec<(&str, _)> = names.iter().map(|n| (n.as_str(), list_of(class("Point")))).collect();
        let decl = record("Generated", &fields);

        let derive = || {
            let mut repo = scene_repo();
            repo.register_buildable(decl.clone());
            let family = Deriver::new(&mut repo, DerivationConfig::default())
                .derive_family(&decl)
                .expect("derives");
            format!("{family:?}")
        };
        prop_assert_eq!(derive(), derive());
    }
}

// =============================================================================
// Round-trip Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn point_round_trip(x in any::<i32>(), y in any::<i32>()) {
        let mut scene = Scene::new();
        let original = scene.point(x.into(), y.into());
        let builder = scene.builder("Point", vec![original.clone()]);
        let built = scene.call(&builder, "build", vec![]);
        prop_assert!(scene.equal(&original, &built));
    }

    /// Array properties keep order and duplicates through a builder.
    #[test]
    fn tag_arrays_round_trip(tags in prop::collection::vec("[a-c]{0,2}", 0..6)) {
        let mut scene = Scene::new();
        let tags = Value::array(tags.iter().map(|t| Value::str(t)).collect());
        let original = scene.source("Tagged", vec![tags.clone()]);
        let builder = scene.builder("Tagged", vec![original.clone()]);
        let built = scene.call(&builder, "build", vec![]);

        prop_assert!(scene.equal(&original, &built));
        let rebuilt = scene.call(&built, "getTags", vec![]);
        prop_assert!(scene.equal(&rebuilt, &tags));
    }
}
