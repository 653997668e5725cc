//! Shape of the derived declarations: names, generic parameters, supertypes and member signatures.
//!
//! Run with: `cargo test --test type_derivation_tests`
//! Review changes: `cargo insta review`

mod common;

use std::sync::Arc;

use buildsmith::derive::{DerivationConfig, Deriver};
use buildsmith::outline::{outline, signatures};
use buildsmith_model::TypeRepository;
use common::*;

fn derive_circle(config: DerivationConfig) -> (TypeRepository, buildsmith::DerivedFamily) {
    let mut repo = scene_repo();
    let circle = repo.get(&id("Circle")).cloned().expect("registered");
    let family = Deriver::new(&mut repo, config).derive_family(&circle).expect("circle derives");
    (repo, family)
}

#[test]
fn test_fluent_interface_outline() {
    let (_, family) = derive_circle(DerivationConfig::default());
    insta::assert_snapshot!(outline(&family.fluent_interface), @r"
    interface CircleFluent<S extends CircleFluent<S>> extends ShapeFluent<S>
      double getRadius()
      S withRadius(double)
      Point getCenter()
      S withCenter(Point)
      CenterNested<S> withNewCenter()
      CenterNested<S> withNewCenterLike(Point)
      S withNewCenter(int, int)
      CenterNested<S> editCenter()
      interface CenterNested<N> extends Nested<N>, PointFluent<CenterNested<N>>
        N and()
        N endCenter()
    ");
}

#[test]
fn test_editable_builder_outline() {
    let (_, family) = derive_circle(DerivationConfig::default());
    insta::assert_snapshot!(outline(&family.builder), @r"
    class CircleBuilder extends CircleFluentImpl<CircleBuilder> implements VisitableBuilder<Circle, CircleBuilder>
      field CircleFluent<?> fluent
      field boolean validationEnabled
      new CircleBuilder()
      new CircleBuilder(boolean)
      new CircleBuilder(CircleFluent<?>)
      new CircleBuilder(CircleFluent<?>, boolean)
      new CircleBuilder(CircleFluent<?>, Circle)
      new CircleBuilder(CircleFluent<?>, Circle, boolean)
      new CircleBuilder(Circle)
      new CircleBuilder(Circle, boolean)
      EditableCircle build()
      void validate(T)
      boolean equals(Object)
    ");
}

#[test]
fn test_editable_outline() {
    let (_, family) = derive_circle(DerivationConfig::default());
    let editable = family.editable.expect("editables are on by default");
    insta::assert_snapshot!(outline(&editable), @r"
    class EditableCircle extends Circle implements Editable<CircleBuilder>
      new EditableCircle(double, Point)
      CircleBuilder edit()
    ");
}

#[test]
fn test_fluent_impl_fields_hold_builders_for_buildable_values() {
    let (_, family) = derive_circle(DerivationConfig::default());
    let fluent_impl = &family.fluent_impl;

    assert_eq!(fluent_impl.simple_name(), "CircleFluentImpl");
    assert_eq!(fluent_impl.extends[0].to_string(), "ShapeFluentImpl<S>");
    assert_eq!(fluent_impl.implements[0].to_string(), "CircleFluent<S>");

    let fields: Vec<String> = fluent_impl
        .properties
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    assert_eq!(fields, vec!["double radius", "VisitableBuilder<? extends Point, ?> center"]);

    let ctors: Vec<String> = fluent_impl.constructors.iter().map(|c| c.signature()).collect();
    assert_eq!(ctors, vec!["CircleFluentImpl()", "CircleFluentImpl(Circle)"]);
    assert!(signatures(fluent_impl).contains(&"equals(Object)".to_string()));
    assert_eq!(fluent_impl.nested[0].simple_name(), "CenterNestedImpl");
}

#[test]
fn test_roots_anchor_types_without_buildable_superclass() {
    let mut repo = scene_repo();
    let shape = repo.get(&id("Shape")).cloned().expect("registered");
    let family = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_family(&shape)
        .expect("shape derives");

    assert_eq!(family.fluent_interface.extends[0].to_string(), "Fluent<S>");
    assert_eq!(family.fluent_impl.extends[0].to_string(), "BaseFluent<S>");
    assert!(family.builder.is_abstract());
    let build = family
        .builder
        .methods_named("build")
        .next()
        .expect("abstract builders still declare build()");
    assert!(build.body.is_none());
}

#[test]
fn test_builder_without_editables_builds_the_source_type() {
    let (repo, family) = derive_circle(DerivationConfig::default().with_editable_enabled(false));
    assert!(family.editable.is_none());
    assert!(!repo.contains(&id("EditableCircle")));

    let build = family.builder.methods_named("build").next().expect("build()");
    assert_eq!(build.return_type.to_string(), "Circle");
}

#[test]
fn test_inheritance_follows_buildable_superclass() {
    let mut repo = scene_repo();
    let lion = repo.get(&id("Lion")).cloned().expect("registered");
    let family = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_family(&lion)
        .expect("lion derives");

    assert_eq!(family.fluent_interface.extends[0].to_string(), "CatFluent<S>");
    assert_eq!(family.fluent_impl.extends[0].to_string(), "CatFluentImpl<S>");
    // Only the properties Lion declares; name and lives come from CatFluent.
    assert_eq!(signatures(&family.fluent_interface), vec!["getMane()", "withMane(String)"]);
}

#[test]
fn test_derivations_are_memoized_per_function_and_type() {
    let mut repo = scene_repo();
    let point = repo.get(&id("Point")).cloned().expect("registered");
    let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());

    let first = deriver.derive_fluent_interface(&point).unwrap();
    let second = deriver.derive_fluent_interface(&point).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    let (hits, _) = deriver.memo_stats();
    assert!(hits >= 1);

    deriver.reset();
    assert_eq!(deriver.memo_stats(), (0, 0));
    let third = deriver.derive_fluent_interface(&point).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(format!("{first:?}"), format!("{third:?}"));
}

#[test]
fn test_derive_buildables_skips_generated_declarations() {
    let mut repo = scene_repo();
    let families = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_buildables()
        .unwrap();

    let sources: Vec<&str> = families.iter().map(|f| f.source.simple_name()).collect();
    assert_eq!(
        sources,
        vec!["Point", "Shape", "Circle", "Square", "Drawing", "Node", "Tagged", "Cat", "Lion", "Temperature"]
    );
    assert!(repo.is_buildable(&id("EditableDrawing")));
}

#[test]
fn test_self_referential_type_derives() {
    let mut repo = scene_repo();
    let node = repo.get(&id("Node")).cloned().expect("registered");
    let family = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_family(&node)
        .expect("self reference terminates");

    let names = signatures(&family.fluent_interface);
    for expected in ["addToChildren(Node...)", "addNewChildren()", "addNewChildrenLike(Node)"] {
        assert!(names.contains(&expected.to_string()), "missing {expected} in {names:?}");
    }
    assert_eq!(family.fluent_interface.nested[0].simple_name(), "ChildrenNested");
}
