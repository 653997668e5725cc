//! Nested builders: derived pairs and inline construction of composed values.

mod common;

use buildsmith::derive::{DerivationConfig, Deriver};
use buildsmith::eval::Value;
use buildsmith::outline::outline;
use buildsmith_model::{Kind, Method, Param, Property, TypeDecl, TypeParam, TypeRef};
use common::*;

#[test]
fn test_nested_pair_for_scalar_property() {
    let mut repo = scene_repo();
    let circle = circle();
    let pair = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_nested(&circle, &circle.properties[1])
        .unwrap();

    assert_eq!(pair.interface.id, id("CircleFluent.CenterNested"));
    assert_eq!(pair.interface.enclosing, Some(id("CircleFluent")));
    insta::assert_snapshot!(outline(&pair.implementation), @r"
    class CenterNestedImpl<N> extends PointFluentImpl<CenterNested<N>> implements CenterNested<N>, Nested<N>
      field PointBuilder builder
      new CenterNestedImpl(Point)
      new CenterNestedImpl()
      N and()
      N endCenter()
    ");
}

#[test]
fn test_nested_letter_avoids_target_parameters() {
    let mut repo = scene_repo();
    let pair_decl = TypeDecl::new(id("Pair"), Kind::Record)
        .with_param(TypeParam::new("N"))
        .with_property(Property::new("first", TypeRef::param("N")))
        .with_constructor_params(vec![Param::new("first", TypeRef::param("N"))])
        .with_method(Method::new("getFirst", TypeRef::param("N")));
    repo.register_buildable(pair_decl);
    let holder = record("Holder", &[("pair", TypeRef::class_with(id("Pair"), vec![string()]))]);

    let pair = Deriver::new(&mut repo, DerivationConfig::default())
        .derive_nested(&holder, &holder.properties[0])
        .unwrap();

    let params: Vec<String> = pair.interface.params.iter().map(ToString::to_string).collect();
    assert_eq!(params, vec!["N", "O"]);
    let extends: Vec<String> = pair.interface.extends.iter().map(ToString::to_string).collect();
    assert_eq!(extends, vec!["Nested<O>", "PairFluent<N, PairNested<N, O>>"]);
}

#[test]
fn test_configured_nested_letter_is_preferred() {
    let mut repo = scene_repo();
    let circle = circle();
    let pair = Deriver::new(&mut repo, DerivationConfig::default().with_nested_generic("Q"))
        .derive_nested(&circle, &circle.properties[1])
        .unwrap();
    assert_eq!(pair.interface.params[0].name, "Q");
}

#[test]
fn test_inline_form_builds_the_composed_value() {
    let mut scene = Scene::new();
    let builder = scene.builder("Circle", vec![]);
    scene.call(&builder, "withRadius", vec![Value::Float(1.5)]);
    scene.call(&builder, "withNewCenter", vec![Value::Int(1), Value::Int(2)]);
    let built = scene.call(&builder, "build", vec![]);

    let center = scene.call(&built, "getCenter", vec![]);
    let expected = scene.point(1, 2);
    assert!(scene.equal(&center, &expected));
}

#[test]
fn test_nested_builder_returns_to_the_enclosing_builder() {
    let mut scene = Scene::new();
    let builder = scene.builder("Circle", vec![]);
    let nested = scene.call(&builder, "withNewCenter", vec![]);
    scene.call(&nested, "withX", vec![Value::Int(5)]);
    scene.call(&nested, "withY", vec![Value::Int(6)]);
    let back = scene.call(&nested, "endCenter", vec![]);
    assert!(back.same_reference(&builder));

    let built = scene.call(&builder, "build", vec![]);
    let center = scene.call(&built, "getCenter", vec![]);
    let expected = scene.point(5, 6);
    assert!(scene.equal(&center, &expected));
}

#[test]
fn test_edit_reopens_the_current_value() {
    let mut scene = Scene::new();
    let center = scene.point(3, 4);
    let circle = scene.source("Circle", vec![Value::Float(2.0), center]);
    let builder = scene.builder("Circle", vec![circle]);

    let nested = scene.call(&builder, "editCenter", vec![]);
    scene.call(&nested, "withX", vec![Value::Int(9)]);
    scene.call(&nested, "and", vec![]);
    let built = scene.call(&builder, "build", vec![]);

    let center = scene.call(&built, "getCenter", vec![]);
    let expected = scene.point(9, 4);
    assert!(scene.equal(&center, &expected));
}

#[test]
fn test_collection_nested_builder_appends() {
    let mut scene = Scene::new();
    let root = scene.builder("Node", vec![]);
    scene.call(&root, "withLabel", vec![Value::str("root")]);
    for label in ["a", "b"] {
        let child = scene.call(&root, "addNewChildren", vec![]);
        scene.call(&child, "withLabel", vec![Value::str(label)]);
        scene.call(&child, "endChildren", vec![]);
    }
    let built = scene.call(&root, "build", vec![]);

    let children = scene.call(&built, "getChildren", vec![]);
    let labels: Vec<Value> = children
        .elements()
        .expect("list")
        .iter()
        .map(|child| scene.interp.field(child, "label").unwrap())
        .collect();
    assert!(matches!(&labels[..], [Value::Str(a), Value::Str(b)] if &**a == "a" && &**b == "b"));
}
