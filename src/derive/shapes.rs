//! Shape classification of property types.
//!
//! A property's shape decides which method template it receives: arrays, ordered/unordered collections and maps
//! get collection-style mutators, everything else is a scalar.

use buildsmith_core::vocab::collections::{self, CollectionKind};
use buildsmith_core::vocab::primitives::{self, PrimitiveId};
use buildsmith_model::{ClassRef, TypeId, TypeRef};

use super::config::DerivationConfig;

/// Outer shape of a property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    List,
    Set,
    Map,
    Scalar,
}

impl Shape {
    /// Shapes whose elements are added one at a time.
    pub fn is_element_collection(self) -> bool {
        matches!(self, Shape::Array | Shape::List | Shape::Set)
    }
}

/// Collection kind of a non-array reference into the collection namespace.
pub(crate) fn collection_kind(ty: &TypeRef, config: &DerivationConfig) -> Option<CollectionKind> {
    let class = ty.as_class()?;
    if class.dimensions > 0 || class.id.namespace != config.collection_namespace {
        return None;
    }
    collections::from_str(&class.id.name)
}

pub(crate) fn shape_of(ty: &TypeRef, config: &DerivationConfig) -> Shape {
    if ty.is_array() {
        return Shape::Array;
    }
    match collection_kind(ty, config) {
        Some(CollectionKind::List) => Shape::List,
        Some(CollectionKind::Set) => Shape::Set,
        Some(CollectionKind::Map) => Shape::Map,
        None => Shape::Scalar,
    }
}

/// Element type: the component of an array, or the argument of a list or set.
///
/// Maps and scalars are returned unchanged; raw collections yield `Object`.
pub(crate) fn element_type(ty: &TypeRef, config: &DerivationConfig) -> TypeRef {
    if ty.is_array() {
        return ty.unwrap_array();
    }
    match collection_kind(ty, config) {
        Some(CollectionKind::List | CollectionKind::Set) => ty
            .as_class()
            .and_then(|c| c.arguments.first().cloned())
            .unwrap_or_else(|| object_ref(config)),
        Some(CollectionKind::Map) | None => ty.clone(),
    }
}

/// Substitute the element of `ty`, keeping its array or collection shape.
pub(crate) fn replace_element(ty: &TypeRef, element: TypeRef, config: &DerivationConfig) -> TypeRef {
    if ty.is_array() {
        return element.with_dimensions(ty.dimensions());
    }
    match (collection_kind(ty, config), ty.as_class()) {
        (Some(CollectionKind::List | CollectionKind::Set), Some(class)) => {
            TypeRef::class_with(class.id.clone(), vec![element])
        }
        _ => element,
    }
}

/// Boxed form of a primitive reference (keeps dimensions); other references are returned unchanged.
pub(crate) fn boxed(ty: &TypeRef, config: &DerivationConfig) -> TypeRef {
    match ty {
        TypeRef::Primitive(p) => {
            lang_ref(primitives::boxed_name(p.primitive), config).with_dimensions(p.dimensions)
        }
        other => other.clone(),
    }
}

/// Reference to a collection interface (`List<E>`).
pub(crate) fn collection_ref(kind: CollectionKind, arguments: Vec<TypeRef>, config: &DerivationConfig) -> ClassRef {
    ClassRef::new(
        TypeId::new(config.collection_namespace.clone(), collections::as_str(kind)),
        arguments,
    )
}

pub(crate) fn lang_ref(name: &str, config: &DerivationConfig) -> TypeRef {
    TypeRef::class(TypeId::new(config.lang_namespace.clone(), name))
}

pub(crate) fn object_ref(config: &DerivationConfig) -> TypeRef {
    lang_ref(primitives::OBJECT_NAME, config)
}

/// `boolean` or `Boolean`.
pub(crate) fn is_boolean(ty: &TypeRef, config: &DerivationConfig) -> bool {
    match ty {
        TypeRef::Primitive(p) => p.primitive == PrimitiveId::Boolean && p.dimensions == 0,
        TypeRef::Class(c) => {
            c.dimensions == 0
                && c.id.namespace == config.lang_namespace
                && primitives::from_boxed(&c.id.name) == Some(PrimitiveId::Boolean)
        }
        _ => false,
    }
}

/// Primitives, boxed primitives and `String`: values an inline constructor form may take.
pub(crate) fn is_simple_value(ty: &TypeRef, config: &DerivationConfig) -> bool {
    match ty {
        TypeRef::Primitive(p) => p.dimensions == 0,
        TypeRef::Class(c) => {
            c.dimensions == 0
                && c.id.namespace == config.lang_namespace
                && primitives::is_simple_value_name(&c.id.name)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> DerivationConfig {
        DerivationConfig::default()
    }

    fn util(name: &str, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::class_with(TypeId::new("java.util", name), args)
    }

    fn shape() -> TypeRef {
        TypeRef::class(TypeId::new("shapes", "Shape"))
    }

    #[test]
    fn test_shape_classification() {
        let c = cfg();
        assert_eq!(shape_of(&shape().array_of(), &c), Shape::Array);
        assert_eq!(shape_of(&util("List", vec![shape()]), &c), Shape::List);
        assert_eq!(shape_of(&util("ArrayList", vec![shape()]), &c), Shape::List);
        assert_eq!(shape_of(&util("LinkedHashSet", vec![shape()]), &c), Shape::Set);
        assert_eq!(shape_of(&util("Map", vec![shape(), shape()]), &c), Shape::Map);
        assert_eq!(shape_of(&shape(), &c), Shape::Scalar);
        assert_eq!(
            shape_of(&TypeRef::class(TypeId::new("other", "List")), &c),
            Shape::Scalar,
            "collections are recognized in the configured namespace only"
        );
    }

    #[test]
    fn test_element_type_unwraps_one_level() {
        let c = cfg();
        assert_eq!(element_type(&util("List", vec![shape()]), &c), shape());
        assert_eq!(element_type(&shape().array_of(), &c), shape());
        let lists = util("List", vec![shape()]).array_of();
        assert_eq!(element_type(&lists, &c), util("List", vec![shape()]));
        assert_eq!(element_type(&util("List", vec![]), &c).to_string(), "Object");
        let map = util("Map", vec![shape(), shape()]);
        assert_eq!(element_type(&map, &c), map);
    }

    #[test]
    fn test_replace_element_keeps_shape() {
        let c = cfg();
        let circle = TypeRef::class(TypeId::new("shapes", "Circle"));
        assert_eq!(
            replace_element(&util("Set", vec![shape()]), circle.clone(), &c).to_string(),
            "Set<Circle>"
        );
        assert_eq!(replace_element(&shape().array_of(), circle.clone(), &c).to_string(), "Circle[]");
        assert_eq!(replace_element(&shape(), circle.clone(), &c), circle);
    }

    #[test]
    fn test_boxing_keeps_array_dimensions() {
        let c = cfg();
        let ints = TypeRef::primitive(PrimitiveId::Int).array_of();
        assert_eq!(boxed(&ints, &c).to_string(), "Integer[]");
        assert_eq!(boxed(&TypeRef::primitive(PrimitiveId::Int), &c).to_string(), "Integer");
    }

    #[test]
    fn test_boolean_and_simple_values() {
        let c = cfg();
        assert!(is_boolean(&TypeRef::primitive(PrimitiveId::Boolean), &c));
        assert!(is_boolean(&lang_ref("Boolean", &c), &c));
        assert!(!is_boolean(&TypeRef::primitive(PrimitiveId::Boolean).array_of(), &c));
        assert!(is_simple_value(&lang_ref("String", &c), &c));
        assert!(!is_simple_value(&shape(), &c));
    }
}
