//! Polymorphic properties: concrete subtypes of an abstract element type.
//!
//! A property `shapes: List<Shape>` whose element is abstract gets one *variant* per registered concrete subtype,
//! e.g. `circleShapes: List<Circle>`. The fluent for the owner grows typed `addTo`/`addNew` entry points per
//! variant, all writing into the base field.

use std::sync::Arc;

use buildsmith_core::naming;
use buildsmith_model::{Kind, Property, TypeDecl, TypeId};

use super::Deriver;
use super::shapes::{Shape, element_type, replace_element, shape_of};

/// A descendant variant of a polymorphic property.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendantProperty {
    /// The variant: `decap(D) + Cap(name)`, typed with the same array/collection shape over `D`.
    pub property: Property,
    pub descendant: TypeId,
    /// Name of the base property every variant writes into.
    pub descendant_of: String,
}

impl<'r> Deriver<'r> {
    /// Concrete, buildable subtypes of `base` admitted by the descendant policy, in registration order.
    ///
    /// Empty unless `base` is registered and abstract.
    pub(crate) fn descendants_of(&mut self, base: &TypeId) -> Vec<Arc<TypeDecl>> {
        if let Some(hit) = self.memo.descendants(base) {
            return hit.to_vec();
        }
        let is_abstract = self.repo.get(base).is_some_and(|d| d.is_abstract());
        let found: Vec<Arc<TypeDecl>> = if is_abstract {
            self.repo
                .buildables()
                .filter(|c| c.id != *base && c.kind == Kind::Record && !c.is_abstract())
                .filter(|c| self.repo.is_assignable_from(base, &c.id))
                .filter(|c| self.config.descendant_policy.admits(c))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        tracing::debug!(base = %base, count = found.len(), "resolved descendants");
        self.memo.insert_descendants(base.clone(), found.clone());
        found
    }

    /// Expand a property into one variant per descendant of its element type.
    ///
    /// ## Returns
    /// - An empty list for maps, for non-class elements, and for elements that are not abstract.
    #[tracing::instrument(skip_all, fields(property = %property.name))]
    pub fn expand_descendants(&mut self, property: &Property) -> Vec<DescendantProperty> {
        if shape_of(&property.ty, &self.config) == Shape::Map {
            return Vec::new();
        }
        let element = element_type(&property.ty, &self.config);
        let Some(class) = element.as_class() else {
            return Vec::new();
        };
        let base = class.id.clone();
        self.descendants_of(&base)
            .into_iter()
            .map(|d| {
                let ty = replace_element(&property.ty, d.to_internal_ref().into(), &self.config);
                DescendantProperty {
                    property: Property::new(naming::descendant_property(d.simple_name(), &property.name), ty)
                        .with_modifiers(property.modifiers),
                    descendant: d.id.clone(),
                    descendant_of: property.name.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{AdmitAll, DerivationConfig};
    use buildsmith_model::{ClassRef, TypeFlags, TypeRef, TypeRepository};

    fn id(name: &str) -> TypeId {
        TypeId::new("shapes", name)
    }

    fn concrete(name: &str) -> TypeDecl {
        TypeDecl::new(id(name), Kind::Record)
            .extending(ClassRef::of(id("Shape")))
            .with_constructor_params(vec![])
    }

    fn repo() -> TypeRepository {
        let mut repo = TypeRepository::new();
        repo.register_buildable(TypeDecl::new(id("Shape"), Kind::Record).into_abstract());
        repo.register_buildable(concrete("Circle"));
        repo.register_buildable(concrete("Square"));
        repo.register_buildable(concrete("Ghost").with_flags(TypeFlags::GENERATED));
        // Not buildable: never a descendant.
        repo.register(concrete("Sketch"));
        repo
    }

    fn shapes_list() -> Property {
        Property::new(
            "shapes",
            TypeRef::class_with(TypeId::new("java.util", "List"), vec![TypeRef::class(id("Shape"))]),
        )
    }

    #[test]
    fn test_variants_follow_registration_order() {
        let mut repo = repo();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let variants = deriver.expand_descendants(&shapes_list());
        let names: Vec<(&str, String)> = variants
            .iter()
            .map(|v| (v.property.name.as_str(), v.property.ty.to_string()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("circleShapes", "List<Circle>".to_string()),
                ("squareShapes", "List<Square>".to_string())
            ]
        );
        assert!(variants.iter().all(|v| v.descendant_of == "shapes"));
    }

    #[test]
    fn test_policy_can_admit_generated() {
        let mut repo = repo();
        let config = DerivationConfig::default().with_descendant_policy(AdmitAll);
        let mut deriver = Deriver::new(&mut repo, config);
        assert_eq!(deriver.expand_descendants(&shapes_list()).len(), 3);
    }

    #[test]
    fn test_concrete_elements_and_maps_have_no_variants() {
        let mut repo = repo();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let scalar = Property::new("circle", TypeRef::class(id("Circle")));
        assert!(deriver.expand_descendants(&scalar).is_empty());

        let map = Property::new(
            "byName",
            TypeRef::class_with(
                TypeId::new("java.util", "Map"),
                vec![TypeRef::class(TypeId::new("java.lang", "String")), TypeRef::class(id("Shape"))],
            ),
        );
        assert!(deriver.expand_descendants(&map).is_empty());
    }

    #[test]
    fn test_array_variants_keep_dimensions() {
        let mut repo = repo();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let array = Property::new("shapes", TypeRef::class(id("Shape")).array_of());
        let variants = deriver.expand_descendants(&array);
        assert_eq!(variants[0].property.ty.to_string(), "Circle[]");
    }
}
