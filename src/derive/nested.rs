//! Nested builder synthesis.
//!
//! For a property whose element type `B` is buildable, derives the pair
//! `XNested<Bparams..., N>` (nested in the fluent interface) and `XNestedImpl<Bparams..., N>` (nested in the fluent
//! implementation). The implementation wraps a `BBuilder` created with itself as the fluent, so mutators called on
//! the nested value land in that builder; `and()` builds the value and hands it back to the enclosing fluent.

use buildsmith_core::naming;
use buildsmith_core::vocab::LibraryRootId;
use buildsmith_model::{
    Block, ClassRef, Expr, Kind, Method, Modifiers, Param, Property, Stmt, TypeDecl, TypeFlags, TypeParam, TypeRef,
};

use super::Deriver;
use super::errors::{DeriveError, DeriveResult};
use super::roots::root_ref;
use super::shapes::{Shape, element_type, shape_of};
use super::support;
use super::types::{PropertyContext, builder_id, fluent_id, fluent_impl_id, param_refs};

/// Interface and implementation of a nested builder.
#[derive(Debug, Clone)]
pub struct NestedPair {
    pub interface: TypeDecl,
    pub implementation: TypeDecl,
}

impl NestedPair {
    /// `XNested<arguments...>` as seen from the enclosing fluent.
    pub fn interface_ref(&self, arguments: Vec<TypeRef>) -> ClassRef {
        ClassRef::new(self.interface.id.clone(), arguments)
    }

    /// `XNestedImpl<arguments...>` as seen from the enclosing fluent implementation.
    pub fn implementation_ref(&self, arguments: Vec<TypeRef>) -> ClassRef {
        ClassRef::new(self.implementation.id.clone(), arguments)
    }
}

impl<'r> Deriver<'r> {
    /// Derive the nested builder pair for `property` of `owner`.
    ///
    /// ## Errors
    /// - [`DeriveError::UnresolvedTypeDefinition`] when the element type is not a registered class.
    /// - The buildability errors of the element type.
    #[tracing::instrument(skip_all, fields(ty = %owner.id, property = %property.name))]
    pub fn derive_nested(&mut self, owner: &TypeDecl, property: &Property) -> DeriveResult<NestedPair> {
        let cx = PropertyContext::for_type(owner);
        self.nested_pair(&cx, property)
    }

    pub(crate) fn nested_pair(&mut self, cx: &PropertyContext, property: &Property) -> DeriveResult<NestedPair> {
        let shape = shape_of(&property.ty, &self.config);
        let element = element_type(&property.ty, &self.config);
        let unresolved = || DeriveError::UnresolvedTypeDefinition {
            property: property.name.clone(),
            ty: element.to_string(),
        };
        let class = element.as_class().ok_or_else(unresolved)?;
        let target = self.repo.get(&class.id).cloned().ok_or_else(unresolved)?;
        support::ensure_buildable(self.repo, &target)?;

        let n = naming::next_generic(&target.param_names(), Some(&self.config.nested_generic));
        let n_ref = TypeRef::param(n.clone());
        let b_args = param_refs(&target);
        let mut params = target.params.clone();
        params.push(TypeParam::new(n.clone()));

        let interface_id = cx.fluent_interface.nested(&naming::nested_interface(&property.name));
        let impl_id = cx.fluent_impl.nested(&naming::nested_impl(&property.name));
        let mut self_args = b_args.clone();
        self_args.push(n_ref.clone());
        let interface_self = ClassRef::new(interface_id.clone(), self_args);
        let nested_root = root_ref(LibraryRootId::Nested, vec![n_ref.clone()], &self.config);

        let mut with_self = b_args.clone();
        with_self.push(interface_self.clone().into());
        let target_fluent = ClassRef::new(fluent_id(&target.id), with_self.clone());
        let target_fluent_impl = ClassRef::new(fluent_impl_id(&target.id), with_self);
        let target_builder = ClassRef::new(builder_id(&target.id), b_args);

        // Terminators: `and()` hands the built value to the enclosing fluent, `endX()` aliases it.
        let apply = if shape.is_element_collection() {
            naming::add_to(&property.name)
        } else {
            naming::with(&property.name)
        };
        let end_name = if shape == Shape::Scalar {
            naming::end(&property.name)
        } else {
            naming::end(&naming::singularize(&property.name))
        };
        let built = Expr::this_field(naming::NESTED_BUILDER_FIELD).call(naming::BUILD_METHOD, vec![]);
        let and = Method::new(naming::AND_METHOD, n_ref.clone())
            .with_body(Block::new(vec![Stmt::ret(Expr::Outer.call(apply, vec![built]))]));
        let end = Method::new(end_name, n_ref)
            .with_body(Block::new(vec![Stmt::ret(Expr::This.call(naming::AND_METHOD, vec![]))]));

        let interface = TypeDecl::new(interface_id, Kind::Interface)
            .with_params(params.clone())
            .extending(nested_root.clone())
            .extending(target_fluent)
            .with_methods([and.clone().without_body(), end.clone().without_body()])
            .enclosed_by(cx.fluent_interface.clone())
            .with_flags(TypeFlags::GENERATED);

        let ctor_name = naming::nested_impl(&property.name);
        let item = naming::INSTANCE_PARAM;
        let seeded = Method::new(ctor_name.clone(), TypeRef::Void)
            .with_param(Param::new(item, target.to_internal_ref().into()))
            .with_body(Block::new(vec![Stmt::assign_field(
                naming::NESTED_BUILDER_FIELD,
                Expr::new_object(target_builder.clone(), vec![Expr::This, Expr::var(item)]),
            )]));
        let empty = Method::new(ctor_name, TypeRef::Void).with_body(Block::new(vec![Stmt::assign_field(
            naming::NESTED_BUILDER_FIELD,
            Expr::new_object(target_builder.clone(), vec![Expr::This]),
        )]));

        let implementation = TypeDecl::new(impl_id, Kind::Record)
            .with_params(params)
            .extending(target_fluent_impl)
            .implementing(interface_self)
            .implementing(nested_root)
            .with_property(
                Property::new(naming::NESTED_BUILDER_FIELD, target_builder.into()).with_modifiers(Modifiers::private()),
            )
            .with_constructor(seeded)
            .with_constructor(empty)
            .with_methods([and, end])
            .enclosed_by(cx.fluent_impl.clone())
            .with_flags(TypeFlags::GENERATED);

        tracing::debug!(nested = %interface.id, "derived nested builder");
        Ok(NestedPair {
            interface,
            implementation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::DerivationConfig;
    use buildsmith_core::vocab::PrimitiveId;
    use buildsmith_model::{TypeId, TypeRepository};

    fn point() -> TypeDecl {
        let int = TypeRef::primitive(PrimitiveId::Int);
        TypeDecl::new(TypeId::new("geo", "Point"), Kind::Record)
            .with_properties([Property::new("x", int.clone()), Property::new("y", int.clone())])
            .with_constructor_params(vec![Param::new("x", int.clone()), Param::new("y", int.clone())])
            .with_methods([Method::new("getX", int.clone()), Method::new("getY", int)])
    }

    fn circle() -> TypeDecl {
        TypeDecl::new(TypeId::new("geo", "Circle"), Kind::Record)
            .with_property(Property::new("center", TypeRef::class(TypeId::new("geo", "Point"))))
    }

    #[test]
    fn test_nested_pair_signatures() {
        let mut repo = TypeRepository::new();
        repo.register_buildable(point());
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let circle = circle();
        let pair = deriver.derive_nested(&circle, &circle.properties[0]).unwrap();

        assert_eq!(pair.interface.id.name, "CircleFluent.CenterNested");
        assert_eq!(pair.implementation.id.name, "CircleFluentImpl.CenterNestedImpl");
        let extends: Vec<String> = pair.interface.extends.iter().map(ToString::to_string).collect();
        assert_eq!(extends, vec!["Nested<N>", "PointFluent<CenterNested<N>>"]);
        assert_eq!(pair.implementation.extends[0].to_string(), "PointFluentImpl<CenterNested<N>>");

        let methods: Vec<String> = pair.interface.methods.iter().map(Method::signature).collect();
        assert_eq!(methods, vec!["and()", "endCenter()"]);
        assert_eq!(pair.implementation.constructors.len(), 2);
    }

    #[test]
    fn test_unregistered_element_is_unresolved() {
        let mut repo = TypeRepository::new();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let circle = circle();
        let err = deriver.derive_nested(&circle, &circle.properties[0]).unwrap_err();
        assert_eq!(
            err,
            DeriveError::UnresolvedTypeDefinition {
                property: "center".to_string(),
                ty: "Point".to_string()
            }
        );
    }

    #[test]
    fn test_primitive_element_is_unresolved() {
        let mut repo = TypeRepository::new();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        let owner = circle();
        let radius = Property::new("radius", TypeRef::primitive(PrimitiveId::Double));
        assert!(matches!(
            deriver.derive_nested(&owner, &radius),
            Err(DeriveError::UnresolvedTypeDefinition { .. })
        ));
    }
}
