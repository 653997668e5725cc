//! Type-level derivation: names, generic parameters and supertypes of derived declarations.
//!
//! The "shells" built here carry everything but members. Assembly (`assemble.rs`) fills in fields, constructors
//! and methods.
//!
//! ## Notes
//! - The self parameter `S` is the first free letter of the generic alphabet relative to the source type's own
//!   parameters, so `Box<S>` derives `BoxFluent<S, T extends BoxFluent<S, T>>`.
//! - Supertypes follow the source superclass only when that superclass is buildable; otherwise derived types sit
//!   directly on the library roots.

use buildsmith_core::naming;
use buildsmith_core::vocab::LibraryRootId;
use buildsmith_model::{ClassRef, Kind, TypeDecl, TypeFlags, TypeId, TypeParam, TypeRef};

use super::Deriver;
use super::roots::root_ref;
use super::support;

pub(crate) fn fluent_id(id: &TypeId) -> TypeId {
    id.derived("", naming::FLUENT_SUFFIX)
}

pub(crate) fn fluent_impl_id(id: &TypeId) -> TypeId {
    id.derived("", naming::FLUENT_IMPL_SUFFIX)
}

pub(crate) fn builder_id(id: &TypeId) -> TypeId {
    id.derived("", naming::BUILDER_SUFFIX)
}

pub(crate) fn editable_id(id: &TypeId) -> TypeId {
    id.derived(naming::EDITABLE_PREFIX, "")
}

/// References to the source type's own parameters, in order.
pub(crate) fn param_refs(decl: &TypeDecl) -> Vec<TypeRef> {
    decl.params.iter().map(TypeParam::to_ref).collect()
}

/// Name of the self-referential parameter of `decl`'s fluent types.
pub(crate) fn self_param(decl: &TypeDecl) -> String {
    naming::next_generic(&decl.param_names(), None)
}

/// `arguments` followed by one trailing argument.
fn with_trailing(mut arguments: Vec<TypeRef>, last: TypeRef) -> Vec<TypeRef> {
    arguments.push(last);
    arguments
}

/// Per-type information threaded through property and nested derivation.
#[derive(Debug, Clone)]
pub(crate) struct PropertyContext {
    pub owner: TypeId,
    pub fluent_interface: TypeId,
    pub fluent_impl: TypeId,
    /// Self parameter name; fluent mutators return it.
    pub self_param: String,
}

impl PropertyContext {
    pub(crate) fn for_type(decl: &TypeDecl) -> Self {
        Self {
            owner: decl.id.clone(),
            fluent_interface: fluent_id(&decl.id),
            fluent_impl: fluent_impl_id(&decl.id),
            self_param: self_param(decl),
        }
    }

    pub(crate) fn self_ref(&self) -> TypeRef {
        TypeRef::param(self.self_param.clone())
    }
}

impl<'r> Deriver<'r> {
    /// `TFluent<T.params..., S>`
    pub(crate) fn fluent_self_ref(&self, decl: &TypeDecl, self_arg: TypeRef) -> ClassRef {
        ClassRef::new(fluent_id(&decl.id), with_trailing(param_refs(decl), self_arg))
    }

    /// `TBuilder<T.params...>`
    pub(crate) fn builder_ref(&self, decl: &TypeDecl) -> ClassRef {
        ClassRef::new(builder_id(&decl.id), param_refs(decl))
    }

    /// `T.params` plus `S extends TFluent<T.params..., S>`.
    fn fluent_params(&self, decl: &TypeDecl) -> Vec<TypeParam> {
        let s = self_param(decl);
        let bound = self.fluent_self_ref(decl, TypeRef::param(s.clone()));
        let mut params = decl.params.clone();
        params.push(TypeParam::bounded(s, vec![bound]));
        params
    }

    /// Interface shell: `TFluent<T.params..., S extends TFluent<..., S>> extends UFluent<..., S> | Fluent<S>`.
    pub(crate) fn fluent_interface_shell(&self, decl: &TypeDecl) -> TypeDecl {
        let s = TypeRef::param(self_param(decl));
        let parent = match support::buildable_superclass(self.repo, decl) {
            Some((sup, _)) => ClassRef::new(fluent_id(&sup.id), with_trailing(sup.arguments, s)),
            None => root_ref(LibraryRootId::Fluent, vec![s], &self.config),
        };
        TypeDecl::new(fluent_id(&decl.id), Kind::Interface)
            .with_params(self.fluent_params(decl))
            .extending(parent)
            .with_flags(TypeFlags::GENERATED)
    }

    /// Implementation shell: extends `UFluentImpl<..., S>` or `BaseFluent<S>`, implements `TFluent<..., S>`.
    pub(crate) fn fluent_impl_shell(&self, decl: &TypeDecl) -> TypeDecl {
        let s = TypeRef::param(self_param(decl));
        let parent = match support::buildable_superclass(self.repo, decl) {
            Some((sup, _)) => ClassRef::new(fluent_impl_id(&sup.id), with_trailing(sup.arguments, s.clone())),
            None => root_ref(LibraryRootId::BaseFluent, vec![s.clone()], &self.config),
        };
        TypeDecl::new(fluent_impl_id(&decl.id), Kind::Record)
            .with_params(self.fluent_params(decl))
            .extending(parent)
            .implementing(self.fluent_self_ref(decl, s))
            .with_flags(TypeFlags::GENERATED)
    }

    /// Builder shell: `TBuilder<T.params...> extends TFluentImpl<..., TBuilder<...>> implements
    /// VisitableBuilder<T<...>, TBuilder<...>>`; abstract when `T` is.
    pub(crate) fn builder_shell(&self, decl: &TypeDecl) -> TypeDecl {
        let builder: TypeRef = self.builder_ref(decl).into();
        let parent = ClassRef::new(fluent_impl_id(&decl.id), with_trailing(param_refs(decl), builder.clone()));
        let visitable = root_ref(
            LibraryRootId::VisitableBuilder,
            vec![decl.to_internal_ref().into(), builder],
            &self.config,
        );
        let shell = TypeDecl::new(builder_id(&decl.id), Kind::Record)
            .with_params(decl.params.clone())
            .extending(parent)
            .implementing(visitable)
            .with_flags(TypeFlags::GENERATED);
        if decl.is_abstract() { shell.into_abstract() } else { shell }
    }

    /// Editable shell: `EditableT<T.params...> extends T<...> implements Editable<TBuilder<...>>`.
    pub(crate) fn editable_shell(&self, decl: &TypeDecl) -> TypeDecl {
        let editable = root_ref(LibraryRootId::Editable, vec![self.builder_ref(decl).into()], &self.config);
        let shell = TypeDecl::new(editable_id(&decl.id), Kind::Record)
            .with_params(decl.params.clone())
            .extending(decl.to_internal_ref())
            .implementing(editable)
            .with_flags(TypeFlags::GENERATED);
        if decl.is_abstract() { shell.into_abstract() } else { shell }
    }
}
