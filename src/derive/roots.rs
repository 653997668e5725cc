//! Declarations of the library root types.
//!
//! Derived declarations extend or implement these. [`super::Deriver::new`] registers them so supertype walks (and
//! the interpreter's dispatch) can see the whole hierarchy.

use buildsmith_core::vocab::roots::{self, LIBRARY_ROOTS, LibraryRootId, LibraryRootInfo};
use buildsmith_model::{Block, ClassRef, Kind, Method, TypeDecl, TypeFlags, TypeId, TypeParam, TypeRef};

use super::config::DerivationConfig;

pub(crate) fn root_id(root: LibraryRootId, config: &DerivationConfig) -> TypeId {
    TypeId::new(config.library_namespace.clone(), roots::as_str(root))
}

/// `Root<arguments...>` in the configured library namespace.
pub(crate) fn root_ref(root: LibraryRootId, arguments: Vec<TypeRef>, config: &DerivationConfig) -> ClassRef {
    ClassRef::new(root_id(root, config), arguments)
}

fn root_decl(info: &LibraryRootInfo, config: &DerivationConfig) -> TypeDecl {
    let kind = if info.interface { Kind::Interface } else { Kind::Record };
    let fluent_bounded = matches!(info.id, LibraryRootId::Fluent | LibraryRootId::BaseFluent);

    let params = info
        .params
        .iter()
        .map(|name| {
            if fluent_bounded {
                let bound = root_ref(LibraryRootId::Fluent, vec![TypeRef::param(*name)], config);
                TypeParam::bounded(*name, vec![bound])
            } else {
                TypeParam::new(*name)
            }
        })
        .collect();

    let mut decl = TypeDecl::new(root_id(info.id, config), kind)
        .with_params(params)
        .with_flags(TypeFlags::GENERATED);

    if info.id == LibraryRootId::BaseFluent {
        let fluent = root_ref(LibraryRootId::Fluent, vec![TypeRef::param(info.params[0])], config);
        decl = decl
            .into_abstract()
            .implementing(fluent)
            .with_constructor(Method::new(info.canonical, TypeRef::Void).with_body(Block::default()));
    }
    if let (Some(op), Some(first)) = (info.operation, info.params.first()) {
        decl = decl.with_method(Method::new(op, TypeRef::param(*first)).without_body());
    }
    decl
}

/// One declaration per library root, in table order.
pub(crate) fn library_decls(config: &DerivationConfig) -> Vec<TypeDecl> {
    LIBRARY_ROOTS.iter().map(|info| root_decl(info, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_root_is_declared() {
        let config = DerivationConfig::default();
        let decls = library_decls(&config);
        let names: Vec<&str> = decls.iter().map(TypeDecl::simple_name).collect();
        assert_eq!(names, vec!["Fluent", "BaseFluent", "VisitableBuilder", "Editable", "Nested"]);
        assert!(decls.iter().all(|d| d.id.namespace == "io.buildsmith.builder"));
    }

    #[test]
    fn test_fluent_roots_are_self_bounded() {
        let decls = library_decls(&DerivationConfig::default());
        assert_eq!(decls[0].params[0].to_string(), "F extends Fluent<F>");
        let base = &decls[1];
        assert!(base.is_abstract() && !base.is_interface());
        assert_eq!(base.implements[0].to_string(), "Fluent<F>");
    }

    #[test]
    fn test_capabilities_expose_their_operation() {
        let decls = library_decls(&DerivationConfig::default());
        let build = &decls[2].methods[0];
        assert_eq!(build.name, "build");
        assert_eq!(build.return_type, TypeRef::param("T"));
        assert!(build.body.is_none());
        assert_eq!(decls[4].methods[0].name, "and");
    }
}
