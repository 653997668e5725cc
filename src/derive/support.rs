//! Buildability queries: canonical constructors, accessors and setter-only properties.
//!
//! These are read-only lookups over a declaration and its superclass chain in the repository.

use std::collections::HashSet;
use std::sync::Arc;

use buildsmith_core::naming;
use buildsmith_model::{ClassRef, Method, Property, TypeDecl, TypeRepository};

use super::errors::{DeriveError, DeriveResult};

/// The unique constructor of maximal arity.
pub(crate) fn canonical_constructor(decl: &TypeDecl) -> DeriveResult<&Method> {
    let max = decl.constructors.iter().map(Method::arity).max();
    let Some(max) = max else {
        return Err(DeriveError::MissingCanonicalConstructor {
            ty: decl.id.clone(),
            candidates: 0,
        });
    };
    let mut widest = decl.constructors.iter().filter(|c| c.arity() == max);
    match (widest.next(), widest.count()) {
        (Some(ctor), 0) => Ok(ctor),
        (_, more) => Err(DeriveError::MissingCanonicalConstructor {
            ty: decl.id.clone(),
            candidates: more + 1,
        }),
    }
}

/// Whether the canonical constructor takes an argument named `name`.
pub(crate) fn canonical_has_arg(decl: &TypeDecl, name: &str) -> bool {
    canonical_constructor(decl).is_ok_and(|c| c.params.iter().any(|p| p.name == name))
}

/// Whether `decl` has a zero-argument constructor.
pub(crate) fn has_default_constructor(decl: &TypeDecl) -> bool {
    decl.constructors.iter().any(|c| c.params.is_empty())
}

/// Walk `decl` and its superclasses (as far as they are registered), nearest first.
fn superclass_chain<'a>(repo: &'a TypeRepository, decl: &'a TypeDecl) -> Vec<&'a TypeDecl> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(decl);
    while let Some(d) = current {
        if !seen.insert(&d.id) {
            break;
        }
        chain.push(d);
        current = d.superclass().and_then(|s| repo.get(&s.id)).map(Arc::as_ref);
    }
    chain
}

/// Name of the accessor for `property`: `getX`, `isX` or `x`, on `decl` or a superclass.
pub(crate) fn find_getter(repo: &TypeRepository, decl: &TypeDecl, property: &str) -> Option<String> {
    let candidates = [
        naming::getter(property, false),
        naming::getter(property, true),
        property.to_string(),
    ];
    superclass_chain(repo, decl).into_iter().find_map(|d| {
        candidates
            .iter()
            .find(|name| d.methods.iter().any(|m| &m.name == *name && m.params.is_empty()))
            .cloned()
    })
}

/// Whether `decl` itself declares a one-argument `setX`.
pub(crate) fn has_setter(decl: &TypeDecl, property: &str) -> bool {
    let setter = naming::setter(property);
    decl.methods.iter().any(|m| m.name == setter && m.params.len() == 1)
}

/// Whether `decl` or one of its superclasses declares a one-argument `setX`.
pub(crate) fn has_or_inherits_setter(repo: &TypeRepository, decl: &TypeDecl, property: &str) -> bool {
    superclass_chain(repo, decl).into_iter().any(|d| has_setter(d, property))
}

/// The canonical constructor exists and every argument has a getter.
pub(crate) fn ensure_buildable(repo: &TypeRepository, decl: &TypeDecl) -> DeriveResult<()> {
    let ctor = canonical_constructor(decl)?;
    for arg in &ctor.params {
        if find_getter(repo, decl, &arg.name).is_none() {
            return Err(DeriveError::MissingGetter {
                ty: decl.id.clone(),
                property: arg.name.clone(),
            });
        }
    }
    Ok(())
}

/// Declared superclass, when it is registered as buildable.
pub(crate) fn buildable_superclass(repo: &TypeRepository, decl: &TypeDecl) -> Option<(ClassRef, Arc<TypeDecl>)> {
    let sup = decl.superclass()?;
    if !repo.is_buildable(&sup.id) {
        return None;
    }
    repo.get(&sup.id).map(|d| (sup.clone(), Arc::clone(d)))
}

/// Properties that reach the built value through a setter rather than the canonical constructor.
///
/// ## Notes
/// - Walks `decl` and then its buildable superclasses; a name is surfaced once, by the nearest declaration.
/// - Constructor membership is judged against `decl`'s own canonical constructor, since that is the constructor
///   `build()` calls.
///
/// ## Returns
/// - `(property, getter on the declaring type)` pairs, in chain order.
pub(crate) fn setter_only_properties(repo: &TypeRepository, decl: &TypeDecl) -> DeriveResult<Vec<(Property, String)>> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let chain = std::iter::once(Arc::new(decl.clone())).chain(repo.buildable_ancestors(decl));

    for target in chain {
        for property in target.properties.iter().filter(|p| !p.is_static()) {
            if canonical_has_arg(decl, &property.name) || !has_setter(&target, &property.name) {
                continue;
            }
            if !seen.insert(property.name.clone()) {
                continue;
            }
            let getter = find_getter(repo, &target, &property.name).ok_or_else(|| DeriveError::MissingGetter {
                ty: target.id.clone(),
                property: property.name.clone(),
            })?;
            out.push((property.clone(), getter));
        }
    }
    Ok(out)
}

/// Properties of `decl` that get fluent accessors: non-static, and either a canonical constructor argument or
/// settable.
pub(crate) fn surfaced_properties<'a>(repo: &TypeRepository, decl: &'a TypeDecl) -> Vec<&'a Property> {
    decl.properties
        .iter()
        .filter(|p| !p.is_static())
        .filter(|p| canonical_has_arg(decl, &p.name) || has_or_inherits_setter(repo, decl, &p.name))
        .collect()
}
