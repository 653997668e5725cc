//! Type repository: the symbol table shared by the front end and the derivation engine.
//!
//! ## Notes
//! - Registration is idempotent: registering a declaration whose id is already present returns the stored entry
//!   unchanged.
//! - Access is through `&mut self`, so a caller holding the repository (the engine's `Deriver`) can register types
//!   while a derivation is in progress without locks. Front ends running concurrently must serialize access
//!   themselves (e.g. behind a `Mutex`).
//! - Iteration follows registration order.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::decl::TypeDecl;
use crate::id::TypeId;

/// Identity-keyed store of type declarations plus the set of buildable types.
#[derive(Debug, Default, Clone)]
pub struct TypeRepository {
    definitions: IndexMap<TypeId, Arc<TypeDecl>>,
    buildables: IndexSet<TypeId>,
}

impl TypeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, returning the stored entry.
    ///
    /// ## Returns
    /// - The existing entry if one with the same id was registered before (the argument is dropped), otherwise the
    ///   newly stored declaration.
    pub fn register(&mut self, decl: TypeDecl) -> Arc<TypeDecl> {
        if let Some(existing) = self.definitions.get(&decl.id) {
            tracing::trace!(ty = %decl.id, "type already registered");
            return Arc::clone(existing);
        }
        tracing::debug!(ty = %decl.id, "registering type");
        let stored = Arc::new(decl);
        self.definitions.insert(stored.id.clone(), Arc::clone(&stored));
        stored
    }

    /// Register a declaration and mark it buildable.
    pub fn register_buildable(&mut self, decl: TypeDecl) -> Arc<TypeDecl> {
        let stored = self.register(decl);
        self.buildables.insert(stored.id.clone());
        stored
    }

    /// Register several declarations, all buildable.
    pub fn register_buildables(&mut self, decls: impl IntoIterator<Item = TypeDecl>) -> Vec<Arc<TypeDecl>> {
        decls.into_iter().map(|d| self.register_buildable(d)).collect()
    }

    pub fn get(&self, id: &TypeId) -> Option<&Arc<TypeDecl>> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn is_buildable(&self, id: &TypeId) -> bool {
        self.buildables.contains(id)
    }

    /// Buildable declarations in registration order.
    pub fn buildables(&self) -> impl Iterator<Item = &Arc<TypeDecl>> {
        self.buildables.iter().filter_map(|id| self.definitions.get(id))
    }

    /// All declarations in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<TypeDecl>> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Whether a value of type `candidate` can be used where `target` is expected.
    ///
    /// ## Notes
    /// - Reflexive, and transitive over `extends` and `implements` edges.
    /// - Supertypes missing from the repository end the walk along that edge.
    pub fn is_assignable_from(&self, target: &TypeId, candidate: &TypeId) -> bool {
        let mut seen: HashSet<&TypeId> = HashSet::new();
        let mut stack: Vec<&TypeId> = vec![candidate];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(decl) = self.definitions.get(current) {
                stack.extend(decl.supertypes().map(|s| &s.id));
            }
        }
        false
    }

    /// Buildable superclass chain of `decl`, nearest first, excluding `decl` itself.
    pub fn buildable_ancestors(&self, decl: &TypeDecl) -> Vec<Arc<TypeDecl>> {
        let mut chain = Vec::new();
        let mut seen: HashSet<TypeId> = HashSet::from([decl.id.clone()]);
        let mut next = decl.superclass().map(|s| s.id.clone());
        while let Some(id) = next {
            if !self.is_buildable(&id) || !seen.insert(id.clone()) {
                break;
            }
            let Some(parent) = self.get(&id) else { break };
            next = parent.superclass().map(|s| s.id.clone());
            chain.push(Arc::clone(parent));
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::Kind;
    use crate::types::ClassRef;

    fn id(name: &str) -> TypeId {
        TypeId::new("zoo", name)
    }

    fn zoo() -> TypeRepository {
        let mut repo = TypeRepository::new();
        repo.register(TypeDecl::new(id("Named"), Kind::Interface));
        repo.register_buildable(
            TypeDecl::new(id("Animal"), Kind::Record)
                .into_abstract()
                .implementing(ClassRef::of(id("Named"))),
        );
        repo.register_buildable(TypeDecl::new(id("Cat"), Kind::Record).extending(ClassRef::of(id("Animal"))));
        repo.register_buildable(TypeDecl::new(id("Lion"), Kind::Record).extending(ClassRef::of(id("Cat"))));
        repo
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut repo = zoo();
        let before = repo.len();
        let again = repo.register(TypeDecl::new(id("Cat"), Kind::Interface));
        assert_eq!(repo.len(), before);
        assert_eq!(again.kind, Kind::Record, "existing entry must be returned unchanged");
    }

    #[test]
    fn test_assignability_is_transitive_and_reflexive() {
        let repo = zoo();
        assert!(repo.is_assignable_from(&id("Animal"), &id("Lion")));
        assert!(repo.is_assignable_from(&id("Named"), &id("Lion")));
        assert!(repo.is_assignable_from(&id("Cat"), &id("Cat")));
        assert!(!repo.is_assignable_from(&id("Lion"), &id("Cat")));
    }

    #[test]
    fn test_assignability_terminates_on_cycles() {
        let mut repo = TypeRepository::new();
        repo.register(TypeDecl::new(id("A"), Kind::Interface).extending(ClassRef::of(id("B"))));
        repo.register(TypeDecl::new(id("B"), Kind::Interface).extending(ClassRef::of(id("A"))));
        assert!(!repo.is_assignable_from(&id("C"), &id("A")));
    }

    #[test]
    fn test_buildable_ancestors_nearest_first() {
        let repo = zoo();
        let lion = repo.get(&id("Lion")).cloned().unwrap();
        let chain: Vec<String> = repo
            .buildable_ancestors(&lion)
            .iter()
            .map(|d| d.simple_name().to_string())
            .collect();
        assert_eq!(chain, vec!["Cat", "Animal"]);
    }

    #[test]
    fn test_buildables_in_registration_order() {
        let repo = zoo();
        let names: Vec<&str> = repo.buildables().map(|d| d.simple_name()).collect();
        assert_eq!(names, vec!["Animal", "Cat", "Lion"]);
    }
}
