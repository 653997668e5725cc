//! Memoization of derivation functions.
//!
//! Keys are `(function, input identity)`. The cache lives in a [`super::Deriver`] and is only cleared by
//! [`MemoCache::clear`] (exposed as `Deriver::reset`), never in the middle of a pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use buildsmith_model::{TypeDecl, TypeId};

/// Identity of a memoized derivation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeriveFn {
    FluentInterface,
    FluentImpl,
    Builder,
    EditableBuilder,
    Editable,
}

#[derive(Debug, Default)]
pub(crate) struct MemoCache {
    decls: HashMap<(DeriveFn, TypeId), Arc<TypeDecl>>,
    descendants: HashMap<TypeId, Vec<Arc<TypeDecl>>>,
    /// Derivations started but not finished; consulted to cut inheritance cycles.
    in_flight: HashSet<(DeriveFn, TypeId)>,
    hits: usize,
    misses: usize,
}

impl MemoCache {
    pub(crate) fn get(&mut self, func: DeriveFn, id: &TypeId) -> Option<Arc<TypeDecl>> {
        let found = self.decls.get(&(func, id.clone())).cloned();
        if found.is_some() {
            self.hits += 1;
            tracing::trace!(?func, ty = %id, "memo hit");
        } else {
            self.misses += 1;
        }
        found
    }

    pub(crate) fn insert(&mut self, func: DeriveFn, id: TypeId, decl: Arc<TypeDecl>) {
        self.decls.insert((func, id), decl);
    }

    pub(crate) fn begin(&mut self, func: DeriveFn, id: TypeId) {
        self.in_flight.insert((func, id));
    }

    pub(crate) fn finish(&mut self, func: DeriveFn, id: &TypeId) {
        self.in_flight.remove(&(func, id.clone()));
    }

    pub(crate) fn is_in_flight(&self, func: DeriveFn, id: &TypeId) -> bool {
        self.in_flight.contains(&(func, id.clone()))
    }

    pub(crate) fn descendants(&self, base: &TypeId) -> Option<&[Arc<TypeDecl>]> {
        self.descendants.get(base).map(Vec::as_slice)
    }

    pub(crate) fn insert_descendants(&mut self, base: TypeId, found: Vec<Arc<TypeDecl>>) {
        self.descendants.insert(base, found);
    }

    pub(crate) fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    pub(crate) fn clear(&mut self) {
        self.decls.clear();
        self.descendants.clear();
        self.in_flight.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
