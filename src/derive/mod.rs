//! Builder derivation engine.
//!
//! Given a buildable type declaration `T`, derives:
//! - `TFluent`, a chainable mutator interface with an F-bounded self parameter;
//! - `TFluentImpl`, its implementation with backing fields and structural `equals`;
//! - `TBuilder`, the terminal builder (`build()` runs the canonical constructor);
//! - `EditableT`, a subclass of `T` whose `edit()` reopens the value in a builder;
//! - one nested builder pair per composed property, for inline construction of sub-values.
//!
//! ## Notes
//!
//! - **Explicit context**: all state (repository access, configuration, memo cache) lives in a [`Deriver`]. Two
//!   derivers never share a cache.
//! - **Memoization**: every `derive_*` result is cached by `(function, type)`; repeated calls return the same
//!   `Arc`. [`Deriver::reset`] drops the cache between runs.
//! - **Termination**: self-referential types (`Node { children: List<Node> }`) refer to derived types by id only,
//!   and superclass derivation skips types already in flight, so derivation terminates on cyclic graphs.
//! - **Failures are fatal**: a [`DeriveError`] aborts the derivation that raised it and propagates with `?`.
//!
//! ## Examples
//!
//! ```rust
//! use buildsmith::derive::{DerivationConfig, Deriver};
//! use buildsmith_core::vocab::PrimitiveId;
//! use buildsmith_model::{Kind, Method, Param, Property, TypeDecl, TypeId, TypeRef, TypeRepository};
//!
//! let int = TypeRef::primitive(PrimitiveId::Int);
//! let point = TypeDecl::new(TypeId::new("geo", "Point"), Kind::Record)
//!     .with_property(Property::new("x", int.clone()))
//!     .with_constructor_params(vec![Param::new("x", int.clone())])
//!     .with_method(Method::new("getX", int));
//!
//! let mut repo = TypeRepository::new();
//! let point = repo.register_buildable(point);
//! let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
//! let fluent = deriver.derive_fluent_interface(&point)?;
//! assert_eq!(fluent.simple_name(), "PointFluent");
//! # Ok::<(), buildsmith::derive::DeriveError>(())
//! ```
//!
//! ## See also
//!
//! - [`crate::eval`] – executes derived method bodies

mod assemble;
mod config;
mod descendants;
mod errors;
mod memo;
mod methods;
mod nested;
mod roots;
mod shapes;
mod support;
mod types;

pub use assemble::DerivedFamily;
pub use config::{AdmitAll, DerivationConfig, DescendantPolicy, SkipGenerated};
pub use descendants::DescendantProperty;
pub use errors::{DeriveError, DeriveResult};
pub use memo::DeriveFn;
pub use nested::NestedPair;
pub use shapes::Shape;

use buildsmith_model::TypeRepository;

use memo::MemoCache;

/// Derivation context.
///
/// Holds exclusive access to the repository for its lifetime: derivation reads declarations and registers the
/// editables it creates.
pub struct Deriver<'r> {
    pub(crate) repo: &'r mut TypeRepository,
    pub(crate) config: DerivationConfig,
    pub(crate) memo: MemoCache,
}

impl<'r> Deriver<'r> {
    /// Create a deriver over `repo`, registering the library root declarations (idempotently).
    pub fn new(repo: &'r mut TypeRepository, config: DerivationConfig) -> Self {
        for decl in roots::library_decls(&config) {
            repo.register(decl);
        }
        Self {
            repo,
            config,
            memo: MemoCache::default(),
        }
    }

    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    pub fn repository(&self) -> &TypeRepository {
        self.repo
    }

    /// Memo `(hits, misses)` since creation or the last [`reset`](Self::reset).
    pub fn memo_stats(&self) -> (usize, usize) {
        self.memo.stats()
    }

    /// Drop every memoized result.
    pub fn reset(&mut self) {
        tracing::debug!("resetting derivation cache");
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildsmith_model::TypeId;

    #[test]
    fn test_new_registers_library_roots_once() {
        let mut repo = TypeRepository::new();
        {
            let _deriver = Deriver::new(&mut repo, DerivationConfig::default());
        }
        let after_first = repo.len();
        {
            let _deriver = Deriver::new(&mut repo, DerivationConfig::default());
        }
        assert_eq!(after_first, 5);
        assert_eq!(repo.len(), after_first);
        assert!(repo.contains(&TypeId::new("io.buildsmith.builder", "BaseFluent")));
    }

    #[test]
    fn test_reset_clears_stats() {
        let mut repo = TypeRepository::new();
        let mut deriver = Deriver::new(&mut repo, DerivationConfig::default());
        deriver.reset();
        assert_eq!(deriver.memo_stats(), (0, 0));
        assert_eq!(deriver.config().nested_generic, "N");
    }
}
