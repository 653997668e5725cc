//! Structural type model consumed and produced by the buildsmith derivation engine.
//!
//! A front end describes existing data types as [`TypeDecl`] values; the engine derives new `TypeDecl`s (fluents,
//! builders, editables, nested builders) from them; an emitter renders the results. Everything here is a plain
//! value: no IO, no rendering to source files.
//!
//! ## Notes
//! - [`TypeDecl`] equality and hashing use the identity (`namespace`, `name`) only.
//! - Declarations are never mutated in place. The `with_*` builders consume a value and return a new one.
//! - Method bodies are expressed in a small closed IR ([`body`]), which is enough to describe every body the
//!   engine synthesizes.
//! - With the `serde` feature every model type (de)serializes, which is how external readers hand models over.
//!
//! ## Examples
//! ```rust
//! use buildsmith_model::{Kind, Param, Property, TypeDecl, TypeId, TypeRef, TypeRepository};
//! use buildsmith_core::vocab::PrimitiveId;
//!
//! let point = TypeDecl::new(TypeId::new("demo", "Point"), Kind::Record)
//!     .with_property(Property::new("x", TypeRef::primitive(PrimitiveId::Int)))
//!     .with_constructor_params(vec![Param::new("x", TypeRef::primitive(PrimitiveId::Int))]);
//!
//! let mut repo = TypeRepository::new();
//! let stored = repo.register_buildable(point);
//! assert!(repo.is_buildable(&stored.id));
//! assert_eq!(stored.id.to_string(), "demo.Point");
//! ```
//!
//! ## See also
//! - `buildsmith_core` for naming conventions and the primitive/collection vocabulary.

#![forbid(unsafe_code)]

pub mod body;
pub mod decl;
pub mod id;
pub mod repository;
pub mod types;

pub use body::{Block, Delegation, Equality, Expr, Intrinsic, Place, Stmt};
pub use decl::{Kind, Method, Modifiers, Param, Property, TypeDecl, TypeFlags, Visibility};
pub use id::TypeId;
pub use repository::TypeRepository;
pub use types::{ClassRef, PrimitiveRef, TypeParam, TypeParamRef, TypeRef, WildcardRef};
