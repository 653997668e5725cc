//! Type vocabulary registries.
//!
//! The engine recognizes a handful of type names by spelling: primitive kinds and their boxed forms, the
//! collection interfaces that drive shape classification, and the library roots every derived type hangs off.
//! Callers work with **stable ids** and look spellings up here instead of comparing strings inline.
//!
//! ## Notes
//! - Registries are pure tables: no model types, no namespaces (namespaces are configuration).
//! - Lookup via `from_str` is case-sensitive and accepts aliases.
//!
//! ## Examples
//! ```rust
//! use buildsmith_core::vocab::collections::{self, CollectionKind};
//!
//! assert_eq!(collections::from_str("ArrayList"), Some(CollectionKind::List));
//! assert_eq!(collections::default_impl(CollectionKind::Map), "LinkedHashMap");
//! ```

pub mod collections;
pub mod primitives;
pub mod roots;

pub use collections::{COLLECTION_KINDS, CollectionInfo, CollectionKind};
pub use primitives::{PRIMITIVES, PrimitiveId, PrimitiveInfo};
pub use roots::{LIBRARY_ROOTS, LibraryRootId, LibraryRootInfo};
