//! Library root types that every derived declaration refers to.
//!
//! Derived fluents extend `Fluent`/`BaseFluent`, builders implement `VisitableBuilder`, editables implement
//! `Editable` and nested builders implement `Nested`. The engine synthesizes declarations for these from this
//! table, placed in the configured library namespace.
//!
//! ## Examples
//! ```rust
//! use buildsmith_core::vocab::roots::{self, LibraryRootId};
//!
//! assert_eq!(roots::as_str(LibraryRootId::BaseFluent), "BaseFluent");
//! assert_eq!(roots::info_for(LibraryRootId::VisitableBuilder).params, &["T", "V"]);
//! ```

/// Stable identifier for a library root type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryRootId {
    /// Root interface of every fluent: `Fluent<F extends Fluent<F>>`.
    Fluent,
    /// Root class of every fluent implementation: `BaseFluent<F extends Fluent<F>>`.
    BaseFluent,
    /// Builder capability: `VisitableBuilder<T, V>`.
    VisitableBuilder,
    /// Editable capability: `Editable<T>`.
    Editable,
    /// Nested builder capability: `Nested<F>`.
    Nested,
}

/// Metadata for a library root type.
#[derive(Debug, Clone, Copy)]
pub struct LibraryRootInfo {
    pub id: LibraryRootId,
    pub canonical: &'static str,
    /// Generic parameter names, in order.
    pub params: &'static [&'static str],
    /// Whether the type is an interface (as opposed to an abstract class).
    pub interface: bool,
    /// Single abstract operation the capability exposes, if any.
    pub operation: Option<&'static str>,
    pub description: &'static str,
}

const FLUENT: LibraryRootInfo = info(
    LibraryRootId::Fluent,
    "Fluent",
    &["F"],
    true,
    None,
    "Root of every fluent interface.",
);
const BASE_FLUENT: LibraryRootInfo = info(
    LibraryRootId::BaseFluent,
    "BaseFluent",
    &["F"],
    false,
    None,
    "Root of every fluent implementation.",
);
const VISITABLE_BUILDER: LibraryRootInfo = info(
    LibraryRootId::VisitableBuilder,
    "VisitableBuilder",
    &["T", "V"],
    true,
    Some("build"),
    "Builder capability indexed by the built type and the builder itself.",
);
const EDITABLE: LibraryRootInfo = info(
    LibraryRootId::Editable,
    "Editable",
    &["T"],
    true,
    Some("edit"),
    "Capability of reopening a value as a builder.",
);
const NESTED: LibraryRootInfo = info(
    LibraryRootId::Nested,
    "Nested",
    &["F"],
    true,
    Some("and"),
    "Capability of returning to the enclosing fluent.",
);

/// Registry of library root types.
pub const LIBRARY_ROOTS: &[LibraryRootInfo] = &[FLUENT, BASE_FLUENT, VISITABLE_BUILDER, EDITABLE, NESTED];

/// Resolve a library root by name.
pub fn from_str(name: &str) -> Option<LibraryRootId> {
    LIBRARY_ROOTS.iter().find(|r| r.canonical == name).map(|r| r.id)
}

/// Canonical name (`"Fluent"`).
pub fn as_str(id: LibraryRootId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a library root.
pub fn info_for(id: LibraryRootId) -> &'static LibraryRootInfo {
    match id {
        LibraryRootId::Fluent => &FLUENT,
        LibraryRootId::BaseFluent => &BASE_FLUENT,
        LibraryRootId::VisitableBuilder => &VISITABLE_BUILDER,
        LibraryRootId::Editable => &EDITABLE,
        LibraryRootId::Nested => &NESTED,
    }
}

const fn info(
    id: LibraryRootId,
    canonical: &'static str,
    params: &'static [&'static str],
    interface: bool,
    operation: Option<&'static str>,
    description: &'static str,
) -> LibraryRootInfo {
    LibraryRootInfo {
        id,
        canonical,
        params,
        interface,
        operation,
        description,
    }
}
