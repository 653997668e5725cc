//! Collection interfaces recognized during shape classification.
//!
//! A property typed as one of these (or an alias) is classified as an ordered collection, an unordered
//! collection or a keyed map. Fields that start out empty are outlined with their [`default_impl`].
//!
//! ## Notes
//! - Aliases cover the common concrete and super-interfaces (`ArrayList`, `Collection`, `TreeMap`, ...), so a
//!   property declared with a concrete collection type still classifies by shape.

/// Stable identifier for a collection shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered collection.
    List,
    /// Unordered collection without duplicates.
    Set,
    /// Keyed map.
    Map,
}

/// Metadata for a collection shape.
#[derive(Debug, Clone, Copy)]
pub struct CollectionInfo {
    pub id: CollectionKind,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Insertion-ordered implementation used for field initializers.
    pub default_impl: &'static str,
    /// Number of type arguments (`1` for element collections, `2` for maps).
    pub arity: usize,
    pub description: &'static str,
}

const LIST: CollectionInfo = info(
    CollectionKind::List,
    "List",
    &["ArrayList", "LinkedList", "Collection", "Iterable"],
    "ArrayList",
    1,
    "Ordered collection.",
);
const SET: CollectionInfo = info(
    CollectionKind::Set,
    "Set",
    &["HashSet", "LinkedHashSet", "TreeSet", "SortedSet"],
    "LinkedHashSet",
    1,
    "Unordered collection without duplicates.",
);
const MAP: CollectionInfo = info(
    CollectionKind::Map,
    "Map",
    &["HashMap", "LinkedHashMap", "TreeMap", "SortedMap"],
    "LinkedHashMap",
    2,
    "Keyed map.",
);

/// Registry of collection shapes.
pub const COLLECTION_KINDS: &[CollectionInfo] = &[LIST, SET, MAP];

/// Resolve a collection type name (canonical, alias or default implementation).
pub fn from_str(name: &str) -> Option<CollectionKind> {
    if let Some(c) = COLLECTION_KINDS.iter().find(|c| c.canonical == name) {
        return Some(c.id);
    }
    COLLECTION_KINDS
        .iter()
        .find(|c| c.aliases.contains(&name))
        .map(|c| c.id)
}

/// Canonical interface name (`"List"`).
pub fn as_str(id: CollectionKind) -> &'static str {
    info_for(id).canonical
}

/// Implementation used for empty field initializers (`"ArrayList"`).
pub fn default_impl(id: CollectionKind) -> &'static str {
    info_for(id).default_impl
}

/// Return the full metadata entry for a collection shape.
pub fn info_for(id: CollectionKind) -> &'static CollectionInfo {
    match id {
        CollectionKind::List => &LIST,
        CollectionKind::Set => &SET,
        CollectionKind::Map => &MAP,
    }
}

const fn info(
    id: CollectionKind,
    canonical: &'static str,
    aliases: &'static [&'static str],
    default_impl: &'static str,
    arity: usize,
    description: &'static str,
) -> CollectionInfo {
    CollectionInfo {
        id,
        canonical,
        aliases,
        default_impl,
        arity,
        description,
    }
}
