//! Primitive kinds and their boxed counterparts.
//!
//! ## Examples
//! ```rust
//! use buildsmith_core::vocab::primitives::{self, PrimitiveId};
//!
//! assert_eq!(primitives::from_str("float64"), Some(PrimitiveId::Double));
//! assert_eq!(primitives::boxed_name(PrimitiveId::Int), "Integer");
//! assert_eq!(primitives::from_boxed("Character"), Some(PrimitiveId::Char));
//! ```

/// Stable identifier for a primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

/// Metadata for a primitive kind.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveInfo {
    pub id: PrimitiveId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Name of the boxed reference type (`Integer` for `int`).
    pub boxed: &'static str,
    pub description: &'static str,
}

/// Simple name of the string type, treated as a simple value alongside boxed primitives.
pub const STRING_NAME: &str = "String";

/// Simple name of the universal supertype.
pub const OBJECT_NAME: &str = "Object";

const BOOLEAN: PrimitiveInfo = info(PrimitiveId::Boolean, "boolean", &["bool"], "Boolean", "Truth value.");
const BYTE: PrimitiveInfo = info(PrimitiveId::Byte, "byte", &["i8"], "Byte", "8-bit signed integer.");
const CHAR: PrimitiveInfo = info(PrimitiveId::Char, "char", &[], "Character", "UTF-16 code unit.");
const SHORT: PrimitiveInfo = info(PrimitiveId::Short, "short", &["i16"], "Short", "16-bit signed integer.");
const INT: PrimitiveInfo = info(PrimitiveId::Int, "int", &["i32"], "Integer", "32-bit signed integer.");
const LONG: PrimitiveInfo = info(PrimitiveId::Long, "long", &["i64"], "Long", "64-bit signed integer.");
const FLOAT: PrimitiveInfo = info(PrimitiveId::Float, "float", &["f32", "float32"], "Float", "32-bit float.");
const DOUBLE: PrimitiveInfo = info(PrimitiveId::Double, "double", &["f64", "float64"], "Double", "64-bit float.");

/// Registry of primitive kinds, in declaration order of [`PrimitiveId`].
pub const PRIMITIVES: &[PrimitiveInfo] = &[BOOLEAN, BYTE, CHAR, SHORT, INT, LONG, FLOAT, DOUBLE];

/// Resolve a primitive spelling (canonical or alias).
pub fn from_str(name: &str) -> Option<PrimitiveId> {
    PRIMITIVES
        .iter()
        .find(|p| p.canonical == name || p.aliases.contains(&name))
        .map(|p| p.id)
}

/// Resolve a boxed type name back to its primitive kind.
pub fn from_boxed(name: &str) -> Option<PrimitiveId> {
    PRIMITIVES.iter().find(|p| p.boxed == name).map(|p| p.id)
}

/// Canonical spelling (`"int"`).
pub fn as_str(id: PrimitiveId) -> &'static str {
    info_for(id).canonical
}

/// Boxed type name (`"Integer"`).
pub fn boxed_name(id: PrimitiveId) -> &'static str {
    info_for(id).boxed
}

/// Whether `name` is a boxed primitive or the string type.
pub fn is_simple_value_name(name: &str) -> bool {
    name == STRING_NAME || from_boxed(name).is_some()
}

/// Return the full metadata entry for a primitive kind.
pub fn info_for(id: PrimitiveId) -> &'static PrimitiveInfo {
    match id {
        PrimitiveId::Boolean => &BOOLEAN,
        PrimitiveId::Byte => &BYTE,
        PrimitiveId::Char => &CHAR,
        PrimitiveId::Short => &SHORT,
        PrimitiveId::Int => &INT,
        PrimitiveId::Long => &LONG,
        PrimitiveId::Float => &FLOAT,
        PrimitiveId::Double => &DOUBLE,
    }
}

impl PrimitiveId {
    /// Whether values of this kind are whole numbers.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveId::Byte | PrimitiveId::Short | PrimitiveId::Int | PrimitiveId::Long
        )
    }

    /// Whether values of this kind are floating point numbers.
    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveId::Float | PrimitiveId::Double)
    }
}

const fn info(
    id: PrimitiveId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    boxed: &'static str,
    description: &'static str,
) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        canonical,
        aliases,
        boxed,
        description,
    }
}
