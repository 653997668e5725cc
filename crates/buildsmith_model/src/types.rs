//! Type references and generic parameter declarations.
//!
//! [`TypeRef`] is a closed sum over the five kinds of reference a declaration can mention. Derivation dispatches on
//! it with exhaustive `match`es.
//!
//! ## Examples
//! ```rust
//! use buildsmith_model::{ClassRef, TypeId, TypeParam, TypeRef};
//!
//! let fluent = TypeId::new("shapes", "CircleFluent");
//! let s = TypeParam::bounded("S", vec![ClassRef::new(fluent.clone(), vec![TypeRef::param("S")])]);
//! assert_eq!(s.to_string(), "S extends CircleFluent<S>");
//! assert_eq!(TypeRef::param("S").array_of().to_string(), "S[]");
//! ```

use std::fmt;

use buildsmith_core::vocab::primitives::{self, PrimitiveId};

use crate::id::TypeId;

/// A reference to a type, as it appears on a property, parameter, return or supertype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum TypeRef {
    /// Reference to a record/interface/enum declaration.
    Class(ClassRef),
    Primitive(PrimitiveRef),
    /// Reference to a generic parameter in scope.
    Param(TypeParamRef),
    Wildcard(WildcardRef),
    Void,
}

/// `Name<args...>[]...`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassRef {
    pub id: TypeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arguments: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimensions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveRef {
    #[cfg_attr(feature = "serde", serde(with = "primitive_serde"))]
    pub primitive: PrimitiveId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimensions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParamRef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimensions: u32,
}

/// `?` or `? extends Bound`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WildcardRef {
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Vec<TypeRef>,
}

/// Declaration of a generic parameter: `S extends CircleFluent<S>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParam {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Vec<ClassRef>,
}

impl TypeRef {
    pub fn class(id: TypeId) -> Self {
        TypeRef::Class(ClassRef::of(id))
    }

    pub fn class_with(id: TypeId, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Class(ClassRef::new(id, arguments))
    }

    pub fn primitive(primitive: PrimitiveId) -> Self {
        TypeRef::Primitive(PrimitiveRef {
            primitive,
            dimensions: 0,
        })
    }

    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(TypeParamRef {
            name: name.into(),
            dimensions: 0,
        })
    }

    /// Unbounded wildcard `?`.
    pub fn wildcard() -> Self {
        TypeRef::Wildcard(WildcardRef::default())
    }

    /// `? extends bound`.
    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard(WildcardRef { bounds: vec![bound] })
    }

    /// Array dimensions; always `0` for wildcards and `void`.
    pub fn dimensions(&self) -> u32 {
        match self {
            TypeRef::Class(c) => c.dimensions,
            TypeRef::Primitive(p) => p.dimensions,
            TypeRef::Param(p) => p.dimensions,
            TypeRef::Wildcard(_) | TypeRef::Void => 0,
        }
    }

    pub fn is_array(&self) -> bool {
        self.dimensions() > 0
    }

    /// The same reference with `dimensions` replaced. Wildcards and `void` have no array form and are returned
    /// unchanged.
    pub fn with_dimensions(self, dimensions: u32) -> Self {
        match self {
            TypeRef::Class(c) => TypeRef::Class(ClassRef { dimensions, ..c }),
            TypeRef::Primitive(p) => TypeRef::Primitive(PrimitiveRef { dimensions, ..p }),
            TypeRef::Param(p) => TypeRef::Param(TypeParamRef { dimensions, ..p }),
            other @ (TypeRef::Wildcard(_) | TypeRef::Void) => other,
        }
    }

    /// One more array dimension.
    pub fn array_of(self) -> Self {
        let dims = self.dimensions();
        self.with_dimensions(dims + 1)
    }

    /// The component type with every array dimension removed.
    pub fn unwrap_array(&self) -> Self {
        self.clone().with_dimensions(0)
    }

    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            TypeRef::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Primitive kind of a non-array primitive reference.
    pub fn as_primitive(&self) -> Option<PrimitiveId> {
        match self {
            TypeRef::Primitive(p) if p.dimensions == 0 => Some(p.primitive),
            _ => None,
        }
    }

    /// Whether this is a non-array primitive.
    pub fn is_primitive(&self) -> bool {
        self.as_primitive().is_some()
    }
}

impl ClassRef {
    pub fn new(id: TypeId, arguments: Vec<TypeRef>) -> Self {
        Self {
            id,
            arguments,
            dimensions: 0,
        }
    }

    /// Raw reference without type arguments.
    pub fn of(id: TypeId) -> Self {
        Self::new(id, Vec::new())
    }
}

impl From<ClassRef> for TypeRef {
    fn from(value: ClassRef) -> Self {
        TypeRef::Class(value)
    }
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<ClassRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Reference to this parameter.
    pub fn to_ref(&self) -> TypeRef {
        TypeRef::param(self.name.clone())
    }
}

fn write_dims(f: &mut fmt::Formatter<'_>, dimensions: u32) -> fmt::Result {
    for _ in 0..dimensions {
        f.write_str("[]")?;
    }
    Ok(())
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.simple_name())?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.arguments, ", ")?;
            f.write_str(">")?;
        }
        write_dims(f, self.dimensions)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Class(c) => write!(f, "{c}"),
            TypeRef::Primitive(p) => {
                f.write_str(primitives::as_str(p.primitive))?;
                write_dims(f, p.dimensions)
            }
            TypeRef::Param(p) => {
                f.write_str(&p.name)?;
                write_dims(f, p.dimensions)
            }
            TypeRef::Wildcard(w) => {
                f.write_str("?")?;
                if !w.bounds.is_empty() {
                    f.write_str(" extends ")?;
                    write_joined(f, &w.bounds, " & ")?;
                }
                Ok(())
            }
            TypeRef::Void => f.write_str("void"),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bounds.is_empty() {
            f.write_str(" extends ")?;
            write_joined(f, &self.bounds, " & ")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod primitive_serde {
    use buildsmith_core::vocab::primitives::{self, PrimitiveId};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &PrimitiveId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(primitives::as_str(*id))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PrimitiveId, D::Error> {
        let name = String::deserialize(deserializer)?;
        primitives::from_str(&name).ok_or_else(|| D::Error::custom(format!("unknown primitive `{name}`")))
    }
}
