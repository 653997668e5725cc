//! Type identity.

use std::fmt;

/// Identity of a type declaration: `(namespace, name)`.
///
/// Nested types use a dotted `name` (`CircleFluent.CenterNested`); [`TypeId::simple_name`] returns the last
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeId {
    pub namespace: String,
    pub name: String,
}

impl TypeId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Last segment of the (possibly dotted) name.
    pub fn simple_name(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((_, simple)) => simple,
            None => &self.name,
        }
    }

    /// Identity of a type nested directly inside this one.
    pub fn nested(&self, inner: &str) -> TypeId {
        TypeId::new(self.namespace.clone(), format!("{}.{inner}", self.name))
    }

    /// Identity of a top-level type in the same namespace, named `prefix + simple_name + suffix`.
    ///
    /// ## Examples
    /// ```rust
    /// use buildsmith_model::TypeId;
    ///
    /// let circle = TypeId::new("shapes", "Circle");
    /// assert_eq!(circle.derived("", "Builder"), TypeId::new("shapes", "CircleBuilder"));
    /// assert_eq!(circle.derived("Editable", ""), TypeId::new("shapes", "EditableCircle"));
    /// ```
    pub fn derived(&self, prefix: &str, suffix: &str) -> TypeId {
        TypeId::new(self.namespace.clone(), format!("{prefix}{}{suffix}", self.simple_name()))
    }

    /// Enclosing type's identity for nested names.
    pub fn enclosing(&self) -> Option<TypeId> {
        self.name
            .rsplit_once('.')
            .map(|(outer, _)| TypeId::new(self.namespace.clone(), outer))
    }

    /// `namespace.name`, or just `name` for the empty namespace.
    pub fn qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}
