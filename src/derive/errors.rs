//! Derivation failures.
//!
//! Every variant is fatal for the derivation that raised it: the engine stops and propagates the error to the
//! caller, which owns the diagnostic. Nothing here is retried or downgraded.

use buildsmith_model::TypeId;
use miette::Diagnostic;
use thiserror::Error;

pub type DeriveResult<T> = Result<T, DeriveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DeriveError {
    /// The type has no unique maximal-arity constructor.
    #[error("type `{ty}` has no canonical constructor ({candidates} constructors of maximal arity)")]
    #[diagnostic(
        code(buildsmith::missing_canonical_constructor),
        help("declare exactly one constructor taking every field")
    )]
    MissingCanonicalConstructor { ty: TypeId, candidates: usize },

    /// A constructor argument (or setter-only property) has no matching accessor.
    #[error("type `{ty}` has no getter for `{property}`")]
    #[diagnostic(
        code(buildsmith::missing_getter),
        help("add a zero-argument `get`/`is` accessor named after the property")
    )]
    MissingGetter { ty: TypeId, property: String },

    /// A referenced element or property type is not in the repository.
    #[error("cannot resolve type `{ty}` of property `{property}`")]
    #[diagnostic(
        code(buildsmith::unresolved_type),
        help("register the declaration before deriving types that refer to it")
    )]
    UnresolvedTypeDefinition { property: String, ty: String },

    /// A property typed as a wildcard or `void`: no accessor or array form can be written against it.
    ///
    /// Array dimensions only exist on class, primitive and parameter references, so an array component is
    /// always one of those and this is raised for the property type itself.
    #[error("property `{property}` has malformed type `{ty}`: expected a class, primitive or type parameter")]
    #[diagnostic(
        code(buildsmith::malformed_property_type),
        help("declare the property with a concrete type; wildcards belong in type arguments only")
    )]
    MalformedPropertyType { property: String, ty: String },
}

impl DeriveError {
    /// Type the failure is reported against, when the variant names one.
    pub fn offending_type(&self) -> Option<&TypeId> {
        match self {
            DeriveError::MissingCanonicalConstructor { ty, .. } | DeriveError::MissingGetter { ty, .. } => Some(ty),
            DeriveError::UnresolvedTypeDefinition { .. } | DeriveError::MalformedPropertyType { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_type_and_property() {
        let err = DeriveError::MissingGetter {
            ty: TypeId::new("shapes", "Circle"),
            property: "radius".to_string(),
        };
        assert_eq!(err.to_string(), "type `shapes.Circle` has no getter for `radius`");
        assert_eq!(err.offending_type(), Some(&TypeId::new("shapes", "Circle")));
    }

    #[test]
    fn test_diagnostic_codes_are_stable() {
        let err = DeriveError::UnresolvedTypeDefinition {
            property: "center".to_string(),
            ty: "Point".to_string(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("buildsmith::unresolved_type"));
    }
}
