//! Naming conventions for derived types and their members.
//!
//! Every derived name the engine produces is spelled here, so the model, the engine and the interpreter never
//! disagree on how `center` becomes `withNewCenterLike` or how `Circle` becomes `CircleFluentImpl`.
//!
//! ## Examples
//! ```rust
//! use buildsmith_core::naming;
//!
//! assert_eq!(naming::with_new_like("center"), "withNewCenterLike");
//! assert_eq!(naming::singularize("addresses"), "address");
//! assert_eq!(naming::next_generic(&["S", "T"], None), "U");
//! ```

/// Suffix of the derived fluent interface (`CircleFluent`).
pub const FLUENT_SUFFIX: &str = "Fluent";

/// Suffix of the derived fluent implementation (`CircleFluentImpl`).
pub const FLUENT_IMPL_SUFFIX: &str = "FluentImpl";

/// Suffix of the derived builder (`CircleBuilder`).
pub const BUILDER_SUFFIX: &str = "Builder";

/// Prefix of the derived editable subtype (`EditableCircle`).
pub const EDITABLE_PREFIX: &str = "Editable";

/// Suffix of a nested builder interface (`CenterNested`).
pub const NESTED_SUFFIX: &str = "Nested";

/// Suffix appended to a nested interface name to name its implementation (`CenterNestedImpl`).
pub const IMPL_SUFFIX: &str = "Impl";

/// Name of the builder field that holds the wrapped fluent.
pub const FLUENT_FIELD: &str = "fluent";

/// Name of the builder field and constructor parameter carrying the validation switch.
pub const VALIDATION_FIELD: &str = "validationEnabled";

/// Name of the nested implementation field holding the inner builder.
pub const NESTED_BUILDER_FIELD: &str = "builder";

/// Name of the constructor parameter carrying a seed instance.
pub const INSTANCE_PARAM: &str = "instance";

/// Name of the local holding the freshly built value inside `build()`.
pub const BUILDABLE_LOCAL: &str = "buildable";

/// Well-known method names.
pub const BUILD_METHOD: &str = "build";
pub const VALIDATE_METHOD: &str = "validate";
pub const EQUALS_METHOD: &str = "equals";
pub const EDIT_METHOD: &str = "edit";
pub const AND_METHOD: &str = "and";

/// Letters scanned, in order, when a fresh generic parameter is needed.
///
/// ## Notes
/// - The scan starts at `S` so the common case reads `CircleFluent<S extends CircleFluent<S>>`.
/// - When every letter is taken the scan restarts with a numeric suffix (`S1`, `T1`, ...).
pub const GENERIC_ALPHABET: &[&str] = &[
    "S", "T", "U", "V", "W", "X", "Y", "Z", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R",
];

/// Whether `name` is one of the letters of [`GENERIC_ALPHABET`].
pub fn is_generic_letter(name: &str) -> bool {
    GENERIC_ALPHABET.contains(&name)
}

/// Upper-case the first character.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn a plural property name into the singular used by collection entry points.
///
/// ## Notes
/// - Only regular English endings are handled (`-ies`, `-sses`, `-xes`, `-ches`, `-shes`, `-s`).
/// - Irregular plurals (`children`) and words already ending in `ss` are returned unchanged.
pub fn singularize(name: &str) -> String {
    if name.len() > 3 && name.ends_with("ies") {
        return format!("{}y", &name[..name.len() - 3]);
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    if name.ends_with("ss") || name.len() < 2 {
        return name.to_string();
    }
    match name.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => name.to_string(),
    }
}

/// Pick a generic parameter name not present in `existing`.
///
/// ## Parameters
/// - `existing`: parameter names already in scope.
/// - `preferred`: letter to start the alphabet scan at (e.g. `Some("N")` for nested builders).
///
/// ## Returns
/// - The first free letter of [`GENERIC_ALPHABET`] at or after `preferred`, wrapping around. A `preferred` that is
///   not in the alphabet (see [`is_generic_letter`]) starts the scan at `S`.
pub fn next_generic(existing: &[&str], preferred: Option<&str>) -> String {
    let start = preferred
        .and_then(|p| GENERIC_ALPHABET.iter().position(|letter| *letter == p))
        .unwrap_or(0);
    let len = GENERIC_ALPHABET.len();

    let mut round = 0usize;
    loop {
        for offset in 0..len {
            let letter = GENERIC_ALPHABET[(start + offset) % len];
            let candidate = if round == 0 {
                letter.to_string()
            } else {
                format!("{letter}{round}")
            };
            if !existing.contains(&candidate.as_str()) {
                return candidate;
            }
        }
        round += 1;
    }
}

/// `getX`, or `isX` for boolean-typed properties.
pub fn getter(property: &str, boolean: bool) -> String {
    if boolean {
        format!("is{}", capitalize(property))
    } else {
        format!("get{}", capitalize(property))
    }
}

/// `getXArray`, the array view of an array-shaped property.
pub fn array_getter(property: &str) -> String {
    format!("get{}Array", capitalize(property))
}

/// `setX`, the source type's own mutator.
pub fn setter(property: &str) -> String {
    format!("set{}", capitalize(property))
}

/// `withX`, the fluent setter.
pub fn with(property: &str) -> String {
    format!("with{}", capitalize(property))
}

/// `addToX`.
pub fn add_to(property: &str) -> String {
    format!("addTo{}", capitalize(property))
}

/// `addAllToX`.
pub fn add_all_to(property: &str) -> String {
    format!("addAllTo{}", capitalize(property))
}

/// `removeFromX`.
pub fn remove_from(property: &str) -> String {
    format!("removeFrom{}", capitalize(property))
}

/// `removeAllFromX`.
pub fn remove_all_from(property: &str) -> String {
    format!("removeAllFrom{}", capitalize(property))
}

/// `withNewX`.
pub fn with_new(property: &str) -> String {
    format!("withNew{}", capitalize(property))
}

/// `withNewXLike`.
pub fn with_new_like(property: &str) -> String {
    format!("withNew{}Like", capitalize(property))
}

/// `addNewX` (pass the singular name).
pub fn add_new(singular: &str) -> String {
    format!("addNew{}", capitalize(singular))
}

/// `addNewXLike` (pass the singular name).
pub fn add_new_like(singular: &str) -> String {
    format!("addNew{}Like", capitalize(singular))
}

/// `editX`.
pub fn edit(property: &str) -> String {
    format!("edit{}", capitalize(property))
}

/// `endX`.
pub fn end(property: &str) -> String {
    format!("end{}", capitalize(property))
}

/// Name of the nested builder interface for a property (`CenterNested`).
pub fn nested_interface(property: &str) -> String {
    format!("{}{NESTED_SUFFIX}", capitalize(property))
}

/// Name of the nested builder implementation for a property (`CenterNestedImpl`).
pub fn nested_impl(property: &str) -> String {
    format!("{}{IMPL_SUFFIX}", nested_interface(property))
}

/// Name of a descendant variant of a property (`circle` + `Shapes` = `circleShapes`).
pub fn descendant_property(descendant: &str, property: &str) -> String {
    format!("{}{}", decapitalize(descendant), capitalize(property))
}

/// Property name a getter/setter method refers to, if it follows the accessor convention.
///
/// ## Examples
/// ```rust
/// use buildsmith_core::naming::{accessor_property, AccessorKind};
///
/// assert_eq!(accessor_property("getRadius"), Some((AccessorKind::Getter, "radius".to_string())));
/// assert_eq!(accessor_property("isActive"), Some((AccessorKind::Getter, "active".to_string())));
/// assert_eq!(accessor_property("setRadius"), Some((AccessorKind::Setter, "radius".to_string())));
/// assert_eq!(accessor_property("get"), None);
/// ```
pub fn accessor_property(method: &str) -> Option<(AccessorKind, String)> {
    let (kind, rest) = if let Some(rest) = method.strip_prefix("get") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.strip_prefix("is") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.strip_prefix("set") {
        (AccessorKind::Setter, rest)
    } else {
        return None;
    };
    match rest.chars().next() {
        Some(c) if c.is_uppercase() => Some((kind, decapitalize(rest))),
        _ => None,
    }
}

/// Which side of the accessor convention a method name sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}
