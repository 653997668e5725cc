//! Derivation configuration.

use std::fmt;
use std::sync::Arc;

use buildsmith_model::TypeDecl;

/// Decides which registered subtypes may appear as descendants of a polymorphic property.
///
/// The engine only asks about concrete, registered, buildable subtypes; the policy narrows that set further.
pub trait DescendantPolicy: fmt::Debug + Send + Sync {
    fn admits(&self, candidate: &TypeDecl) -> bool;
}

/// Reject declarations flagged `generated`, so derived families (editables and the like) never get re-derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipGenerated;

impl DescendantPolicy for SkipGenerated {
    fn admits(&self, candidate: &TypeDecl) -> bool {
        !candidate.flags.generated
    }
}

/// Admit every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmitAll;

impl DescendantPolicy for AdmitAll {
    fn admits(&self, _candidate: &TypeDecl) -> bool {
        true
    }
}

/// Derivation configuration
#[derive(Debug, Clone)]
pub struct DerivationConfig {
    /// Namespace of the library roots (`Fluent`, `BaseFluent`, `VisitableBuilder`, `Editable`, `Nested`)
    pub library_namespace: String,
    /// Namespace the collection interfaces live in
    pub collection_namespace: String,
    /// Namespace of boxed primitives, `String` and `Object`
    pub lang_namespace: String,
    /// Preferred letter for the self parameter of nested builders
    pub nested_generic: String,
    /// Derive editables, and make builders build them
    pub editable_enabled: bool,
    /// Which subtypes count as descendants
    pub descendant_policy: Arc<dyn DescendantPolicy>,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            library_namespace: "io.buildsmith.builder".to_string(),
            collection_namespace: "java.util".to_string(),
            lang_namespace: "java.lang".to_string(),
            nested_generic: "N".to_string(),
            editable_enabled: true,
            descendant_policy: Arc::new(SkipGenerated),
        }
    }
}

impl DerivationConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the library root namespace
    pub fn with_library_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.library_namespace = namespace.into();
        self
    }

    /// Set the collection namespace
    pub fn with_collection_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.collection_namespace = namespace.into();
        self
    }

    /// Set the namespace of boxed primitives and `String`
    pub fn with_lang_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.lang_namespace = namespace.into();
        self
    }

    /// Set the preferred nested self-parameter letter
    pub fn with_nested_generic(mut self, letter: impl Into<String>) -> Self {
        self.nested_generic = letter.into();
        self
    }

    /// Enable or disable editables
    pub fn with_editable_enabled(mut self, enabled: bool) -> Self {
        self.editable_enabled = enabled;
        self
    }

    /// Replace the descendant policy
    pub fn with_descendant_policy(mut self, policy: impl DescendantPolicy + 'static) -> Self {
        self.descendant_policy = Arc::new(policy);
        self
    }
}
