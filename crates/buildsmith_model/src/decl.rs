//! Type declarations and their members.

use std::hash::{Hash, Hasher};

use crate::body::{Block, Expr};
use crate::id::TypeId;
use crate::types::{ClassRef, TypeParam, TypeRef};

/// Declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Kind {
    /// A class with fields and constructors.
    Record,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }

    pub fn with_abstract(self, is_abstract: bool) -> Self {
        Self { is_abstract, ..self }
    }

    pub fn with_static(self, is_static: bool) -> Self {
        Self { is_static, ..self }
    }

    pub fn with_final(self, is_final: bool) -> Self {
        Self { is_final, ..self }
    }
}

/// Derivation flags carried by a declaration. Never part of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct TypeFlags {
    /// The declaration was synthesized by derivation.
    pub generated: bool,
    /// Builders for this type run the validator in `build()`.
    pub validation_enabled: bool,
}

impl TypeFlags {
    pub const GENERATED: TypeFlags = TypeFlags {
        generated: true,
        validation_enabled: false,
    };
}

/// A field of a declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Modifiers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initializer: Option<Expr>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::default(),
            initializer: None,
        }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    pub fn with_initializer(self, initializer: Expr) -> Self {
        Self {
            initializer: Some(initializer),
            ..self
        }
    }

    pub fn with_type(self, ty: TypeRef) -> Self {
        Self { ty, ..self }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    /// Trailing `T...` parameter; `ty` is the element type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub varargs: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            varargs: false,
        }
    }

    pub fn varargs(name: impl Into<String>, element: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: element,
            varargs: true,
        }
    }
}

/// A method or constructor. Constructors are named after the declaring type's simple name and return `void`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<TypeParam>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Modifiers,
    /// `None` for abstract and interface methods, and for source methods whose bodies are not modelled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: Option<Block>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type,
            modifiers: Modifiers::default(),
            body: None,
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(self, params: Vec<Param>) -> Self {
        Self { params, ..self }
    }

    pub fn with_type_params(self, type_params: Vec<TypeParam>) -> Self {
        Self { type_params, ..self }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    pub fn with_body(self, body: Block) -> Self {
        Self {
            body: Some(body),
            ..self
        }
    }

    /// The signature alone, as it appears on an interface.
    pub fn without_body(self) -> Self {
        Self {
            body: None,
            modifiers: self.modifiers.with_abstract(true),
            ..self
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.varargs)
    }

    /// Erased signature used to detect duplicates: `name(type, type, ...)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let ty = p.ty.to_string();
                if p.varargs { format!("{ty}...") } else { ty }
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A type declaration.
///
/// Equality and hashing use [`TypeDecl::id`] only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDecl {
    pub id: TypeId,
    pub kind: Kind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Modifiers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<TypeParam>,
    /// Superclass for records (first entry), super-interfaces for interfaces.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extends: Vec<ClassRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub implements: Vec<ClassRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: Vec<Property>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constructors: Vec<Method>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<Method>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enclosing: Option<TypeId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nested: Vec<TypeDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: TypeFlags,
}

impl PartialEq for TypeDecl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDecl {}

impl Hash for TypeDecl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TypeDecl {
    pub fn new(id: TypeId, kind: Kind) -> Self {
        Self {
            id,
            kind,
            modifiers: Modifiers::default(),
            params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            enclosing: None,
            nested: Vec::new(),
            flags: TypeFlags::default(),
        }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Mark the declaration abstract.
    pub fn into_abstract(self) -> Self {
        let modifiers = self.modifiers.with_abstract(true);
        Self { modifiers, ..self }
    }

    pub fn with_flags(self, flags: TypeFlags) -> Self {
        Self { flags, ..self }
    }

    pub fn with_param(mut self, param: TypeParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(self, params: Vec<TypeParam>) -> Self {
        Self { params, ..self }
    }

    pub fn extending(mut self, supertype: ClassRef) -> Self {
        self.extends.push(supertype);
        self
    }

    pub fn implementing(mut self, interface: ClassRef) -> Self {
        self.implements.push(interface);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn with_constructor(mut self, constructor: Method) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a public, body-less constructor taking `params`.
    pub fn with_constructor_params(self, params: Vec<Param>) -> Self {
        let ctor = Method::new(self.id.simple_name(), TypeRef::Void).with_params(params);
        self.with_constructor(ctor)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods.extend(methods);
        self
    }

    pub fn with_nested(mut self, nested: TypeDecl) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn enclosed_by(self, enclosing: TypeId) -> Self {
        Self {
            enclosing: Some(enclosing),
            ..self
        }
    }

    pub fn simple_name(&self) -> &str {
        self.id.simple_name()
    }

    /// Abstract records and all interfaces.
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract || self.kind == Kind::Interface
    }

    pub fn is_interface(&self) -> bool {
        self.kind == Kind::Interface
    }

    /// Declared superclass (first `extends` entry).
    pub fn superclass(&self) -> Option<&ClassRef> {
        self.extends.first()
    }

    /// All direct supertypes, `extends` first.
    pub fn supertypes(&self) -> impl Iterator<Item = &ClassRef> {
        self.extends.iter().chain(self.implements.iter())
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Reference parameterized by the declaration's own generic parameters (`Box<T>` inside `Box<T>`).
    pub fn to_internal_ref(&self) -> ClassRef {
        ClassRef::new(self.id.clone(), self.params.iter().map(TypeParam::to_ref).collect())
    }

    /// Reference with a wildcard for every generic parameter (`Box<?>`).
    pub fn to_wildcard_ref(&self) -> ClassRef {
        ClassRef::new(self.id.clone(), self.params.iter().map(|_| TypeRef::wildcard()).collect())
    }

    /// Walk nested declarations depth-first, including `self`.
    pub fn walk(&self) -> Vec<&TypeDecl> {
        let mut out = vec![self];
        for nested in &self.nested {
            out.extend(nested.walk());
        }
        out
    }
}
