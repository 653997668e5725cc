//! Interpreter for derived method bodies.
//!
//! Loads declarations (source types from a repository, derived families from a [`crate::derive::Deriver`]) and
//! executes the body IR against a small dynamic value model, so derived builders can be exercised end to end:
//! construct a builder, call its fluent mutators, `build()` the value and compare it with the original.
//!
//! ## Notes
//!
//! - **Source types** (declarations not flagged `generated`) get native semantics: a body-less constructor assigns
//!   fields by parameter name, body-less `getX`/`isX`/`setX` read and write field `x`, and `equals` compares the
//!   fields of class-compatible objects structurally.
//! - **Derived types** run their bodies. Constructors without an explicit `this(...)`/`super(...)` first run the
//!   superclass's no-argument constructor.
//! - **Validation** statements consult the installed [`Validator`]; with none installed they pass.
//! - Nothing here ever panics on malformed declarations: failures surface as [`EvalError`].
//!
//! ## Examples
//!
//! ```rust
//! use buildsmith::derive::{DerivationConfig, Deriver};
//! use buildsmith::eval::{Interpreter, Value};
//! use buildsmith_core::vocab::PrimitiveId;
//! use buildsmith_model::{Kind, Method, Param, Property, TypeDecl, TypeId, TypeRef, TypeRepository};
//!
//! let int = TypeRef::primitive(PrimitiveId::Int);
//! let point = TypeDecl::new(TypeId::new("geo", "Point"), Kind::Record)
//!     .with_property(Property::new("x", int.clone()))
//!     .with_constructor_params(vec![Param::new("x", int.clone())])
//!     .with_method(Method::new("getX", int));
//!
//! let mut repo = TypeRepository::new();
//! let point = repo.register_buildable(point);
//! let family = Deriver::new(&mut repo, DerivationConfig::default()).derive_family(&point)?;
//!
//! let mut interp = Interpreter::new(&repo);
//! interp.load_family(&family);
//! let builder = interp.instantiate(&family.builder.id, vec![])?;
//! interp.call(&builder, "withX", vec![Value::Int(7)])?;
//! let built = interp.call(&builder, "build", vec![])?;
//! let x = interp.call(&built, "getX", vec![])?;
//! assert!(interp.structurally_equal(&x, &Value::Int(7))?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dispatch;
mod equality;
mod errors;
mod exec;
mod value;

pub use errors::{EvalError, EvalResult};
pub use value::{ObjRef, Object, Shared, Value};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use buildsmith_model::{TypeDecl, TypeId, TypeRepository};

use crate::derive::{DerivationConfig, DerivedFamily};

/// Deepest call nesting the interpreter allows before failing with [`EvalError::CallDepthExceeded`].
pub const MAX_CALL_DEPTH: usize = 128;

/// Checks built values against their constraints.
pub trait Validator {
    /// Constraint violations of `object`; empty when it is valid.
    fn validate(&self, object: &Object) -> Vec<String>;
}

impl<F> Validator for F
where
    F: Fn(&Object) -> Vec<String>,
{
    fn validate(&self, object: &Object) -> Vec<String> {
        self(object)
    }
}

pub struct Interpreter {
    pub(crate) classes: HashMap<TypeId, Arc<TypeDecl>>,
    pub(crate) heap: Vec<Object>,
    pub(crate) validator: Option<Box<dyn Validator>>,
    pub(crate) lang_namespace: String,
    pub(crate) collection_namespace: String,
    pub(crate) depth: usize,
    /// Object pairs whose equality is being decided further up the stack.
    pub(crate) comparing: HashSet<(ObjRef, ObjRef)>,
}

impl Interpreter {
    /// Interpreter over every declaration in `repo`, with the default namespaces.
    pub fn new(repo: &TypeRepository) -> Self {
        Self::with_config(repo, &DerivationConfig::default())
    }

    /// Interpreter over every declaration in `repo`, recognizing the namespaces of `config`.
    pub fn with_config(repo: &TypeRepository, config: &DerivationConfig) -> Self {
        let mut interp = Self {
            classes: HashMap::new(),
            heap: Vec::new(),
            validator: None,
            lang_namespace: config.lang_namespace.clone(),
            collection_namespace: config.collection_namespace.clone(),
            depth: 0,
            comparing: HashSet::new(),
        };
        for decl in repo.definitions() {
            interp.load(decl);
        }
        tracing::debug!(classes = interp.classes.len(), "interpreter loaded repository");
        interp
    }

    /// Load `decl` and every type nested in it, replacing earlier declarations with the same id.
    pub fn load(&mut self, decl: &TypeDecl) {
        for d in decl.walk() {
            self.classes.insert(d.id.clone(), Arc::new(d.clone()));
        }
    }

    /// Load the source type and every derived declaration of a family.
    pub fn load_family(&mut self, family: &DerivedFamily) {
        self.load(&family.source);
        for decl in family.derived() {
            self.load(decl);
        }
    }

    pub fn load_families<'a>(&mut self, families: impl IntoIterator<Item = &'a DerivedFamily>) {
        for family in families {
            self.load_family(family);
        }
    }

    pub fn is_loaded(&self, id: &TypeId) -> bool {
        self.classes.contains_key(id)
    }

    pub fn set_validator(&mut self, validator: impl Validator + 'static) {
        self.validator = Some(Box::new(validator));
    }

    pub fn clear_validator(&mut self) {
        self.validator = None;
    }

    /// The heap object behind `obj`.
    pub fn object(&self, obj: ObjRef) -> &Object {
        &self.heap[obj.0]
    }

    /// `new class(args...)`.
    ///
    /// ## Errors
    /// - [`EvalError::UnknownClass`] / [`EvalError::AbstractInstantiation`] for classes that cannot be created.
    /// - [`EvalError::NoSuchConstructor`] when no constructor accepts `args`.
    /// - Any failure raised by the constructor bodies.
    pub fn instantiate(&mut self, class: &TypeId, args: Vec<Value>) -> EvalResult<Value> {
        self.new_object(class, args, None).map(Value::Object)
    }

    /// `receiver.method(args...)`, dispatched on the receiver's runtime class.
    pub fn call(&mut self, receiver: &Value, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        match receiver {
            Value::Object(obj) => {
                let class = self.object(*obj).class.clone();
                self.invoke(*obj, &class, method, args)
            }
            Value::Null => Err(EvalError::NullReceiver(method.to_string())),
            other => Err(EvalError::mismatch("object", other.kind_name())),
        }
    }

    /// Read field `name` of an object value, as seen from its runtime class.
    pub fn field(&self, value: &Value, name: &str) -> EvalResult<Value> {
        self.read_field(value, None, name)
    }

    /// Runtime class of an object value.
    pub fn class_of(&self, value: &Value) -> Option<&TypeId> {
        value.as_object().map(|obj| &self.object(obj).class)
    }

    pub fn is_instance_of(&self, value: &Value, class: &TypeId) -> bool {
        value.as_object().is_some_and(|obj| self.is_instance(obj, class))
    }
}
