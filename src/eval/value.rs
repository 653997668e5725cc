//! Runtime values.
//!
//! Collections are shared, mutable references: a getter that hands out a backing list hands out *that* list.
//! Objects live on the interpreter heap and are referenced by [`ObjRef`], so object graphs with back references
//! (a builder pointing at itself as its fluent) never form `Rc` cycles.

use std::cell::RefCell;
use std::rc::Rc;

use buildsmith_model::TypeId;
use indexmap::IndexMap;

pub type Shared<T> = Rc<RefCell<T>>;

fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Handle to an object on the interpreter heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(pub(crate) usize);

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(Rc<str>),
    Array(Shared<Vec<Value>>),
    List(Shared<Vec<Value>>),
    /// Insertion ordered; duplicates are rejected on insertion.
    Set(Shared<Vec<Value>>),
    /// Insertion ordered entries with structurally unique keys.
    Map(Shared<Vec<(Value, Value)>>),
    Object(ObjRef),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(shared(items))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(shared(items))
    }

    /// A set holding `items` as given; the caller keeps them distinct.
    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(shared(items))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(shared(entries))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjRef> {
        match self {
            Value::Object(r) => Some(*r),
            _ => None,
        }
    }

    /// Snapshot of the elements of an array, list or set.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) | Value::List(items) | Value::Set(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Snapshot of the entries of a map.
    pub fn entries(&self) -> Option<Vec<(Value, Value)>> {
        match self {
            Value::Map(entries) => Some(entries.borrow().clone()),
            _ => None,
        }
    }

    /// Name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Reference identity for objects and collections, value equality for scalars.
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            _ => self.scalar_eq(other).unwrap_or(false),
        }
    }

    /// Equality of two scalars; `None` when either side is not a scalar.
    pub(crate) fn scalar_eq(&self, other: &Value) -> Option<bool> {
        let eq = match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => return None,
        };
        Some(eq)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

/// Field values of one declaring class, by name.
pub(crate) type Slots = IndexMap<String, Value>;

/// An object on the heap: its runtime class and field values.
///
/// Every class in the superclass chain keeps its own slots, so a subclass field hides an inherited field of the
/// same name instead of overwriting it.
#[derive(Debug, Clone)]
pub struct Object {
    pub(crate) class: TypeId,
    /// Slots per declaring class, superclass first.
    pub(crate) fields: IndexMap<TypeId, Slots>,
    /// Enclosing instance, for nested classes.
    pub(crate) outer: Option<ObjRef>,
}

impl Object {
    pub(crate) fn new(class: TypeId, fields: IndexMap<TypeId, Slots>, outer: Option<ObjRef>) -> Self {
        Self { class, fields, outer }
    }

    pub fn class(&self) -> &TypeId {
        &self.class
    }

    /// Field `name` as seen from the runtime class: the nearest declaration wins.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.field_from(None, name)
    }

    /// Field `name` declared by `owner`.
    pub fn declared_field(&self, owner: &TypeId, name: &str) -> Option<&Value> {
        self.fields.get(owner).and_then(|slots| slots.get(name))
    }

    /// Fields in declaration order, superclass fields first, hidden fields included.
    pub fn fields(&self) -> impl Iterator<Item = (&TypeId, &str, &Value)> {
        self.fields
            .iter()
            .flat_map(|(owner, slots)| slots.iter().map(move |(name, value)| (owner, name.as_str(), value)))
    }

    /// Index of the class whose slot `name` is visible from class `from`: `from` itself or its nearest superclass
    /// declaring it. Without `from`, or when `from` is not in this object's chain, lookup starts at the runtime
    /// class.
    fn visible_owner(&self, from: Option<&TypeId>, name: &str) -> Option<usize> {
        let top = from
            .and_then(|class| self.fields.get_index_of(class))
            .map_or(self.fields.len(), |i| i + 1);
        (0..top)
            .rev()
            .find(|&i| self.fields.get_index(i).is_some_and(|(_, slots)| slots.contains_key(name)))
    }

    pub(crate) fn field_from(&self, from: Option<&TypeId>, name: &str) -> Option<&Value> {
        let i = self.visible_owner(from, name)?;
        self.fields.get_index(i).and_then(|(_, slots)| slots.get(name))
    }

    /// Assign field `name` as seen from class `from`; an undeclared name becomes a slot of `from` (or of the
    /// runtime class when `from` is not in the chain).
    pub(crate) fn set_field_from(&mut self, from: Option<&TypeId>, name: &str, value: Value) {
        if let Some(i) = self.visible_owner(from, name) {
            if let Some((_, slots)) = self.fields.get_index_mut(i) {
                slots.insert(name.to_string(), value);
            }
            return;
        }
        let owner = from
            .filter(|class| self.fields.contains_key(*class))
            .unwrap_or(&self.class)
            .clone();
        self.fields.entry(owner).or_default().insert(name.to_string(), value);
    }
}
