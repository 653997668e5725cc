//! Class hierarchy queries and dynamic overload resolution.
//!
//! ## Notes
//! - The superclass chain follows the first `extends` entry of records; interfaces contribute to instance checks
//!   only.
//! - Overloads are tried in declaration order, nearest class first; the first applicable one wins.
//! - A varargs parameter accepts either a single array (or null) passed directly, or any number of elements that
//!   get packed into a fresh array.

use std::collections::HashSet;
use std::sync::Arc;

use buildsmith_core::naming::{self, AccessorKind};
use buildsmith_core::vocab::collections::{self, CollectionKind};
use buildsmith_core::vocab::primitives::{self, OBJECT_NAME, PrimitiveId, STRING_NAME};
use buildsmith_model::{ClassRef, Param, TypeDecl, TypeId, TypeRef};

use super::Interpreter;
use super::errors::{EvalError, EvalResult};
use super::value::{ObjRef, Value};

/// What a call resolved to.
pub(crate) enum Resolved {
    /// A method with a body, declared on `owner`.
    Body { owner: Arc<TypeDecl>, index: usize },
    /// A body-less accessor of a source type, served from the fields visible to `owner`.
    Accessor {
        kind: AccessorKind,
        owner: TypeId,
        field: String,
    },
}

fn primitive_accepts(primitive: PrimitiveId, value: &Value) -> bool {
    match value {
        Value::Bool(_) => primitive == PrimitiveId::Boolean,
        Value::Int(_) => primitive.is_integral() || primitive.is_floating(),
        Value::Float(_) => primitive.is_floating(),
        Value::Char(_) => primitive == PrimitiveId::Char,
        _ => false,
    }
}

/// Default value of a field of type `ty` before any initializer runs.
pub(crate) fn default_value(ty: &TypeRef) -> Value {
    match ty {
        TypeRef::Primitive(p) if p.dimensions == 0 => match p.primitive {
            PrimitiveId::Boolean => Value::Bool(false),
            PrimitiveId::Char => Value::Char('\0'),
            PrimitiveId::Float | PrimitiveId::Double => Value::Float(0.0),
            _ => Value::Int(0),
        },
        _ => Value::Null,
    }
}

/// Widen integers bound to floating point slots.
fn coerce(ty: &TypeRef, value: Value) -> Value {
    let floating = match ty {
        TypeRef::Primitive(p) => p.dimensions == 0 && p.primitive.is_floating(),
        _ => false,
    };
    match value {
        Value::Int(i) if floating => Value::Float(i as f64),
        other => other,
    }
}

impl Interpreter {
    pub(crate) fn class(&self, id: &TypeId) -> EvalResult<Arc<TypeDecl>> {
        self.classes
            .get(id)
            .cloned()
            .ok_or_else(|| EvalError::UnknownClass(id.clone()))
    }

    pub(crate) fn superclass_id(&self, id: &TypeId) -> Option<TypeId> {
        let decl = self.classes.get(id)?;
        if decl.is_interface() {
            return None;
        }
        decl.superclass().map(|s| s.id.clone())
    }

    /// `id` and its loaded superclasses, nearest first.
    pub(crate) fn chain(&self, id: &TypeId) -> Vec<Arc<TypeDecl>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(id.clone());
        while let Some(current) = next {
            if !seen.insert(current.clone()) {
                break;
            }
            let Some(decl) = self.classes.get(&current) else { break };
            next = self.superclass_id(&current);
            out.push(Arc::clone(decl));
        }
        out
    }

    /// Whether class `candidate` is `target` or one of its subtypes.
    pub(crate) fn is_subtype(&self, candidate: &TypeId, target: &TypeId) -> bool {
        let mut seen: HashSet<&TypeId> = HashSet::new();
        let mut stack = vec![candidate];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(decl) = self.classes.get(current) {
                stack.extend(decl.supertypes().map(|s| &s.id));
            }
        }
        false
    }

    pub(crate) fn is_instance(&self, obj: ObjRef, target: &TypeId) -> bool {
        self.is_subtype(&self.object(obj).class, target)
    }

    fn class_accepts(&self, class: &ClassRef, value: &Value) -> bool {
        let id = &class.id;
        let name = id.simple_name();
        if id.namespace == self.lang_namespace {
            if name == OBJECT_NAME {
                return true;
            }
            if name == STRING_NAME {
                return matches!(value, Value::Str(_));
            }
            if let Some(primitive) = primitives::from_boxed(name) {
                return primitive_accepts(primitive, value);
            }
        }
        if id.namespace == self.collection_namespace {
            if let Some(kind) = collections::from_str(name) {
                return matches!(
                    (kind, value),
                    (CollectionKind::List, Value::List(_))
                        | (CollectionKind::Set, Value::Set(_))
                        | (CollectionKind::Map, Value::Map(_))
                );
            }
        }
        match value {
            Value::Object(obj) => self.is_instance(*obj, id),
            _ => false,
        }
    }

    /// Whether `value` may be bound to a slot of type `ty`.
    pub(crate) fn accepts(&self, ty: &TypeRef, value: &Value) -> bool {
        if ty.dimensions() > 0 {
            return matches!(value, Value::Null | Value::Array(_));
        }
        match ty {
            TypeRef::Primitive(p) => primitive_accepts(p.primitive, value),
            TypeRef::Param(_) | TypeRef::Wildcard(_) => true,
            TypeRef::Void => false,
            TypeRef::Class(class) => value.is_null() || self.class_accepts(class, value),
        }
    }

    /// `instanceof`: never true for null.
    pub(crate) fn instance_of(&self, value: &Value, class: &ClassRef) -> bool {
        !value.is_null() && self.accepts(&TypeRef::Class(class.clone()), value)
    }

    fn fixed_accept(&self, params: &[Param], args: &[Value]) -> bool {
        params.iter().zip(args).all(|(p, a)| self.accepts(&p.ty, a))
    }

    /// Whether an argument list passes the array for the varargs parameter directly.
    fn passes_array_directly(params: &[Param], args: &[Value]) -> bool {
        args.len() == params.len() && matches!(args.last(), Some(Value::Array(_) | Value::Null))
    }

    pub(crate) fn applicable(&self, params: &[Param], args: &[Value]) -> bool {
        match params.split_last() {
            Some((last, fixed)) if last.varargs => {
                if !self.fixed_accept(fixed, args) {
                    return false;
                }
                if Self::passes_array_directly(params, args) {
                    return true;
                }
                args.len() >= fixed.len() && args[fixed.len()..].iter().all(|a| self.accepts(&last.ty, a))
            }
            _ => args.len() == params.len() && self.fixed_accept(params, args),
        }
    }

    /// Bind arguments to parameter names, packing trailing varargs into an array.
    pub(crate) fn bind(&self, params: &[Param], mut args: Vec<Value>) -> Vec<(String, Value)> {
        if let Some(last) = params.last().filter(|p| p.varargs) {
            if !Self::passes_array_directly(params, &args) {
                let at = (params.len() - 1).min(args.len());
                let rest = args
                    .split_off(at)
                    .into_iter()
                    .map(|a| coerce(&last.ty, a))
                    .collect();
                args.push(Value::array(rest));
            }
        }
        params
            .iter()
            .zip(args)
            .map(|(p, a)| {
                let value = if p.varargs { a } else { coerce(&p.ty, a) };
                (p.name.clone(), value)
            })
            .collect()
    }

    /// Find the method a call of `name` with `args` runs, starting the lookup at class `start`.
    pub(crate) fn resolve_method(&self, start: &TypeId, name: &str, args: &[Value]) -> Option<Resolved> {
        for decl in self.chain(start) {
            for (index, method) in decl.methods.iter().enumerate() {
                if method.name != name || !self.applicable(&method.params, args) {
                    continue;
                }
                if method.body.is_some() {
                    return Some(Resolved::Body { owner: decl, index });
                }
                if decl.flags.generated {
                    continue;
                }
                match naming::accessor_property(name) {
                    Some((kind @ AccessorKind::Getter, field)) if args.is_empty() => {
                        let owner = decl.id.clone();
                        return Some(Resolved::Accessor { kind, owner, field });
                    }
                    Some((kind @ AccessorKind::Setter, field)) if args.len() == 1 => {
                        let owner = decl.id.clone();
                        return Some(Resolved::Accessor { kind, owner, field });
                    }
                    _ => {}
                }
            }
        }
        None
    }
}
