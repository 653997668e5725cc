//! Structural equality.
//!
//! Objects compare through their `equals` method when their class chain declares one, and field by field when
//! it doesn't. Pairs of objects already under comparison count as equal, so cyclic graphs terminate.

use super::Interpreter;
use super::errors::{EvalError, EvalResult};
use super::value::{ObjRef, Value};

impl Interpreter {
    /// Null-safe deep equality, as used by derived `equals` bodies and by callers checking round trips.
    pub fn structurally_equal(&mut self, a: &Value, b: &Value) -> EvalResult<bool> {
        if let Some(eq) = a.scalar_eq(b) {
            return Ok(eq);
        }
        match (a, b) {
            (Value::Null, Value::Null) => Ok(true),
            (Value::Array(x), Value::Array(y)) | (Value::List(x), Value::List(y)) => {
                let (x, y) = (x.borrow().clone(), y.borrow().clone());
                self.sequences_equal(&x, &y)
            }
            (Value::Set(x), Value::Set(y)) => {
                let (x, y) = (x.borrow().clone(), y.borrow().clone());
                if x.len() != y.len() {
                    return Ok(false);
                }
                for item in &x {
                    if !self.contains(&y, item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Map(x), Value::Map(y)) => {
                let (x, y) = (x.borrow().clone(), y.borrow().clone());
                if x.len() != y.len() {
                    return Ok(false);
                }
                for (key, value) in &x {
                    let mut found = false;
                    for (other_key, other_value) in &y {
                        if self.structurally_equal(key, other_key)? {
                            found = self.structurally_equal(value, other_value)?;
                            break;
                        }
                    }
                    if !found {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Object(x), Value::Object(y)) => self.objects_equal(*x, *y),
            _ => Ok(false),
        }
    }

    fn sequences_equal(&mut self, x: &[Value], y: &[Value]) -> EvalResult<bool> {
        if x.len() != y.len() {
            return Ok(false);
        }
        for (a, b) in x.iter().zip(y) {
            if !self.structurally_equal(a, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn contains(&mut self, items: &[Value], needle: &Value) -> EvalResult<bool> {
        for item in items {
            if self.structurally_equal(item, needle)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn objects_equal(&mut self, x: ObjRef, y: ObjRef) -> EvalResult<bool> {
        if x == y {
            return Ok(true);
        }
        if !self.comparing.insert((x, y)) {
            return Ok(true);
        }
        let result = self.call(&Value::Object(x), "equals", vec![Value::Object(y)]);
        self.comparing.remove(&(x, y));
        let result = result?;
        result
            .as_bool()
            .ok_or_else(|| EvalError::mismatch("boolean", result.kind_name()))
    }

    /// Field-by-field equality of `x` and `other`, for types without an `equals` body.
    ///
    /// Classes must be compatible: one is a subtype of the other.
    pub(crate) fn fields_equal(&mut self, x: ObjRef, other: &Value) -> EvalResult<bool> {
        let Value::Object(y) = other else {
            return Ok(false);
        };
        let y = *y;
        if x == y {
            return Ok(true);
        }
        let (cx, cy) = (self.object(x).class.clone(), self.object(y).class.clone());
        if !self.is_subtype(&cx, &cy) && !self.is_subtype(&cy, &cx) {
            return Ok(false);
        }
        let mine = self.object(x).clone();
        let theirs = self.object(y).clone();
        for (owner, name, value) in mine.fields() {
            let other_value = theirs.declared_field(owner, name).cloned().unwrap_or(Value::Null);
            if !self.structurally_equal(value, &other_value)? {
                return Ok(false);
            }
        }
        for (owner, name, value) in theirs.fields() {
            if mine.declared_field(owner, name).is_none() && !value.is_null() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildsmith_model::{ClassRef, Kind, Param, Property, TypeDecl, TypeId, TypeRef, TypeRepository};

    fn node_repo() -> TypeRepository {
        let node = TypeId::new("graph", "Node");
        let mut repo = TypeRepository::new();
        repo.register(
            TypeDecl::new(node.clone(), Kind::Record)
                .with_properties([
                    Property::new("label", TypeRef::class(TypeId::new("java.lang", "String"))),
                    Property::new("next", TypeRef::class(node.clone())),
                ])
                .with_constructor_params(vec![Param::new("label", TypeRef::class(TypeId::new("java.lang", "String")))]),
        );
        repo.register(TypeDecl::new(TypeId::new("graph", "Tagged"), Kind::Record).extending(ClassRef::of(node)));
        repo
    }

    #[test]
    fn test_cyclic_objects_compare_without_diverging() {
        let mut interp = Interpreter::new(&node_repo());
        let node = TypeId::new("graph", "Node");
        let a = interp.instantiate(&node, vec![Value::str("n")]).unwrap();
        let b = interp.instantiate(&node, vec![Value::str("n")]).unwrap();
        let (ra, rb) = (a.as_object().unwrap(), b.as_object().unwrap());
        interp.heap[ra.0].set_field_from(None, "next", a.clone());
        interp.heap[rb.0].set_field_from(None, "next", b.clone());
        assert!(interp.structurally_equal(&a, &b).unwrap());

        interp.heap[rb.0].set_field_from(None, "label", Value::str("m"));
        assert!(!interp.structurally_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_collections_compare_by_content() {
        let mut interp = Interpreter::new(&TypeRepository::new());
        let one = || Value::list(vec![Value::Int(1), Value::str("a")]);
        assert!(interp.structurally_equal(&one(), &one()).unwrap());
        assert!(!interp.structurally_equal(&one(), &Value::array(vec![Value::Int(1), Value::str("a")])).unwrap());

        let s1 = Value::set(vec![Value::Int(1), Value::Int(2)]);
        let s2 = Value::set(vec![Value::Int(2), Value::Int(1)]);
        assert!(interp.structurally_equal(&s1, &s2).unwrap());

        let m1 = Value::map(vec![(Value::str("k"), Value::Int(1))]);
        let m2 = Value::map(vec![(Value::str("k"), Value::Int(2))]);
        assert!(!interp.structurally_equal(&m1, &m2).unwrap());
    }

    #[test]
    fn test_subclass_instances_compare_fieldwise() {
        let mut interp = Interpreter::new(&node_repo());
        let plain = interp
            .instantiate(&TypeId::new("graph", "Node"), vec![Value::str("n")])
            .unwrap();
        let tagged = interp.instantiate(&TypeId::new("graph", "Tagged"), vec![]).unwrap();
        interp
            .call(&tagged, "equals", vec![plain.clone()])
            .map(|v| assert!(matches!(v, Value::Bool(false))))
            .unwrap();
        let r = tagged.as_object().unwrap();
        interp.heap[r.0].set_field_from(None, "label", Value::str("n"));
        assert!(interp.structurally_equal(&tagged, &plain).unwrap());
    }
}
