//! Statement and expression execution.

use std::collections::HashMap;
use std::sync::Arc;

use buildsmith_core::naming::{self, AccessorKind};
use buildsmith_model::{Block, Delegation, Equality, Expr, Intrinsic, Place, Stmt, TypeDecl, TypeId};

use super::dispatch::{Resolved, default_value};
use super::errors::{EvalError, EvalResult};
use super::value::{ObjRef, Object, Slots, Value};
use super::{Interpreter, MAX_CALL_DEPTH};

/// Activation of one method or constructor body.
struct Frame {
    this: Option<ObjRef>,
    /// Class declaring the running body; `super` resolves against it.
    class: TypeId,
    locals: HashMap<String, Value>,
}

impl Frame {
    fn new(this: Option<ObjRef>, class: TypeId, locals: Vec<(String, Value)>) -> Self {
        Self {
            this,
            class,
            locals: locals.into_iter().collect(),
        }
    }

    fn this(&self) -> EvalResult<ObjRef> {
        self.this.ok_or_else(|| EvalError::UndefinedVariable("this".to_string()))
    }
}

enum Flow {
    Next,
    Return(Value),
}

/// Split `args` into exactly `N` operands of `op`.
fn operands<const N: usize>(op: Intrinsic, args: Vec<Value>) -> EvalResult<[Value; N]> {
    let found = args.len();
    <[Value; N]>::try_from(args)
        .map_err(|_| EvalError::mismatch(format!("{N} operand(s) for {op:?}"), format!("{found} operand(s)")))
}

impl Interpreter {
    /// Allocate an instance of `class`, run field initializers, then the matching constructor.
    pub(crate) fn new_object(&mut self, class: &TypeId, args: Vec<Value>, outer: Option<ObjRef>) -> EvalResult<ObjRef> {
        let decl = self.class(class)?;
        if decl.is_abstract() {
            return Err(EvalError::AbstractInstantiation(class.clone()));
        }
        let chain = self.chain(class);
        let fields = chain
            .iter()
            .rev()
            .map(|d| {
                let slots: Slots = d
                    .properties
                    .iter()
                    .filter(|p| !p.is_static())
                    .map(|p| (p.name.clone(), default_value(&p.ty)))
                    .collect();
                (d.id.clone(), slots)
            })
            .collect();
        let obj = ObjRef(self.heap.len());
        self.heap
            .push(Object::new(class.clone(), fields, decl.enclosing.as_ref().and(outer)));
        tracing::trace!(class = %class, "instantiated");

        for d in chain.iter().rev() {
            let mut frame = Frame::new(Some(obj), d.id.clone(), Vec::new());
            for p in d.properties.iter().filter(|p| !p.is_static()) {
                if let Some(init) = &p.initializer {
                    let value = self.eval(&mut frame, init)?;
                    self.heap[obj.0].set_field_from(Some(&d.id), &p.name, value);
                }
            }
        }
        self.construct(&decl, obj, args)?;
        Ok(obj)
    }

    /// Run the constructor of `decl` that accepts `args` on the already allocated `obj`.
    fn construct(&mut self, decl: &Arc<TypeDecl>, obj: ObjRef, args: Vec<Value>) -> EvalResult<()> {
        let no_ctor = || EvalError::NoSuchConstructor {
            class: decl.id.clone(),
            arity: args.len(),
        };
        if decl.constructors.is_empty() {
            return if args.is_empty() {
                self.construct_super(decl, obj)
            } else {
                Err(no_ctor())
            };
        }
        let ctor = decl
            .constructors
            .iter()
            .find(|c| self.applicable(&c.params, &args))
            .ok_or_else(no_ctor)?;
        let bound = self.bind(&ctor.params, args);

        let Some(body) = &ctor.body else {
            // Source constructor: fields named after the parameters.
            let object = &mut self.heap[obj.0];
            for (name, value) in bound {
                object.set_field_from(Some(&decl.id), &name, value);
            }
            return Ok(());
        };
        if !matches!(body.stmts.first(), Some(Stmt::Delegate { .. })) {
            self.construct_super(decl, obj)?;
        }
        self.run(Frame::new(Some(obj), decl.id.clone(), bound), body).map(drop)
    }

    /// Implicit `super()`: skipped when the superclass is not loaded or has no no-argument constructor.
    fn construct_super(&mut self, decl: &TypeDecl, obj: ObjRef) -> EvalResult<()> {
        let Some(sup) = self.superclass_id(&decl.id) else {
            return Ok(());
        };
        let Some(sup) = self.classes.get(&sup).cloned() else {
            return Ok(());
        };
        let has_default = sup.constructors.is_empty() || sup.constructors.iter().any(|c| self.applicable(&c.params, &[]));
        if has_default {
            self.construct(&sup, obj, Vec::new())
        } else {
            Ok(())
        }
    }

    /// Call `name` on `receiver`, looking the method up from class `start`.
    pub(crate) fn invoke(&mut self, receiver: ObjRef, start: &TypeId, name: &str, args: Vec<Value>) -> EvalResult<Value> {
        match self.resolve_method(start, name, &args) {
            Some(Resolved::Body { owner, index }) => {
                let method = &owner.methods[index];
                let bound = self.bind(&method.params, args);
                match &method.body {
                    Some(body) => self.run(Frame::new(Some(receiver), owner.id.clone(), bound), body),
                    None => Ok(Value::Null),
                }
            }
            Some(Resolved::Accessor { kind, owner, field }) => match kind {
                AccessorKind::Getter => self.read_field(&Value::Object(receiver), Some(&owner), &field),
                AccessorKind::Setter => {
                    let value = args.into_iter().next().unwrap_or(Value::Null);
                    self.heap[receiver.0].set_field_from(Some(&owner), &field, value);
                    Ok(Value::Null)
                }
            },
            None if name == naming::EQUALS_METHOD && args.len() == 1 => {
                let equal = self.fields_equal(receiver, &args[0])?;
                Ok(Value::Bool(equal))
            }
            None => Err(EvalError::NoSuchMethod {
                class: self.object(receiver).class.clone(),
                method: name.to_string(),
                arity: args.len(),
            }),
        }
    }

    fn run(&mut self, mut frame: Frame, body: &Block) -> EvalResult<Value> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(EvalError::CallDepthExceeded(MAX_CALL_DEPTH));
        }
        self.depth += 1;
        let flow = self.exec_block(&mut frame, body);
        self.depth -= 1;
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(Value::Null),
        }
    }

    /// Read field `name` of `target` as seen from class `from` (the runtime class when `None`).
    pub(crate) fn read_field(&self, target: &Value, from: Option<&TypeId>, name: &str) -> EvalResult<Value> {
        match target {
            Value::Object(obj) => {
                let object = self.object(*obj);
                object.field_from(from, name).cloned().ok_or_else(|| EvalError::NoSuchField {
                    class: object.class.clone(),
                    field: name.to_string(),
                })
            }
            Value::Null => Err(EvalError::NullReceiver(name.to_string())),
            other => Err(EvalError::mismatch("object", other.kind_name())),
        }
    }

    fn write_field(&mut self, target: &Value, from: &TypeId, name: &str, value: Value) -> EvalResult<()> {
        match target {
            Value::Object(obj) => {
                self.heap[obj.0].set_field_from(Some(from), name, value);
                Ok(())
            }
            Value::Null => Err(EvalError::NullReceiver(name.to_string())),
            other => Err(EvalError::mismatch("object", other.kind_name())),
        }
    }

    fn exec_block(&mut self, frame: &mut Frame, block: &Block) -> EvalResult<Flow> {
        for stmt in &block.stmts {
            if let Flow::Return(value) = self.exec(frame, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn exec(&mut self, frame: &mut Frame, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Let { name, value } => {
                let value = self.eval(frame, value)?;
                frame.locals.insert(name.clone(), value);
            }
            Stmt::Assign { place, value } => {
                let value = self.eval(frame, value)?;
                match place {
                    Place::Local(name) => {
                        frame.locals.insert(name.clone(), value);
                    }
                    Place::Field { target, name } => {
                        let target = self.eval(frame, target)?;
                        self.write_field(&target, &frame.class, name, value)?;
                    }
                }
            }
            Stmt::Eval(expr) => {
                self.eval(frame, expr)?;
            }
            Stmt::If { cond, then, otherwise } => {
                let branch = if self.truthy(frame, cond)? { then } else { otherwise };
                return self.exec_block(frame, branch);
            }
            Stmt::ForEach { binding, iterable, body } => {
                let iterable = self.eval(frame, iterable)?;
                let items = match &iterable {
                    Value::Null => return Err(EvalError::NullReceiver("for".to_string())),
                    Value::Map(_) => iterable
                        .entries()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(k, _)| k)
                        .collect(),
                    other => other
                        .elements()
                        .ok_or_else(|| EvalError::mismatch("iterable", other.kind_name()))?,
                };
                for item in items {
                    frame.locals.insert(binding.clone(), item);
                    if let Flow::Return(value) = self.exec_block(frame, body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(frame, expr)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Delegate { target, args } => {
                let args = self.eval_all(frame, args)?;
                let this = frame.this()?;
                let decl = match target {
                    Delegation::This => self.class(&frame.class)?,
                    Delegation::Super => {
                        let sup = self
                            .superclass_id(&frame.class)
                            .ok_or_else(|| EvalError::UnknownClass(frame.class.clone()))?;
                        self.class(&sup)?
                    }
                };
                self.construct(&decl, this, args)?;
            }
            Stmt::Validate(expr) => {
                let value = self.eval(frame, expr)?;
                self.validate(&value)?;
            }
        }
        Ok(Flow::Next)
    }

    fn validate(&self, value: &Value) -> EvalResult<()> {
        let (Some(validator), Some(obj)) = (&self.validator, value.as_object()) else {
            return Ok(());
        };
        let object = self.object(obj);
        let violations = validator.validate(object);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(EvalError::ConstraintViolation {
                class: object.class.clone(),
                violations,
            })
        }
    }

    fn eval_all(&mut self, frame: &mut Frame, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval(frame, e)).collect()
    }

    fn truthy(&mut self, frame: &mut Frame, expr: &Expr) -> EvalResult<bool> {
        let value = self.eval(frame, expr)?;
        value
            .as_bool()
            .ok_or_else(|| EvalError::mismatch("boolean", value.kind_name()))
    }

    fn eval(&mut self, frame: &mut Frame, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::This => frame.this().map(Value::Object),
            Expr::Outer => {
                let this = frame.this()?;
                self.object(this)
                    .outer
                    .map(Value::Object)
                    .ok_or_else(|| EvalError::UndefinedVariable("outer".to_string()))
            }
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Var(name) => frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Field { target, name } => {
                let target = self.eval(frame, target)?;
                self.read_field(&target, Some(&frame.class), name)
            }
            Expr::Call { target, method, args } => {
                let target = self.eval(frame, target)?;
                let args = self.eval_all(frame, args)?;
                self.call(&target, method, args)
            }
            Expr::SuperCall { method, args } => {
                let this = frame.this()?;
                let args = self.eval_all(frame, args)?;
                let Some(sup) = self.superclass_id(&frame.class) else {
                    return Err(EvalError::NoSuchMethod {
                        class: frame.class.clone(),
                        method: method.clone(),
                        arity: args.len(),
                    });
                };
                self.invoke(this, &sup, method, args)
            }
            Expr::New { class, args } => {
                let args = self.eval_all(frame, args)?;
                self.new_object(&class.id, args, frame.this).map(Value::Object)
            }
            Expr::Not(inner) => Ok(Value::Bool(!self.truthy(frame, inner)?)),
            Expr::And(lhs, rhs) => Ok(Value::Bool(self.truthy(frame, lhs)? && self.truthy(frame, rhs)?)),
            Expr::Or(lhs, rhs) => Ok(Value::Bool(self.truthy(frame, lhs)? || self.truthy(frame, rhs)?)),
            Expr::IsNull(inner) => Ok(Value::Bool(self.eval(frame, inner)?.is_null())),
            Expr::InstanceOf { value, class } => {
                let value = self.eval(frame, value)?;
                Ok(Value::Bool(self.instance_of(&value, class)))
            }
            Expr::Compare { mode, lhs, rhs } => {
                let lhs = self.eval(frame, lhs)?;
                let rhs = self.eval(frame, rhs)?;
                self.compare(*mode, &lhs, &rhs).map(Value::Bool)
            }
            Expr::Intrinsic { op, args } => {
                let args = self.eval_all(frame, args)?;
                self.intrinsic(*op, args)
            }
        }
    }

    fn compare(&mut self, mode: Equality, lhs: &Value, rhs: &Value) -> EvalResult<bool> {
        match mode {
            Equality::Identity => Ok(lhs.same_reference(rhs)),
            Equality::Value => Ok(lhs.scalar_eq(rhs).unwrap_or_else(|| lhs.same_reference(rhs))),
            Equality::Structural => self.structurally_equal(lhs, rhs),
            Equality::SameClass => Ok(match (lhs, rhs) {
                (Value::Object(a), Value::Object(b)) => self.object(*a).class == self.object(*b).class,
                _ => false,
            }),
        }
    }

    /// Position of the first element structurally equal to `needle`.
    fn position(&mut self, haystack: &[Value], needle: &Value) -> EvalResult<Option<usize>> {
        for (i, candidate) in haystack.iter().enumerate() {
            if self.structurally_equal(candidate, needle)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    fn key_position(&mut self, entries: &[(Value, Value)], key: &Value) -> EvalResult<Option<usize>> {
        for (i, (candidate, _)) in entries.iter().enumerate() {
            if self.structurally_equal(candidate, key)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    fn put(&mut self, map: &Value, key: Value, value: Value) -> EvalResult<()> {
        let Value::Map(entries) = map else {
            return Err(EvalError::mismatch("map", map.kind_name()));
        };
        let snapshot = entries.borrow().clone();
        match self.key_position(&snapshot, &key)? {
            Some(i) => entries.borrow_mut()[i].1 = value,
            None => entries.borrow_mut().push((key, value)),
        }
        Ok(())
    }

    fn remove_key(&mut self, map: &Value, key: &Value) -> EvalResult<()> {
        let Value::Map(entries) = map else {
            return Err(EvalError::mismatch("map", map.kind_name()));
        };
        let snapshot = entries.borrow().clone();
        if let Some(i) = self.key_position(&snapshot, key)? {
            entries.borrow_mut().remove(i);
        }
        Ok(())
    }

    fn map_entries(value: &Value, op: &str) -> EvalResult<Vec<(Value, Value)>> {
        match value {
            Value::Null => Err(EvalError::NullReceiver(op.to_string())),
            other => other.entries().ok_or_else(|| EvalError::mismatch("map", other.kind_name())),
        }
    }

    fn collection_elements(value: &Value, op: &str) -> EvalResult<Vec<Value>> {
        match value {
            Value::Null => Err(EvalError::NullReceiver(op.to_string())),
            other => other
                .elements()
                .ok_or_else(|| EvalError::mismatch("array or collection", other.kind_name())),
        }
    }

    fn intrinsic(&mut self, op: Intrinsic, args: Vec<Value>) -> EvalResult<Value> {
        match op {
            Intrinsic::EmptyList => Ok(Value::list(Vec::new())),
            Intrinsic::EmptySet => Ok(Value::set(Vec::new())),
            Intrinsic::EmptyMap => Ok(Value::map(Vec::new())),
            Intrinsic::Add => {
                let [collection, item] = operands(op, args)?;
                match &collection {
                    Value::List(items) => items.borrow_mut().push(item),
                    Value::Set(items) => {
                        let snapshot = items.borrow().clone();
                        if self.position(&snapshot, &item)?.is_none() {
                            items.borrow_mut().push(item);
                        }
                    }
                    Value::Null => return Err(EvalError::NullReceiver("add".to_string())),
                    other => return Err(EvalError::mismatch("list or set", other.kind_name())),
                }
                Ok(Value::Null)
            }
            Intrinsic::Remove => {
                let [collection, item] = operands(op, args)?;
                match &collection {
                    Value::List(items) | Value::Set(items) => {
                        let snapshot = items.borrow().clone();
                        if let Some(i) = self.position(&snapshot, &item)? {
                            items.borrow_mut().remove(i);
                        }
                    }
                    Value::Null => return Err(EvalError::NullReceiver("remove".to_string())),
                    other => return Err(EvalError::mismatch("list or set", other.kind_name())),
                }
                Ok(Value::Null)
            }
            Intrinsic::Clear => {
                let [collection] = operands(op, args)?;
                match &collection {
                    Value::List(items) | Value::Set(items) | Value::Array(items) => items.borrow_mut().clear(),
                    Value::Map(entries) => entries.borrow_mut().clear(),
                    Value::Null => return Err(EvalError::NullReceiver("clear".to_string())),
                    other => return Err(EvalError::mismatch("collection", other.kind_name())),
                }
                Ok(Value::Null)
            }
            Intrinsic::Put => {
                let [map, key, value] = operands(op, args)?;
                self.put(&map, key, value)?;
                Ok(Value::Null)
            }
            Intrinsic::PutAll => {
                let [map, other] = operands(op, args)?;
                for (key, value) in Self::map_entries(&other, "putAll")? {
                    self.put(&map, key, value)?;
                }
                Ok(Value::Null)
            }
            Intrinsic::RemoveKey => {
                let [map, key] = operands(op, args)?;
                self.remove_key(&map, &key)?;
                Ok(Value::Null)
            }
            Intrinsic::RemoveKeys => {
                let [map, other] = operands(op, args)?;
                for (key, _) in Self::map_entries(&other, "removeAll")? {
                    self.remove_key(&map, &key)?;
                }
                Ok(Value::Null)
            }
            Intrinsic::ToArray => {
                let [collection] = operands(op, args)?;
                Ok(Value::array(Self::collection_elements(&collection, "toArray")?))
            }
            Intrinsic::ToList => {
                let [collection] = operands(op, args)?;
                Ok(Value::list(Self::collection_elements(&collection, "toList")?))
            }
            Intrinsic::Index => {
                let [collection, index] = operands(op, args)?;
                let items = Self::collection_elements(&collection, "get")?;
                let Value::Int(i) = index else {
                    return Err(EvalError::mismatch("integer", index.kind_name()));
                };
                usize::try_from(i)
                    .ok()
                    .and_then(|at| items.get(at).cloned())
                    .ok_or(EvalError::IndexOutOfBounds { index: i, len: items.len() })
            }
            Intrinsic::BuildAll => {
                let [collection] = operands(op, args)?;
                let builders = Self::collection_elements(&collection, "build")?;
                let mut built = Vec::with_capacity(builders.len());
                for builder in builders {
                    built.push(match builder {
                        Value::Null => Value::Null,
                        other => self.call(&other, naming::BUILD_METHOD, Vec::new())?,
                    });
                }
                Ok(match collection {
                    Value::Set(_) => Value::set(built),
                    Value::Array(_) => Value::array(built),
                    _ => Value::list(built),
                })
            }
        }
    }
}
