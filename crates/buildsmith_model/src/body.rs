//! Method-body IR.
//!
//! A deliberately small statement/expression language: every body the derivation engine synthesizes (setters,
//! nested terminators, builder constructors, `build()`, structural `equals`) is expressible with it, and the
//! engine's interpreter executes it to check derived behavior.
//!
//! ## Notes
//! - Collection operations are [`Intrinsic`]s rather than calls, so bodies don't depend on a collection library's
//!   method names.
//! - Casts are implicit: the IR is dynamically checked when executed.

use crate::types::ClassRef;

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Stmt {
    /// Bind a new local.
    Let { name: String, value: Expr },
    Assign { place: Place, value: Expr },
    /// Evaluate for side effects.
    Eval(Expr),
    If { cond: Expr, then: Block, otherwise: Block },
    ForEach { binding: String, iterable: Expr, body: Block },
    Return(Option<Expr>),
    /// Constructor delegation: `this(...)` or `super(...)`.
    Delegate { target: Delegation, args: Vec<Expr> },
    /// Run the installed validator against a value; violations abort with a constraint failure.
    Validate(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Delegation {
    This,
    Super,
}

/// Assignment target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Place {
    Local(String),
    Field { target: Expr, name: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Expr {
    This,
    /// Instance of the enclosing class that created `this` (nested implementations only).
    Outer,
    Null,
    Bool(bool),
    Int(i64),
    Var(String),
    Field {
        target: Box<Expr>,
        name: String,
    },
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    /// Call the superclass implementation of a method on `this`.
    SuperCall {
        method: String,
        args: Vec<Expr>,
    },
    New {
        class: ClassRef,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    IsNull(Box<Expr>),
    InstanceOf {
        value: Box<Expr>,
        class: ClassRef,
    },
    Compare {
        mode: Equality,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Intrinsic {
        op: Intrinsic,
        args: Vec<Expr>,
    },
}

/// Equality flavors used by generated `equals` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Equality {
    /// Same object (`==` on references).
    Identity,
    /// Primitive value comparison.
    Value,
    /// Null-safe `equals`.
    Structural,
    /// Both operands are instances of exactly the same class.
    SameClass,
}

/// Collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Intrinsic {
    /// `()` -> empty ordered list.
    EmptyList,
    /// `()` -> empty insertion-ordered set.
    EmptySet,
    /// `()` -> empty insertion-ordered map.
    EmptyMap,
    /// `(collection, item)`.
    Add,
    /// `(collection, item)`, removes the first structurally equal element.
    Remove,
    /// `(collection)`.
    Clear,
    /// `(map, key, value)`.
    Put,
    /// `(map, other)`.
    PutAll,
    /// `(map, key)`.
    RemoveKey,
    /// `(map, other)`, removes every key of `other`.
    RemoveKeys,
    /// `(collection)` -> array.
    ToArray,
    /// `(array or collection)` -> new list.
    ToList,
    /// `(list, index)`.
    Index,
    /// `(collection of builders)` -> collection of built values, same shape.
    BuildAll,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    /// `this.name`
    pub fn this_field(name: impl Into<String>) -> Self {
        Expr::This.field(name)
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field {
            target: Box::new(self),
            name: name.into(),
        }
    }

    pub fn call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Box::new(self),
            method: method.into(),
            args,
        }
    }

    pub fn new_object(class: ClassRef, args: Vec<Expr>) -> Self {
        Expr::New { class, args }
    }

    pub fn intrinsic(op: Intrinsic, args: Vec<Expr>) -> Self {
        Expr::Intrinsic { op, args }
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull(Box::new(self))
    }

    pub fn instance_of(self, class: ClassRef) -> Self {
        Expr::InstanceOf {
            value: Box::new(self),
            class,
        }
    }

    pub fn compare(mode: Equality, lhs: Expr, rhs: Expr) -> Self {
        Expr::Compare {
            mode,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl Stmt {
    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }

    /// `this.name = value`
    pub fn assign_field(name: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            place: Place::Field {
                target: Expr::This,
                name: name.into(),
            },
            value,
        }
    }

    /// `if (cond) { then }`
    pub fn when(cond: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then: Block::new(then),
            otherwise: Block::default(),
        }
    }

    pub fn for_each(binding: impl Into<String>, iterable: Expr, body: Vec<Stmt>) -> Self {
        Stmt::ForEach {
            binding: binding.into(),
            iterable,
            body: Block::new(body),
        }
    }

    pub fn delegate(target: Delegation, args: Vec<Expr>) -> Self {
        Stmt::Delegate { target, args }
    }
}
