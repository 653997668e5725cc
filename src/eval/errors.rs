//! Interpreter failures.

use buildsmith_model::TypeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown class `{0}`")]
    UnknownClass(TypeId),

    #[error("cannot instantiate abstract class `{0}`")]
    AbstractInstantiation(TypeId),

    #[error("no method `{method}` of `{class}` accepts {arity} argument(s)")]
    NoSuchMethod { class: TypeId, method: String, arity: usize },

    #[error("no constructor of `{class}` accepts {arity} argument(s)")]
    NoSuchConstructor { class: TypeId, arity: usize },

    #[error("no field `{field}` on `{class}`")]
    NoSuchField { class: TypeId, field: String },

    #[error("`{0}` is not defined here")]
    UndefinedVariable(String),

    #[error("null receiver for `{0}`")]
    NullReceiver(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("constraint violation on `{class}`: {}", violations.join("; "))]
    ConstraintViolation { class: TypeId, violations: Vec<String> },

    #[error("call depth exceeded {0} frames")]
    CallDepthExceeded(usize),
}

impl EvalError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
