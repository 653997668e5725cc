#![forbid(unsafe_code)]
//! Buildsmith: builder derivation for structural type models.
//!
//! Given a repository of data type declarations, the [`derive`] engine produces, for every buildable type, a
//! fluent mutator interface, its implementation, a builder, an editable subtype and nested builders for composed
//! properties. The [`eval`] interpreter executes the derived method bodies so their behavior can be checked without
//! emitting source code.
//!
//! ## Panic Policy
//!
//! - **Library code**: fallible operations return [`DeriveResult`] / [`EvalResult`] and propagate with `?`. Malformed
//!   models are reported, never panicked on.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod derive;
pub mod eval;
pub mod outline;

pub use derive::{DerivationConfig, DeriveError, DeriveResult, DerivedFamily, Deriver};
pub use eval::{EvalError, EvalResult, Interpreter, Value};

pub use buildsmith_model as model;
