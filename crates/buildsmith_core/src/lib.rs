//! Shared naming conventions and type vocabulary for the buildsmith derivation engine.
//!
//! This crate is intentionally small and dependency-free. It holds the deterministic, string-level rules that both
//! the type model and the derivation engine agree on:
//! - how derived names are spelled (`withNewCenterLike`, `CircleFluentImpl`, `EditableCircle`),
//! - which letter a fresh generic parameter receives,
//! - which type names denote primitives, collections and library roots.
//!
//! ## Notes
//!
//! - No IO, no global state, and no model types: callers pass plain `&str` and get plain `String`s back.
//! - Vocabulary lives in registry tables under [`vocab`]; callers work with stable ids and look spellings up.

#![forbid(unsafe_code)]

pub mod naming;
pub mod vocab;

pub use naming::{capitalize, decapitalize, next_generic, singularize};
