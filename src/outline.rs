//! Source-like outlines of declarations.
//!
//! One header line per declaration (`kind Name<params> extends ... implements ...`), followed by its fields,
//! constructors and methods, with nested declarations indented underneath. Method bodies are not rendered.

use buildsmith_core::vocab::collections::{self, CollectionKind};
use buildsmith_model::{Expr, Intrinsic, Kind, Method, Property, TypeDecl};

/// Outline of `decl` and everything nested in it.
pub fn outline(decl: &TypeDecl) -> String {
    let mut lines = Vec::new();
    outline_into(decl, 0, &mut lines);
    lines.join("\n")
}

fn joined<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn outline_into(decl: &TypeDecl, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    let kind = match decl.kind {
        Kind::Interface => "interface",
        _ if decl.is_abstract() => "abstract class",
        _ => "class",
    };
    let mut header = format!("{pad}{kind} {}", decl.simple_name());
    if !decl.params.is_empty() {
        header.push_str(&format!("<{}>", joined(&decl.params)));
    }
    if !decl.extends.is_empty() {
        header.push_str(&format!(" extends {}", joined(&decl.extends)));
    }
    if !decl.implements.is_empty() {
        header.push_str(&format!(" implements {}", joined(&decl.implements)));
    }
    lines.push(header);

    for property in &decl.properties {
        lines.push(format!("{pad}  field {} {}{}", property.ty, property.name, initializer(property)));
    }
    for ctor in &decl.constructors {
        lines.push(format!("{pad}  new {}", ctor.signature()));
    }
    for method in &decl.methods {
        lines.push(format!("{pad}  {} {}", method.return_type, method.signature()));
    }
    for nested in &decl.nested {
        outline_into(nested, depth + 1, lines);
    }
}

/// ` = new ArrayList<>()` for fields that start out as an empty collection.
fn initializer(property: &Property) -> String {
    let kind = match &property.initializer {
        Some(Expr::Intrinsic { op: Intrinsic::EmptyList, .. }) => CollectionKind::List,
        Some(Expr::Intrinsic { op: Intrinsic::EmptySet, .. }) => CollectionKind::Set,
        Some(Expr::Intrinsic { op: Intrinsic::EmptyMap, .. }) => CollectionKind::Map,
        _ => return String::new(),
    };
    format!(" = new {}<>()", collections::default_impl(kind))
}

/// Erased signatures of the methods of `decl`, in declaration order.
pub fn signatures(decl: &TypeDecl) -> Vec<String> {
    decl.methods.iter().map(Method::signature).collect()
}
