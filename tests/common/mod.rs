//! Shared fixtures for the integration tests.
//!
//! A small scene of source types: geometry with a polymorphic drawing, a self-referential tree, an array holder,
//! an inheritance pair with a setter-only property and a validated reading.

#![allow(dead_code)]

use buildsmith::derive::{DerivationConfig, DerivedFamily, Deriver};
use buildsmith::eval::{Interpreter, Value};
use buildsmith_core::naming;
use buildsmith_core::vocab::PrimitiveId;
use buildsmith_model::{ClassRef, Kind, Method, Param, Property, TypeDecl, TypeFlags, TypeId, TypeRef, TypeRepository};

pub const NS: &str = "demo";

pub fn id(name: &str) -> TypeId {
    TypeId::new(NS, name)
}

pub fn int() -> TypeRef {
    TypeRef::primitive(PrimitiveId::Int)
}

pub fn double() -> TypeRef {
    TypeRef::primitive(PrimitiveId::Double)
}

pub fn string() -> TypeRef {
    TypeRef::class(TypeId::new("java.lang", "String"))
}

pub fn list_of(element: TypeRef) -> TypeRef {
    TypeRef::class_with(TypeId::new("java.util", "List"), vec![element])
}

pub fn class(name: &str) -> TypeRef {
    TypeRef::class(id(name))
}

/// A record whose canonical constructor takes every field, with one `getX` per field.
pub fn record(name: &str, fields: &[(&str, TypeRef)]) -> TypeDecl {
    let mut decl = TypeDecl::new(id(name), Kind::Record).with_constructor_params(
        fields
            .iter()
            .map(|(field, ty)| Param::new(*field, ty.clone()))
            .collect(),
    );
    for (field, ty) in fields {
        decl = decl
            .with_property(Property::new(*field, ty.clone()))
            .with_method(Method::new(naming::getter(field, false), ty.clone()));
    }
    decl
}

pub fn point() -> TypeDecl {
    record("Point", &[("x", int()), ("y", int())])
}

pub fn shape() -> TypeDecl {
    TypeDecl::new(id("Shape"), Kind::Record)
        .into_abstract()
        .with_constructor_params(vec![])
}

pub fn circle() -> TypeDecl {
    record("Circle", &[("radius", double()), ("center", class("Point"))]).extending(ClassRef::of(id("Shape")))
}

pub fn square() -> TypeDecl {
    record("Square", &[("side", double())]).extending(ClassRef::of(id("Shape")))
}

pub fn drawing() -> TypeDecl {
    record("Drawing", &[("title", string()), ("shapes", list_of(class("Shape")))])
}

pub fn node() -> TypeDecl {
    record("Node", &[("label", string()), ("children", list_of(class("Node")))])
}

pub fn tagged() -> TypeDecl {
    record("Tagged", &[("tags", string().array_of())])
}

/// `Cat(name)` with `lives` reachable only through `setLives`.
pub fn cat() -> TypeDecl {
    record("Cat", &[("name", string())])
        .with_property(Property::new("lives", int()))
        .with_method(Method::new("getLives", int()))
        .with_method(Method::new("setLives", TypeRef::Void).with_param(Param::new("lives", int())))
}

pub fn lion() -> TypeDecl {
    TypeDecl::new(id("Lion"), Kind::Record)
        .extending(ClassRef::of(id("Cat")))
        .with_property(Property::new("mane", string()))
        .with_constructor_params(vec![Param::new("name", string()), Param::new("mane", string())])
        .with_method(Method::new("getMane", string()))
}

pub fn temperature() -> TypeDecl {
    record("Temperature", &[("celsius", double())]).with_flags(TypeFlags {
        generated: false,
        validation_enabled: true,
    })
}

/// Every fixture, registered as buildable in dependency order.
pub fn scene_repo() -> TypeRepository {
    let mut repo = TypeRepository::new();
    repo.register_buildables([
        point(),
        shape(),
        circle(),
        square(),
        drawing(),
        node(),
        tagged(),
        cat(),
        lion(),
        temperature(),
    ]);
    repo
}

/// The scene, fully derived and loaded into an interpreter.
pub struct Scene {
    pub interp: Interpreter,
    pub families: Vec<DerivedFamily>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(DerivationConfig::default())
    }

    pub fn with_config(config: DerivationConfig) -> Self {
        Self::derive(scene_repo(), config)
    }

    /// A scene of just `buildables`, registered in order.
    pub fn of(buildables: impl IntoIterator<Item = TypeDecl>) -> Self {
        let mut repo = TypeRepository::new();
        repo.register_buildables(buildables);
        Self::derive(repo, DerivationConfig::default())
    }

    fn derive(mut repo: TypeRepository, config: DerivationConfig) -> Self {
        let families = Deriver::new(&mut repo, config.clone())
            .derive_buildables()
            .expect("scene derives");
        let mut interp = Interpreter::with_config(&repo, &config);
        interp.load_families(&families);
        Self { interp, families }
    }

    pub fn family(&self, name: &str) -> &DerivedFamily {
        self.families
            .iter()
            .find(|f| f.source.id == id(name))
            .unwrap_or_else(|| panic!("no family for {name}"))
    }

    /// `new Name(args...)` of a source type.
    pub fn source(&mut self, name: &str, args: Vec<Value>) -> Value {
        self.interp.instantiate(&id(name), args).expect("source instance")
    }

    /// `new NameBuilder(args...)`.
    pub fn builder(&mut self, name: &str, args: Vec<Value>) -> Value {
        let builder = self.family(name).builder.id.clone();
        self.interp.instantiate(&builder, args).expect("builder instance")
    }

    /// `receiver.method(args...)`, panicking on interpreter errors.
    pub fn call(&mut self, receiver: &Value, method: &str, args: Vec<Value>) -> Value {
        self.interp
            .call(receiver, method, args)
            .unwrap_or_else(|e| panic!("{method}: {e}"))
    }

    pub fn equal(&mut self, a: &Value, b: &Value) -> bool {
        self.interp.structurally_equal(a, b).expect("comparison")
    }

    pub fn point(&mut self, x: i64, y: i64) -> Value {
        self.source("Point", vec![Value::Int(x), Value::Int(y)])
    }
}
