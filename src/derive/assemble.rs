//! Assembly of the derived declarations.
//!
//! Every public `derive_*` operation goes through [`Deriver::memoized`]: a memo lookup, the buildability
//! precondition, then the builder function with the `(function, type)` pair marked in flight so inheritance cycles
//! terminate.

use std::collections::HashSet;
use std::sync::Arc;

use buildsmith_core::naming;
use buildsmith_core::vocab::{LibraryRootId, PrimitiveId};
use buildsmith_model::{
    Block, ClassRef, Delegation, Equality, Expr, Method, Modifiers, Param, Property, Stmt, TypeDecl, TypeParam,
    TypeRef,
};

use super::Deriver;
use super::errors::{DeriveError, DeriveResult};
use super::memo::DeriveFn;
use super::methods::{FieldEquality, PropertyPlan};
use super::roots::root_id;
use super::shapes::{is_boolean, object_ref};
use super::support;
use super::types::PropertyContext;

const OTHER: &str = "o";
const THAT: &str = "that";
const ITEM: &str = "item";

fn boolean() -> TypeRef {
    TypeRef::primitive(PrimitiveId::Boolean)
}

/// Drop methods whose erased signature was already emitted; first wins.
fn dedupe(methods: impl IntoIterator<Item = Method>) -> Vec<Method> {
    let mut seen = HashSet::new();
    methods.into_iter().filter(|m| seen.insert(m.signature())).collect()
}

fn constructor(decl: &TypeDecl, params: Vec<Param>, body: Vec<Stmt>) -> Method {
    Method::new(decl.simple_name(), TypeRef::Void)
        .with_params(params)
        .with_body(Block::new(body))
}

fn forward(params: &[Param]) -> Vec<Expr> {
    params.iter().map(|p| Expr::var(p.name.clone())).collect()
}

fn return_false_when(cond: Expr) -> Stmt {
    Stmt::when(cond, vec![Stmt::ret(Expr::Bool(false))])
}

impl<'r> Deriver<'r> {
    /// Memo lookup, buildability check, then `build` with the pair marked in flight.
    fn memoized(
        &mut self,
        func: DeriveFn,
        decl: &TypeDecl,
        build: impl FnOnce(&mut Self, &TypeDecl) -> DeriveResult<Arc<TypeDecl>>,
    ) -> DeriveResult<Arc<TypeDecl>> {
        if let Some(hit) = self.memo.get(func, &decl.id) {
            return Ok(hit);
        }
        support::ensure_buildable(self.repo, decl)?;

        self.memo.begin(func, decl.id.clone());
        let built = build(self, decl);
        self.memo.finish(func, &decl.id);
        let derived = built?;

        tracing::debug!(?func, derived = %derived.id, "derived declaration");
        self.memo.insert(func, decl.id.clone(), Arc::clone(&derived));
        Ok(derived)
    }

    /// Derive the superclass counterpart first, unless it is already being derived further up the stack.
    fn derive_superclass(&mut self, func: DeriveFn, decl: &TypeDecl) -> DeriveResult<()> {
        let Some((_, sup)) = support::buildable_superclass(self.repo, decl) else {
            return Ok(());
        };
        if self.memo.is_in_flight(func, &sup.id) {
            return Ok(());
        }
        match func {
            DeriveFn::FluentInterface => self.derive_fluent_interface(&sup).map(drop),
            DeriveFn::FluentImpl => self.derive_fluent_impl(&sup).map(drop),
            DeriveFn::Builder | DeriveFn::EditableBuilder | DeriveFn::Editable => Ok(()),
        }
    }

    fn property_plans(&mut self, decl: &TypeDecl) -> DeriveResult<Vec<PropertyPlan>> {
        let cx = PropertyContext::for_type(decl);
        let properties: Vec<Property> = support::surfaced_properties(self.repo, decl).into_iter().cloned().collect();
        properties.iter().map(|p| self.plan_property(&cx, p)).collect()
    }

    /// Derive `TFluent`: the fluent interface of `decl`.
    ///
    /// ## Errors
    /// - Buildability errors of `decl` or of any buildable property element.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_fluent_interface(&mut self, decl: &TypeDecl) -> DeriveResult<Arc<TypeDecl>> {
        self.memoized(DeriveFn::FluentInterface, decl, |this, decl| {
            this.derive_superclass(DeriveFn::FluentInterface, decl)?;
            let plans = this.property_plans(decl)?;
            let methods = dedupe(
                plans
                    .iter()
                    .flat_map(|p| p.methods.iter().cloned().map(Method::without_body)),
            );
            let mut out = this.fluent_interface_shell(decl).with_methods(methods);
            for pair in plans.into_iter().flat_map(|p| p.nested) {
                out = out.with_nested(pair.interface);
            }
            Ok(Arc::new(out))
        })
    }

    /// Derive `TFluentImpl`: backing fields, method bodies, nested implementations, constructors and `equals`.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_fluent_impl(&mut self, decl: &TypeDecl) -> DeriveResult<Arc<TypeDecl>> {
        self.memoized(DeriveFn::FluentImpl, decl, |this, decl| {
            this.derive_superclass(DeriveFn::FluentImpl, decl)?;
            let plans = this.property_plans(decl)?;
            let shell = this.fluent_impl_shell(decl);

            let empty = constructor(&shell, vec![], vec![]);
            let seeded = constructor(
                &shell,
                vec![Param::new(naming::INSTANCE_PARAM, decl.to_internal_ref().into())],
                this.instance_population(decl, &Expr::This)?,
            );
            let compared: Vec<(String, FieldEquality)> =
                plans.iter().map(|p| (p.field.name.clone(), p.equality)).collect();
            let equals = this.equals_method(shell.superclass(), &compared);

            let methods = dedupe(plans.iter().flat_map(|p| p.methods.iter().cloned()).chain([equals]));
            let mut out = shell
                .with_properties(plans.iter().map(|p| p.field.clone()))
                .with_constructor(empty)
                .with_constructor(seeded)
                .with_methods(methods);
            for pair in plans.into_iter().flat_map(|p| p.nested) {
                out = out.with_nested(pair.implementation);
            }
            Ok(Arc::new(out))
        })
    }

    /// Derive `TBuilder`, whose `build()` constructs `T`.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_builder(&mut self, decl: &TypeDecl) -> DeriveResult<Arc<TypeDecl>> {
        self.memoized(DeriveFn::Builder, decl, |this, decl| {
            this.derive_fluent_impl(decl)?;
            let product = decl.to_internal_ref();
            Ok(Arc::new(this.builder_decl(decl, product)?))
        })
    }

    /// Derive the editable builder: `TBuilder` whose `build()` constructs `EditableT`.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_editable_builder(&mut self, decl: &TypeDecl) -> DeriveResult<Arc<TypeDecl>> {
        self.memoized(DeriveFn::EditableBuilder, decl, |this, decl| {
            this.derive_fluent_impl(decl)?;
            let editable = this.derive_editable(decl)?;
            let product = ClassRef::new(editable.id.clone(), decl.to_internal_ref().arguments);
            Ok(Arc::new(this.builder_decl(decl, product)?))
        })
    }

    /// Derive `EditableT` and register it as a generated buildable type.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_editable(&mut self, decl: &TypeDecl) -> DeriveResult<Arc<TypeDecl>> {
        self.memoized(DeriveFn::Editable, decl, |this, decl| {
            this.derive_builder(decl)?;
            let shell = this.editable_shell(decl);
            let constructors: Vec<Method> = decl
                .constructors
                .iter()
                .map(|c| {
                    constructor(
                        &shell,
                        c.params.clone(),
                        vec![Stmt::delegate(Delegation::Super, forward(&c.params))],
                    )
                    .with_modifiers(c.modifiers)
                })
                .collect();
            let builder = this.builder_ref(decl);
            let edit = Method::new(naming::EDIT_METHOD, builder.clone().into())
                .with_body(Block::new(vec![Stmt::ret(Expr::new_object(builder, vec![Expr::This]))]));

            let mut editable = shell.with_method(edit);
            for ctor in constructors {
                editable = editable.with_constructor(ctor);
            }
            Ok(this.repo.register_buildable(editable))
        })
    }

    /// Calls on `target` that copy every builder-visible value out of the local `instance`.
    ///
    /// Canonical constructor arguments first, then setter-only properties along the buildable superclass chain.
    fn instance_population(&self, decl: &TypeDecl, target: &Expr) -> DeriveResult<Vec<Stmt>> {
        let instance = || Expr::var(naming::INSTANCE_PARAM);
        let mut stmts = Vec::new();
        for arg in &support::canonical_constructor(decl)?.params {
            let getter = support::find_getter(self.repo, decl, &arg.name).ok_or_else(|| DeriveError::MissingGetter {
                ty: decl.id.clone(),
                property: arg.name.clone(),
            })?;
            stmts.push(Stmt::Eval(
                target.clone().call(naming::with(&arg.name), vec![instance().call(getter, vec![])]),
            ));
        }
        for (property, getter) in support::setter_only_properties(self.repo, decl)? {
            stmts.push(Stmt::Eval(
                target.clone().call(naming::with(&property.name), vec![instance().call(getter, vec![])]),
            ));
        }
        Ok(stmts)
    }

    /// Getter on the fluent for a property of type `ty`: `getXArray`, `isX` or `getX`.
    fn fluent_getter(&self, name: &str, ty: &TypeRef) -> String {
        if ty.is_array() {
            naming::array_getter(name)
        } else {
            naming::getter(name, is_boolean(ty, &self.config))
        }
    }

    /// Structural `equals(Object o)` over `fields`.
    fn equals_method(&self, parent: Option<&ClassRef>, fields: &[(String, FieldEquality)]) -> Method {
        let base_fluent = root_id(LibraryRootId::BaseFluent, &self.config);
        let other = || Expr::var(OTHER);
        let mine = |f: &str| Expr::this_field(f);
        let theirs = |f: &str| Expr::var(THAT).field(f);

        let mut body = vec![
            Stmt::when(
                Expr::compare(Equality::Identity, Expr::This, other()),
                vec![Stmt::ret(Expr::Bool(true))],
            ),
            return_false_when(other().is_null().or(Expr::compare(Equality::SameClass, Expr::This, other()).negate())),
        ];
        if parent.is_some_and(|p| p.id != base_fluent) {
            body.push(return_false_when(
                Expr::SuperCall {
                    method: naming::EQUALS_METHOD.to_string(),
                    args: vec![other()],
                }
                .negate(),
            ));
        }
        body.push(Stmt::Let {
            name: THAT.to_string(),
            value: other(),
        });
        for (field, equality) in fields {
            let differs = match equality {
                FieldEquality::Value => Expr::compare(Equality::Value, mine(field), theirs(field)).negate(),
                FieldEquality::Structural => Expr::compare(Equality::Structural, mine(field), theirs(field)).negate(),
                FieldEquality::Guarded => Expr::compare(Equality::Identity, mine(field), Expr::This)
                    .negate()
                    .and(Expr::compare(Equality::Structural, mine(field), theirs(field)).negate()),
            };
            body.push(return_false_when(differs));
        }
        body.push(Stmt::ret(Expr::Bool(true)));

        Method::new(naming::EQUALS_METHOD, boolean())
            .with_param(Param::new(OTHER, object_ref(&self.config)))
            .with_body(Block::new(body))
    }

    /// `TBuilder` with `build()` constructing `product`.
    fn builder_decl(&mut self, decl: &TypeDecl, product: ClassRef) -> DeriveResult<TypeDecl> {
        let shell = self.builder_shell(decl);
        let fluent_ty: TypeRef = self.fluent_self_ref(decl, TypeRef::wildcard()).into();
        let instance_ty: TypeRef = decl.to_internal_ref().into();
        let has_default = support::has_default_constructor(decl);

        let v = naming::VALIDATION_FIELD;
        let f = naming::FLUENT_FIELD;
        let inst = naming::INSTANCE_PARAM;
        let p_valid = || Param::new(v, boolean());
        let p_fluent = || Param::new(f, fluent_ty.clone());
        let p_instance = || Param::new(inst, instance_ty.clone());
        let this_call = |args: Vec<Expr>| Stmt::delegate(Delegation::This, args);
        let fresh = || Expr::new_object(decl.to_internal_ref(), vec![]);

        let mut seeded_from_fluent = vec![Stmt::assign_field(f, Expr::var(f))];
        seeded_from_fluent.extend(self.instance_population(decl, &Expr::var(f))?);
        seeded_from_fluent.push(Stmt::assign_field(v, Expr::var(v)));

        let mut seeded_from_self = vec![Stmt::assign_field(f, Expr::This)];
        seeded_from_self.extend(self.instance_population(decl, &Expr::This)?);
        seeded_from_self.push(Stmt::assign_field(v, Expr::var(v)));

        let validation_only = if has_default {
            vec![this_call(vec![fresh(), Expr::var(v)])]
        } else {
            vec![Stmt::assign_field(f, Expr::This), Stmt::assign_field(v, Expr::var(v))]
        };
        let fluent_and_validation = if has_default {
            vec![this_call(vec![Expr::var(f), fresh(), Expr::var(v)])]
        } else {
            vec![Stmt::assign_field(f, Expr::var(f)), Stmt::assign_field(v, Expr::var(v))]
        };

        let constructors = vec![
            constructor(&shell, vec![], vec![this_call(vec![Expr::Bool(true)])]),
            constructor(&shell, vec![p_valid()], validation_only),
            constructor(&shell, vec![p_fluent()], vec![this_call(vec![Expr::var(f), Expr::Bool(true)])]),
            constructor(&shell, vec![p_fluent(), p_valid()], fluent_and_validation),
            constructor(
                &shell,
                vec![p_fluent(), p_instance()],
                vec![this_call(vec![Expr::var(f), Expr::var(inst), Expr::Bool(true)])],
            ),
            constructor(&shell, vec![p_fluent(), p_instance(), p_valid()], seeded_from_fluent),
            constructor(&shell, vec![p_instance()], vec![this_call(vec![Expr::var(inst), Expr::Bool(true)])]),
            constructor(&shell, vec![p_instance(), p_valid()], seeded_from_self),
        ];

        let build = self.build_method(decl, product)?;
        let validate = self.validate_method(decl);
        let equals = self.equals_method(
            shell.superclass(),
            &[(f.to_string(), FieldEquality::Guarded), (v.to_string(), FieldEquality::Value)],
        );

        let mut out = shell
            .with_property(Property::new(f, fluent_ty).with_modifiers(Modifiers::private()))
            .with_property(Property::new(v, boolean()).with_modifiers(Modifiers::private()))
            .with_methods([build, validate, equals]);
        for ctor in constructors {
            out = out.with_constructor(ctor);
        }
        Ok(out)
    }

    /// `build()`: canonical constructor fed from the fluent, then setter-only properties, then validation.
    fn build_method(&self, decl: &TypeDecl, product: ClassRef) -> DeriveResult<Method> {
        let signature = Method::new(naming::BUILD_METHOD, product.clone().into());
        if decl.is_abstract() {
            return Ok(signature.without_body());
        }
        let fluent = || Expr::this_field(naming::FLUENT_FIELD);
        let local = || Expr::var(naming::BUILDABLE_LOCAL);

        let args = support::canonical_constructor(decl)?
            .params
            .iter()
            .map(|p| fluent().call(self.fluent_getter(&p.name, &p.ty), vec![]))
            .collect();
        let mut body = vec![Stmt::Let {
            name: naming::BUILDABLE_LOCAL.to_string(),
            value: Expr::new_object(product, args),
        }];
        for (property, _) in support::setter_only_properties(self.repo, decl)? {
            let value = fluent().call(self.fluent_getter(&property.name, &property.ty), vec![]);
            body.push(Stmt::Eval(local().call(naming::setter(&property.name), vec![value])));
        }
        body.push(Stmt::Eval(Expr::This.call(naming::VALIDATE_METHOD, vec![local()])));
        body.push(Stmt::ret(local()));
        Ok(signature.with_body(Block::new(body)))
    }

    /// `validate(item)`: runs the validator only when `T` opts in and the builder instance has validation on.
    fn validate_method(&self, decl: &TypeDecl) -> Method {
        let item_param = TypeParam::new("T");
        let body = if decl.flags.validation_enabled {
            vec![
                Stmt::when(Expr::this_field(naming::VALIDATION_FIELD).negate(), vec![Stmt::Return(None)]),
                Stmt::Validate(Expr::var(ITEM)),
            ]
        } else {
            Vec::new()
        };
        Method::new(naming::VALIDATE_METHOD, TypeRef::Void)
            .with_type_params(vec![item_param.clone()])
            .with_param(Param::new(ITEM, item_param.to_ref()))
            .with_modifiers(Modifiers::private())
            .with_body(Block::new(body))
    }
}

/// Every declaration derived for one source type.
#[derive(Debug, Clone)]
pub struct DerivedFamily {
    pub source: Arc<TypeDecl>,
    pub fluent_interface: Arc<TypeDecl>,
    pub fluent_impl: Arc<TypeDecl>,
    /// The editable builder when editables are enabled.
    pub builder: Arc<TypeDecl>,
    pub editable: Option<Arc<TypeDecl>>,
}

impl DerivedFamily {
    /// Derived declarations, dependencies first.
    pub fn derived(&self) -> impl Iterator<Item = &Arc<TypeDecl>> {
        [&self.fluent_interface, &self.fluent_impl, &self.builder]
            .into_iter()
            .chain(self.editable.as_ref())
    }
}

impl<'r> Deriver<'r> {
    /// Derive the whole family of `decl`, after the families of its buildable superclasses.
    #[tracing::instrument(skip_all, fields(ty = %decl.id))]
    pub fn derive_family(&mut self, decl: &TypeDecl) -> DeriveResult<DerivedFamily> {
        let ancestors = self.repo.buildable_ancestors(decl);
        for ancestor in ancestors.iter().rev() {
            self.family_of(ancestor)?;
        }
        self.family_of(decl)
    }

    /// Families of every registered, non-generated buildable type, in registration order.
    pub fn derive_buildables(&mut self) -> DeriveResult<Vec<DerivedFamily>> {
        let sources: Vec<Arc<TypeDecl>> = self.repo.buildables().filter(|d| !d.flags.generated).cloned().collect();
        sources.iter().map(|d| self.derive_family(d)).collect()
    }

    fn family_of(&mut self, decl: &TypeDecl) -> DeriveResult<DerivedFamily> {
        let fluent_interface = self.derive_fluent_interface(decl)?;
        let fluent_impl = self.derive_fluent_impl(decl)?;
        let (builder, editable) = if self.config.editable_enabled {
            let editable = self.derive_editable(decl)?;
            (self.derive_editable_builder(decl)?, Some(editable))
        } else {
            (self.derive_builder(decl)?, None)
        };
        let source = match self.repo.get(&decl.id) {
            Some(stored) => Arc::clone(stored),
            None => Arc::new(decl.clone()),
        };
        Ok(DerivedFamily {
            source,
            fluent_interface,
            fluent_impl,
            builder,
            editable,
        })
    }
}
