//! Per-property method synthesis.
//!
//! Each surfaced property is classified by shape (array, list, set, map, scalar) and by how its values are stored
//! in the fluent implementation, then receives a fixed template of accessors and mutators. The same plan feeds
//! both the fluent interface (signatures only) and the fluent implementation (bodies, backing field, nested
//! implementations).
//!
//! ## Notes
//! - Concrete buildable elements are stored as builders and materialized by the getters (`BuildAll` for
//!   collections, `build()` for scalars), so nested builders can keep mutating them.
//! - Abstract elements with registered descendants are stored as builders too, picked per item by an
//!   `instanceof` chain over the descendants.

use buildsmith_core::naming;
use buildsmith_core::vocab::collections::CollectionKind;
use buildsmith_core::vocab::{LibraryRootId, PrimitiveId};
use buildsmith_model::{
    Block, ClassRef, Expr, Intrinsic, Method, Modifiers, Param, Property, Stmt, TypeDecl, TypeRef, Visibility,
};

use super::Deriver;
use super::descendants::DescendantProperty;
use super::errors::{DeriveError, DeriveResult};
use super::nested::NestedPair;
use super::roots::root_ref;
use super::shapes::{
    Shape, boxed, collection_ref, element_type, is_boolean, is_simple_value, object_ref, replace_element, shape_of,
};
use super::types::{PropertyContext, builder_id};

const ITEMS: &str = "items";
const ITEM: &str = "item";
const KEY: &str = "key";
const VALUE: &str = "value";
const MAP: &str = "map";
const INDEX: &str = "index";

/// How a property's values live in the fluent implementation.
#[derive(Debug, Clone)]
enum Storage {
    /// The values themselves.
    Plain,
    /// One builder per value, for a concrete buildable element.
    Builder { builder: ClassRef },
    /// One builder per value, chosen by the runtime type of the value.
    Dispatch { variants: Vec<(ClassRef, ClassRef)> },
}

impl Storage {
    fn holds_builders(&self) -> bool {
        !matches!(self, Storage::Plain)
    }
}

/// Comparison a generated `equals` applies to a backing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldEquality {
    /// Primitive value comparison.
    Value,
    /// Skipped when the field refers back to the object itself, structural otherwise.
    Guarded,
    Structural,
}

/// Everything one property contributes to the fluent types.
#[derive(Debug, Clone)]
pub(crate) struct PropertyPlan {
    /// Private backing field of the fluent implementation.
    pub field: Property,
    pub equality: FieldEquality,
    /// Methods with bodies; the interface takes them with bodies stripped.
    pub methods: Vec<Method>,
    pub nested: Vec<NestedPair>,
}

/// Method returning the fluent self type: `body` followed by `return this`.
fn fluent(name: impl Into<String>, params: Vec<Param>, mut body: Vec<Stmt>, self_ref: &TypeRef) -> Method {
    body.push(Stmt::ret(Expr::This));
    Method::new(name, self_ref.clone())
        .with_params(params)
        .with_body(Block::new(body))
}

fn returning(name: impl Into<String>, ret: TypeRef, params: Vec<Param>, body: Vec<Stmt>) -> Method {
    Method::new(name, ret).with_params(params).with_body(Block::new(body))
}

fn not_null(name: &str) -> Expr {
    Expr::var(name).is_null().negate()
}

/// `for (item : items) this.<method>(item)`, guarded against a null `items`.
fn for_each_call(method: String) -> Stmt {
    Stmt::when(
        not_null(ITEMS),
        vec![Stmt::for_each(
            ITEM,
            Expr::var(ITEMS),
            vec![Stmt::Eval(Expr::This.call(method, vec![Expr::var(ITEM)]))],
        )],
    )
}

fn empty_collection(shape: Shape) -> Option<Expr> {
    let op = match shape {
        Shape::Array | Shape::List => Intrinsic::EmptyList,
        Shape::Set => Intrinsic::EmptySet,
        Shape::Map => Intrinsic::EmptyMap,
        Shape::Scalar => return None,
    };
    Some(Expr::intrinsic(op, vec![]))
}

impl Storage {
    /// Expression reading the field as values.
    fn read(&self, field: &str) -> Expr {
        if self.holds_builders() {
            Expr::intrinsic(Intrinsic::BuildAll, vec![Expr::this_field(field)])
        } else {
            Expr::this_field(field)
        }
    }

    /// Apply a collection `op` to the field for one value, wrapping it in the right builder.
    fn store(&self, op: Intrinsic, field: &str, item: Expr) -> Stmt {
        let apply = |value: Expr| Stmt::Eval(Expr::intrinsic(op, vec![Expr::this_field(field), value]));
        match self {
            Storage::Plain => apply(item),
            Storage::Builder { builder } => apply(Expr::new_object(builder.clone(), vec![item])),
            Storage::Dispatch { variants } => {
                dispatch_chain(variants, &item, |builder| apply(Expr::new_object(builder.clone(), vec![item.clone()])))
            }
        }
    }

    /// Assign one value (or null) to a scalar field.
    fn assign(&self, field: &str, item: Expr) -> Vec<Stmt> {
        let set = |value: Expr| Stmt::assign_field(field, value);
        let wrapped = match self {
            Storage::Plain => return vec![set(item)],
            Storage::Builder { builder } => set(Expr::new_object(builder.clone(), vec![item.clone()])),
            Storage::Dispatch { variants } => {
                dispatch_chain(variants, &item, |builder| set(Expr::new_object(builder.clone(), vec![item.clone()])))
            }
        };
        vec![Stmt::If {
            cond: item.is_null(),
            then: Block::new(vec![set(Expr::Null)]),
            otherwise: Block::new(vec![wrapped]),
        }]
    }
}

/// `if (item instanceof D1) { .. } else if (item instanceof D2) { .. }`, innermost last.
fn dispatch_chain(variants: &[(ClassRef, ClassRef)], item: &Expr, action: impl Fn(&ClassRef) -> Stmt) -> Stmt {
    let mut otherwise = Block::default();
    for (descendant, builder) in variants.iter().rev() {
        let branch = Stmt::If {
            cond: item.clone().instance_of(descendant.clone()),
            then: Block::new(vec![action(builder)]),
            otherwise,
        };
        otherwise = Block::new(vec![branch]);
    }
    match otherwise.stmts.pop() {
        Some(chain) => chain,
        None => Stmt::Eval(Expr::Null),
    }
}

/// Public constructors of `target` usable as inline nested forms: at least one parameter, all simple values,
/// deduplicated by parameter types.
fn inline_constructors<'a>(target: &'a TypeDecl, deriver: &Deriver<'_>) -> Vec<&'a Method> {
    let mut seen: Vec<String> = Vec::new();
    target
        .constructors
        .iter()
        .filter(|c| c.modifiers.visibility == Visibility::Public && !c.params.is_empty())
        .filter(|c| {
            c.params
                .iter()
                .all(|p| !p.varargs && is_simple_value(&p.ty, &deriver.config))
        })
        .filter(|c| {
            let key = c.signature();
            let fresh = !seen.contains(&key);
            seen.push(key);
            fresh
        })
        .collect()
}

fn forward_args(params: &[Param]) -> Vec<Expr> {
    params.iter().map(|p| Expr::var(p.name.clone())).collect()
}

/// Names of the nested entry points for one property.
struct EntryNames {
    start: String,
    start_like: String,
    /// Setter the inline forms feed the new value to.
    apply: String,
    edit: Option<String>,
}

impl<'r> Deriver<'r> {
    fn storage_for(&self, shape: Shape, element: &TypeRef, variants: &[DescendantProperty]) -> Storage {
        if shape == Shape::Map {
            return Storage::Plain;
        }
        let Some(class) = element.as_class() else {
            return Storage::Plain;
        };
        if !variants.is_empty() {
            let variants = variants
                .iter()
                .filter_map(|v| self.repo.get(&v.descendant))
                .map(|d| (d.to_wildcard_ref(), ClassRef::of(builder_id(&d.id))))
                .collect();
            return Storage::Dispatch { variants };
        }
        let concrete_buildable =
            self.repo.is_buildable(&class.id) && self.repo.get(&class.id).is_some_and(|d| !d.is_abstract());
        if concrete_buildable {
            Storage::Builder {
                builder: ClassRef::new(builder_id(&class.id), class.arguments.clone()),
            }
        } else {
            Storage::Plain
        }
    }

    /// `VisitableBuilder<? extends E, ?>`
    fn element_builder_type(&self, element: &TypeRef) -> TypeRef {
        root_ref(
            LibraryRootId::VisitableBuilder,
            vec![TypeRef::wildcard_extends(element.clone()), TypeRef::wildcard()],
            &self.config,
        )
        .into()
    }

    fn backing_field(&self, property: &Property, shape: Shape, element: &TypeRef, storage: &Storage) -> Property {
        let stored_element = if storage.holds_builders() {
            self.element_builder_type(element)
        } else {
            boxed(element, &self.config)
        };
        let ty = match shape {
            Shape::Array => collection_ref(CollectionKind::List, vec![stored_element], &self.config).into(),
            Shape::List | Shape::Set if storage.holds_builders() => {
                replace_element(&property.ty, stored_element, &self.config)
            }
            Shape::Scalar if storage.holds_builders() => stored_element,
            _ => property.ty.clone(),
        };
        let field = Property::new(property.name.clone(), ty).with_modifiers(Modifiers::private());
        match empty_collection(shape) {
            Some(init) => field.with_initializer(init),
            None => field,
        }
    }

    fn field_equality(&self, cx: &PropertyContext, property: &Property, element: &TypeRef, storage: &Storage) -> FieldEquality {
        if property.ty.is_primitive() && !storage.holds_builders() {
            return FieldEquality::Value;
        }
        match element.as_class() {
            Some(class) if self.repo.is_assignable_from(&class.id, &cx.owner) => FieldEquality::Guarded,
            _ => FieldEquality::Structural,
        }
    }

    /// Classify `property` and synthesize its method set, backing field and nested builders.
    ///
    /// ## Errors
    /// - [`DeriveError::MalformedPropertyType`] for properties typed as a wildcard or `void` (any shape; wildcard
    ///   collection elements such as `List<?>` are fine).
    /// - Nested-builder errors for buildable elements.
    pub(crate) fn plan_property(&mut self, cx: &PropertyContext, property: &Property) -> DeriveResult<PropertyPlan> {
        if matches!(property.ty, TypeRef::Wildcard(_) | TypeRef::Void) {
            return Err(DeriveError::MalformedPropertyType {
                property: property.name.clone(),
                ty: property.ty.to_string(),
            });
        }
        let shape = shape_of(&property.ty, &self.config);
        let element = element_type(&property.ty, &self.config);
        let variants = if shape == Shape::Map {
            Vec::new()
        } else {
            self.expand_descendants(property)
        };
        let storage = self.storage_for(shape, &element, &variants);
        let field = self.backing_field(property, shape, &element, &storage);
        let equality = self.field_equality(cx, property, &element, &storage);

        let mut methods = match shape {
            Shape::Array => self.array_methods(cx, property, &element, &storage),
            Shape::List | Shape::Set => self.collection_methods(cx, property, shape, &element, &storage),
            Shape::Map => self.map_methods(cx, property),
            Shape::Scalar => self.scalar_methods(cx, property, &storage),
        };
        let mut nested = Vec::new();

        match &storage {
            Storage::Builder { .. } => {
                let (entry_methods, pair) = self.nested_entry_points(cx, property, shape, &element)?;
                methods.extend(entry_methods);
                nested.push(pair);
            }
            Storage::Dispatch { .. } if matches!(shape, Shape::List | Shape::Set) => {
                for variant in &variants {
                    methods.extend(self.variant_mutators(cx, property, variant));
                    let variant_element = element_type(&variant.property.ty, &self.config);
                    let (entry_methods, pair) =
                        self.nested_entry_points(cx, &variant.property, shape, &variant_element)?;
                    methods.extend(entry_methods);
                    nested.push(pair);
                }
            }
            Storage::Dispatch { .. } | Storage::Plain => {}
        }

        tracing::trace!(property = %property.name, ?shape, methods = methods.len(), "planned property");
        Ok(PropertyPlan {
            field,
            equality,
            methods,
            nested,
        })
    }

    fn array_methods(&self, cx: &PropertyContext, property: &Property, component: &TypeRef, storage: &Storage) -> Vec<Method> {
        let name = &property.name;
        let s = cx.self_ref();
        let boxed_component = boxed(component, &self.config);
        let init = empty_collection(Shape::Array).unwrap_or(Expr::Null);
        let int = TypeRef::primitive(PrimitiveId::Int);

        vec![
            fluent(
                naming::with(name),
                vec![Param::varargs(ITEMS, component.clone())],
                vec![Stmt::assign_field(name, init), for_each_call(naming::add_to(name))],
                &s,
            ),
            returning(
                naming::array_getter(name),
                boxed_component.clone().array_of(),
                vec![],
                vec![Stmt::ret(Expr::intrinsic(Intrinsic::ToArray, vec![storage.read(name)]))],
            ),
            returning(
                naming::getter(name, false),
                boxed_component.clone(),
                vec![Param::new(INDEX, int)],
                vec![Stmt::ret(Expr::intrinsic(
                    Intrinsic::Index,
                    vec![storage.read(name), Expr::var(INDEX)],
                ))],
            ),
            self.element_mutator(naming::add_to(name), Intrinsic::Add, name, &boxed_component, storage, &s),
            self.element_mutator(naming::remove_from(name), Intrinsic::Remove, name, &boxed_component, storage, &s),
        ]
    }

    /// `addToX(E... items)` / `removeFromX(E... items)` writing into `field`.
    fn element_mutator(
        &self,
        method: String,
        op: Intrinsic,
        field: &str,
        element: &TypeRef,
        storage: &Storage,
        s: &TypeRef,
    ) -> Method {
        let body = vec![Stmt::when(
            not_null(ITEMS),
            vec![Stmt::for_each(ITEM, Expr::var(ITEMS), vec![storage.store(op, field, Expr::var(ITEM))])],
        )];
        fluent(method, vec![Param::varargs(ITEMS, element.clone())], body, s)
    }

    fn collection_methods(
        &self,
        cx: &PropertyContext,
        property: &Property,
        shape: Shape,
        element: &TypeRef,
        storage: &Storage,
    ) -> Vec<Method> {
        let name = &property.name;
        let s = cx.self_ref();
        let reset = || {
            vec![
                Stmt::assign_field(name, empty_collection(shape).unwrap_or(Expr::Null)),
                for_each_call(naming::add_to(name)),
            ]
        };
        vec![
            self.element_mutator(naming::add_to(name), Intrinsic::Add, name, element, storage, &s),
            self.element_mutator(naming::remove_from(name), Intrinsic::Remove, name, element, storage, &s),
            returning(
                naming::getter(name, false),
                property.ty.clone(),
                vec![],
                vec![Stmt::ret(storage.read(name))],
            ),
            fluent(naming::with(name), vec![Param::new(ITEMS, property.ty.clone())], reset(), &s),
            fluent(naming::with(name), vec![Param::varargs(ITEMS, element.clone())], reset(), &s),
        ]
    }

    fn map_methods(&self, cx: &PropertyContext, property: &Property) -> Vec<Method> {
        let name = &property.name;
        let s = cx.self_ref();
        let ty = property.ty.clone();
        let args = property.ty.as_class().map(|c| c.arguments.clone()).unwrap_or_default();
        let key_ty = args.first().cloned().unwrap_or_else(|| object_ref(&self.config));
        let value_ty = args.get(1).cloned().unwrap_or_else(|| object_ref(&self.config));
        let on_field = |op: Intrinsic, rest: Vec<Expr>| {
            let mut all = vec![Expr::this_field(name)];
            all.extend(rest);
            Stmt::Eval(Expr::intrinsic(op, all))
        };

        vec![
            fluent(
                naming::add_to(name),
                vec![Param::new(KEY, key_ty.clone()), Param::new(VALUE, value_ty)],
                vec![Stmt::when(
                    not_null(KEY).and(not_null(VALUE)),
                    vec![on_field(Intrinsic::Put, vec![Expr::var(KEY), Expr::var(VALUE)])],
                )],
                &s,
            ),
            fluent(
                naming::add_all_to(name),
                vec![Param::new(MAP, ty.clone())],
                vec![Stmt::when(not_null(MAP), vec![on_field(Intrinsic::PutAll, vec![Expr::var(MAP)])])],
                &s,
            ),
            fluent(
                naming::remove_from(name),
                vec![Param::new(KEY, key_ty)],
                vec![Stmt::when(not_null(KEY), vec![on_field(Intrinsic::RemoveKey, vec![Expr::var(KEY)])])],
                &s,
            ),
            fluent(
                naming::remove_all_from(name),
                vec![Param::new(MAP, ty.clone())],
                vec![Stmt::when(not_null(MAP), vec![on_field(Intrinsic::RemoveKeys, vec![Expr::var(MAP)])])],
                &s,
            ),
            returning(naming::getter(name, false), ty.clone(), vec![], vec![Stmt::ret(Expr::this_field(name))]),
            fluent(
                naming::with(name),
                vec![Param::new(MAP, ty)],
                vec![
                    Stmt::assign_field(name, Expr::intrinsic(Intrinsic::EmptyMap, vec![])),
                    Stmt::when(not_null(MAP), vec![on_field(Intrinsic::PutAll, vec![Expr::var(MAP)])]),
                ],
                &s,
            ),
        ]
    }

    fn scalar_methods(&self, cx: &PropertyContext, property: &Property, storage: &Storage) -> Vec<Method> {
        let name = &property.name;
        let getter_body = if storage.holds_builders() {
            vec![
                Stmt::when(Expr::this_field(name).is_null(), vec![Stmt::ret(Expr::Null)]),
                Stmt::ret(Expr::this_field(name).call(naming::BUILD_METHOD, vec![])),
            ]
        } else {
            vec![Stmt::ret(Expr::this_field(name))]
        };
        vec![
            returning(
                naming::getter(name, is_boolean(&property.ty, &self.config)),
                property.ty.clone(),
                vec![],
                getter_body,
            ),
            fluent(
                naming::with(name),
                vec![Param::new(name.clone(), property.ty.clone())],
                storage.assign(name, Expr::var(name.clone())),
                &cx.self_ref(),
            ),
        ]
    }

    /// Typed `addTo`/`removeFrom` for one descendant variant, writing into the base field.
    fn variant_mutators(&self, cx: &PropertyContext, base: &Property, variant: &DescendantProperty) -> Vec<Method> {
        let s = cx.self_ref();
        let element = element_type(&variant.property.ty, &self.config);
        let storage = Storage::Builder {
            builder: ClassRef::of(builder_id(&variant.descendant)),
        };
        vec![
            self.element_mutator(
                naming::add_to(&variant.property.name),
                Intrinsic::Add,
                &base.name,
                &element,
                &storage,
                &s,
            ),
            self.element_mutator(
                naming::remove_from(&variant.property.name),
                Intrinsic::Remove,
                &base.name,
                &element,
                &storage,
                &s,
            ),
        ]
    }

    /// `withNewX()`/`addNewX()`, their seeded `...Like` forms, inline constructor forms and `editX()`.
    fn nested_entry_points(
        &mut self,
        cx: &PropertyContext,
        property: &Property,
        shape: Shape,
        element: &TypeRef,
    ) -> DeriveResult<(Vec<Method>, NestedPair)> {
        let pair = self.nested_pair(cx, property)?;
        let class = element.as_class().cloned().ok_or_else(|| DeriveError::UnresolvedTypeDefinition {
            property: property.name.clone(),
            ty: element.to_string(),
        })?;
        let target = self
            .repo
            .get(&class.id)
            .cloned()
            .ok_or_else(|| DeriveError::UnresolvedTypeDefinition {
                property: property.name.clone(),
                ty: element.to_string(),
            })?;

        let name = &property.name;
        let names = if shape == Shape::Scalar {
            EntryNames {
                start: naming::with_new(name),
                start_like: naming::with_new_like(name),
                apply: naming::with(name),
                edit: Some(naming::edit(name)),
            }
        } else {
            let singular = naming::singularize(name);
            EntryNames {
                start: naming::add_new(&singular),
                start_like: naming::add_new_like(&singular),
                apply: naming::add_to(name),
                edit: None,
            }
        };

        let s = cx.self_ref();
        let mut outer_args = class.arguments.clone();
        outer_args.push(s.clone());
        let nested_ref: TypeRef = pair.interface_ref(outer_args.clone()).into();
        let impl_ref = pair.implementation_ref(outer_args);

        let mut methods = vec![
            returning(
                names.start.clone(),
                nested_ref.clone(),
                vec![],
                vec![Stmt::ret(Expr::new_object(impl_ref.clone(), vec![]))],
            ),
            returning(
                names.start_like.clone(),
                nested_ref.clone(),
                vec![Param::new(ITEM, class.clone().into())],
                vec![Stmt::ret(Expr::new_object(impl_ref, vec![Expr::var(ITEM)]))],
            ),
        ];

        for ctor in inline_constructors(&target, self) {
            let built = Expr::new_object(class.clone(), forward_args(&ctor.params));
            methods.push(returning(
                names.start.clone(),
                s.clone(),
                ctor.params.clone(),
                vec![Stmt::ret(Expr::This.call(names.apply.clone(), vec![built]))],
            ));
        }

        if let Some(edit) = names.edit {
            let current = Expr::This.call(naming::getter(name, false), vec![]);
            methods.push(returning(
                edit,
                nested_ref,
                vec![],
                vec![Stmt::ret(Expr::This.call(names.start_like, vec![current]))],
            ));
        }

        Ok((methods, pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::DerivationConfig;
    use buildsmith_model::{Kind, TypeId, TypeRepository};

    fn util(name: &str, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::class_with(TypeId::new("java.util", name), args)
    }

    fn string() -> TypeRef {
        TypeRef::class(TypeId::new("java.lang", "String"))
    }

    fn point() -> TypeDecl {
        let int = TypeRef::primitive(PrimitiveId::Int);
        TypeDecl::new(TypeId::new("geo", "Point"), Kind::Record)
            .with_properties([Property::new("x", int.clone()), Property::new("y", int.clone())])
            .with_constructor_params(vec![Param::new("x", int.clone()), Param::new("y", int.clone())])
            .with_methods([Method::new("getX", int.clone()), Method::new("getY", int)])
    }

    fn signatures(plan: &PropertyPlan) -> Vec<String> {
        plan.methods.iter().map(Method::signature).collect()
    }

    fn plan(repo: &mut TypeRepository, property: Property) -> DeriveResult<PropertyPlan> {
        let owner = TypeDecl::new(TypeId::new("geo", "Owner"), Kind::Record);
        let cx = PropertyContext::for_type(&owner);
        let mut deriver = Deriver::new(repo, DerivationConfig::default());
        deriver.plan_property(&cx, &property)
    }

    #[test]
    fn test_array_template() {
        let mut repo = TypeRepository::new();
        let plan = plan(&mut repo, Property::new("tags", string().array_of())).unwrap();
        assert_eq!(
            signatures(&plan),
            vec![
                "withTags(String...)",
                "getTagsArray()",
                "getTags(int)",
                "addToTags(String...)",
                "removeFromTags(String...)"
            ]
        );
        assert_eq!(plan.field.ty.to_string(), "List<String>");
        assert!(plan.field.initializer.is_some());
    }

    #[test]
    fn test_primitive_array_backing_list_is_boxed() {
        let mut repo = TypeRepository::new();
        let ints = TypeRef::primitive(PrimitiveId::Int).array_of();
        let plan = plan(&mut repo, Property::new("values", ints)).unwrap();
        assert_eq!(plan.field.ty.to_string(), "List<Integer>");
        assert_eq!(plan.methods[1].return_type.to_string(), "Integer[]");
        assert_eq!(plan.methods[0].signature(), "withValues(int...)");
    }

    #[test]
    fn test_map_template() {
        let mut repo = TypeRepository::new();
        let ty = util("Map", vec![string(), string()]);
        let plan = plan(&mut repo, Property::new("labels", ty)).unwrap();
        assert_eq!(
            signatures(&plan),
            vec![
                "addToLabels(String, String)",
                "addAllToLabels(Map<String, String>)",
                "removeFromLabels(String)",
                "removeAllFromLabels(Map<String, String>)",
                "getLabels()",
                "withLabels(Map<String, String>)"
            ]
        );
        assert!(plan.nested.is_empty());
    }

    #[test]
    fn test_buildable_list_gets_nested_entry_points() {
        let mut repo = TypeRepository::new();
        repo.register_buildable(point());
        let plan = plan(&mut repo, Property::new("points", util("List", vec![TypeRef::class(TypeId::new("geo", "Point"))])))
            .unwrap();
        let sigs = signatures(&plan);
        assert!(sigs.contains(&"addNewPoint()".to_string()));
        assert!(sigs.contains(&"addNewPointLike(Point)".to_string()));
        assert!(sigs.contains(&"addNewPoint(int, int)".to_string()));
        assert!(!sigs.iter().any(|s| s.starts_with("edit")));
        assert_eq!(plan.field.ty.to_string(), "List<VisitableBuilder<? extends Point, ?>>");
        assert_eq!(plan.nested.len(), 1);
    }

    #[test]
    fn test_boolean_scalar_uses_is_getter() {
        let mut repo = TypeRepository::new();
        let plan = plan(&mut repo, Property::new("active", TypeRef::primitive(PrimitiveId::Boolean))).unwrap();
        assert_eq!(signatures(&plan), vec!["isActive()", "withActive(boolean)"]);
        assert_eq!(plan.equality, FieldEquality::Value);
    }

    #[test]
    fn test_void_property_is_malformed() {
        let mut repo = TypeRepository::new();
        assert_eq!(
            plan(&mut repo, Property::new("nothing", TypeRef::Void)).unwrap_err(),
            DeriveError::MalformedPropertyType {
                property: "nothing".to_string(),
                ty: "void".to_string()
            }
        );
    }
}
