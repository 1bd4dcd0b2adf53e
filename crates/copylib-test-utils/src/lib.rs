//! Testing utilities for copylib workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use copylib_meta::core_types::{color4f, vector3f, COLOR4F, VECTOR3F};
use copylib_meta::{
    ClassCatalog, ClassId, ClassInfo, ClassKind, Constructor, FieldInfo, Object, TypeDescriptor,
    Value,
};
use std::sync::Once;

pub const ITEM: &str = "game.Item";
pub const LOCATION: &str = "game.Location";
pub const INVENTORY: &str = "game.Inventory";
pub const TREE_NODE: &str = "game.TreeNode";
pub const NAMED_ITEM: &str = "game.NamedItem";
pub const ABSTRACT_SHAPE: &str = "game.AbstractShape";
pub const INNER_HANDLE: &str = "game.Outer.Handle";
pub const LOCAL_HELPER: &str = "game.build.Helper";
pub const SEALED_CONFIG: &str = "game.SealedConfig";

static TRACING: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`, once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn ty(name: &str) -> TypeDescriptor {
    TypeDescriptor::class(name)
}

/// Catalog with the core types plus a small game data model
///
/// - `Item { name: String, count: int, tint: Color4f }`
/// - `NamedItem extends Item { label: String }`
/// - `Location { position: Vector3f }`
/// - `Inventory { owner: String, items: List<Item>, tags: Set<String>, slots: Map<String, Item> }`
/// - `TreeNode { value: int, children: List<TreeNode>, parent: TreeNode }`
/// - mapped classes that cannot be generated: abstract, inner, local, and
///   private-constructor
pub fn game_catalog() -> ClassCatalog {
    let catalog = ClassCatalog::with_core_types();

    catalog.register(
        ClassInfo::new(ITEM)
            .mapped()
            .field(FieldInfo::new("name", ty("String")))
            .field(FieldInfo::new("count", ty("int")))
            .field(FieldInfo::new("tint", ty(COLOR4F)))
            .field(FieldInfo::new("registry", ty("game.ItemRegistry")).static_field())
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(NAMED_ITEM)
            .mapped()
            .extends(ITEM)
            .field(FieldInfo::new("label", ty("String")))
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(LOCATION)
            .mapped()
            .field(FieldInfo::new("position", ty(VECTOR3F)))
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(INVENTORY)
            .mapped()
            .field(FieldInfo::new("owner", ty("String")))
            .field(FieldInfo::new("items", TypeDescriptor::list_of(ty(ITEM))))
            .field(FieldInfo::new("tags", TypeDescriptor::set_of(ty("String"))))
            .field(FieldInfo::new(
                "slots",
                TypeDescriptor::map_of(ty("String"), ty(ITEM)),
            ))
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(TREE_NODE)
            .mapped()
            .field(FieldInfo::new("value", ty("int")))
            .field(FieldInfo::new("children", TypeDescriptor::list_of(ty(TREE_NODE))))
            .field(FieldInfo::new("parent", ty(TREE_NODE)))
            .with_default_constructor(),
    );

    catalog.register(
        ClassInfo::new(ABSTRACT_SHAPE)
            .mapped()
            .abstract_class()
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(INNER_HANDLE)
            .mapped()
            .with_kind(ClassKind::InnerMember)
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(LOCAL_HELPER)
            .mapped()
            .with_kind(ClassKind::Local)
            .with_default_constructor(),
    );
    catalog.register(
        ClassInfo::new(SEALED_CONFIG)
            .mapped()
            .field(FieldInfo::new("secret", ty("String")))
            .with_constructor(Constructor::private(|| {
                Object::new(ClassId::new(SEALED_CONFIG))
            })),
    );

    catalog
}

pub fn item(name: &str, count: i64) -> Value {
    Value::object(
        Object::new(ClassId::new(ITEM))
            .with("name", Value::str(name))
            .with("count", Value::Int(count))
            .with("tint", color4f(1.0, 1.0, 1.0, 1.0)),
    )
}

pub fn location(x: f32, y: f32, z: f32) -> Value {
    Value::object(Object::new(ClassId::new(LOCATION)).with("position", vector3f(x, y, z)))
}

pub fn inventory(owner: &str, items: Vec<Value>) -> Value {
    let slots = items
        .iter()
        .enumerate()
        .map(|(i, item)| (Value::str(&format!("slot{i}")), item.clone()));
    Value::object(
        Object::new(ClassId::new(INVENTORY))
            .with("owner", Value::str(owner))
            .with("items", Value::list(items.clone()))
            .with("tags", Value::set([Value::str("starter")]))
            .with("slots", Value::map(slots)),
    )
}

pub fn tree_leaf(value: i64) -> Value {
    Value::object(
        Object::new(ClassId::new(TREE_NODE))
            .with("value", Value::Int(value))
            .with("children", Value::list(vec![]))
            .with("parent", Value::Null),
    )
}

pub fn tree(value: i64, children: Vec<Value>) -> Value {
    Value::object(
        Object::new(ClassId::new(TREE_NODE))
            .with("value", Value::Int(value))
            .with("children", Value::list(children))
            .with("parent", Value::Null),
    )
}

/// Field of an object value; null for non-objects
pub fn field(value: &Value, name: &str) -> Value {
    value
        .as_object()
        .map_or(Value::Null, |object| object.read().get(name))
}

/// Assert two values are structurally equal but do not share the top-level
/// reference
pub fn assert_independent_copy(copy: &Value, original: &Value) {
    assert!(
        copy.deep_eq(original),
        "copy differs from original: {copy:?} vs {original:?}"
    );
    assert!(
        !copy.same_ref(original),
        "copy shares its reference with the original"
    );
}
