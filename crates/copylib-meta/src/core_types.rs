//! Core value types and built-in containers
//!
//! Small fixed-layout numeric types (vectors, quaternions, colors) that every
//! copy library knows how to copy, plus the standard container classes.

use crate::class::{ClassId, ClassInfo, Constructor, ContainerShape, FieldInfo};
use crate::descriptor::TypeDescriptor;
use crate::value::{Object, Value};

/// RGBA color, float components
pub const COLOR4F: &str = "Color4f";
/// Quaternion, float components
pub const QUAT4F: &str = "Quat4f";
/// 2D float vector
pub const VECTOR2F: &str = "Vector2f";
/// 3D float vector
pub const VECTOR3F: &str = "Vector3f";
/// 4D float vector
pub const VECTOR4F: &str = "Vector4f";
/// 3D integer vector
pub const VECTOR3I: &str = "Vector3i";

/// Component layout of each core value type
pub const CORE_VALUE_TYPES: [(&str, &[&str], &str); 6] = [
    (COLOR4F, &["r", "g", "b", "a"], "float"),
    (QUAT4F, &["x", "y", "z", "w"], "float"),
    (VECTOR2F, &["x", "y"], "float"),
    (VECTOR3F, &["x", "y", "z"], "float"),
    (VECTOR4F, &["x", "y", "z", "w"], "float"),
    (VECTOR3I, &["x", "y", "z"], "int"),
];

/// Class metadata of the core value types
///
/// Each has a public constructor producing the zero value.
#[must_use]
pub fn core_value_classes() -> Vec<ClassInfo> {
    CORE_VALUE_TYPES
        .iter()
        .map(|&(name, components, component_type)| {
            let id = ClassId::new(name);
            let zero = if component_type == "int" {
                Value::Int(0)
            } else {
                Value::Float(0.0)
            };
            let names: Vec<String> = components.iter().map(|c| (*c).to_string()).collect();
            let ctor_id = id.clone();
            let constructor = Constructor::public(move || {
                names.iter().fold(Object::new(ctor_id.clone()), |obj, c| {
                    obj.with(c.as_str(), zero.clone())
                })
            });
            components
                .iter()
                .fold(ClassInfo::new(id), |info, c| {
                    info.field(FieldInfo::new(*c, TypeDescriptor::class(component_type)))
                })
                .with_constructor(constructor)
        })
        .collect()
}

/// Standard container classes
#[must_use]
pub fn builtin_containers() -> Vec<ClassInfo> {
    vec![
        ClassInfo::container("List", ContainerShape::Sequence).abstract_class(),
        ClassInfo::container("ArrayList", ContainerShape::Sequence),
        ClassInfo::container("Set", ContainerShape::Set).abstract_class(),
        ClassInfo::container("HashSet", ContainerShape::Set),
        ClassInfo::container("Map", ContainerShape::Mapping).abstract_class(),
        ClassInfo::container("HashMap", ContainerShape::Mapping),
    ]
}

fn float_object(class: &str, components: &[(&str, f32)]) -> Value {
    let obj = components
        .iter()
        .fold(Object::new(ClassId::new(class)), |obj, &(name, v)| {
            obj.with(name, v.into())
        });
    Value::object(obj)
}

/// New `Vector3f` value
#[must_use]
pub fn vector3f(x: f32, y: f32, z: f32) -> Value {
    float_object(VECTOR3F, &[("x", x), ("y", y), ("z", z)])
}

/// New `Vector2f` value
#[must_use]
pub fn vector2f(x: f32, y: f32) -> Value {
    float_object(VECTOR2F, &[("x", x), ("y", y)])
}

/// New `Color4f` value
#[must_use]
pub fn color4f(r: f32, g: f32, b: f32, a: f32) -> Value {
    float_object(COLOR4F, &[("r", r), ("g", g), ("b", b), ("a", a)])
}

/// New `Vector3i` value
#[must_use]
pub fn vector3i(x: i32, y: i32, z: i32) -> Value {
    Value::object(
        Object::new(ClassId::new(VECTOR3I))
            .with("x", x.into())
            .with("y", y.into())
            .with("z", z.into()),
    )
}
