//! Generated strategies for mapped classes
//!
//! A mapped class is copied by constructing a fresh instance through its
//! no-argument constructor and filling every field with a copy of the source
//! field, each field using its own resolved strategy.

use crate::strategy::{mismatched, CopyStrategy, StrategyRef};
use copylib_meta::{ClassId, Constructor, Object, TypeDescriptor, Value};

/// Copy metadata for one field
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    name: String,
    ty: TypeDescriptor,
    copy_strategy: StrategyRef,
}

impl FieldMetadata {
    /// Create field metadata
    #[inline]
    #[must_use]
    pub fn new(name: String, ty: TypeDescriptor, copy_strategy: StrategyRef) -> Self {
        Self {
            name,
            ty,
            copy_strategy,
        }
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Strategy used for this field
    #[inline]
    #[must_use]
    pub fn copy_strategy(&self) -> &StrategyRef {
        &self.copy_strategy
    }

    /// Read this field from an instance
    #[inline]
    #[must_use]
    pub fn value(&self, object: &Object) -> Value {
        object.get(&self.name)
    }

    /// Write this field on an instance
    #[inline]
    pub fn set_value(&self, object: &mut Object, value: Value) {
        object.set(self.name.clone(), value);
    }
}

/// Copy metadata for a mapped class
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    class: ClassId,
    constructor: Constructor,
    fields: Vec<FieldMetadata>,
}

impl ClassMetadata {
    /// Create class metadata
    #[inline]
    #[must_use]
    pub fn new(class: ClassId, constructor: Constructor, fields: Vec<FieldMetadata>) -> Self {
        Self {
            class,
            constructor,
            fields,
        }
    }

    /// Described class
    #[inline]
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Copyable fields, superclass fields first
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fresh instance from the no-argument constructor
    #[inline]
    #[must_use]
    pub fn new_instance(&self) -> Object {
        self.constructor.invoke()
    }
}

/// Field-by-field copy of a mapped class
#[derive(Debug, Clone)]
pub struct CompositeCopyStrategy {
    metadata: ClassMetadata,
}

impl CompositeCopyStrategy {
    /// Create strategy from class metadata
    #[inline]
    #[must_use]
    pub fn new(metadata: ClassMetadata) -> Self {
        Self { metadata }
    }

    /// Underlying class metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &ClassMetadata {
        &self.metadata
    }
}

impl CopyStrategy for CompositeCopyStrategy {
    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::Object(source) => {
                let source = source.read().clone();
                let mut result = self.metadata.new_instance();
                for field in &self.metadata.fields {
                    let copied = field.copy_strategy.copy(&field.value(&source));
                    field.set_value(&mut result, copied);
                }
                Value::object(result)
            }
            other => mismatched(self.name(), other),
        }
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PassthroughStrategy;
    use std::sync::Arc;

    fn metadata() -> ClassMetadata {
        let class = ClassId::new("Tag");
        let passthrough: StrategyRef = Arc::new(PassthroughStrategy);
        ClassMetadata::new(
            class.clone(),
            Constructor::empty(class),
            vec![
                FieldMetadata::new(
                    "label".into(),
                    TypeDescriptor::class("String"),
                    passthrough.clone(),
                ),
                FieldMetadata::new("weight".into(), TypeDescriptor::class("int"), passthrough),
            ],
        )
    }

    #[test]
    fn copies_every_field() {
        let strategy = CompositeCopyStrategy::new(metadata());
        let original = Value::object(
            Object::new(ClassId::new("Tag"))
                .with("label", Value::str("stone"))
                .with("weight", Value::Int(3)),
        );

        let copy = strategy.copy(&original);
        assert!(!copy.same_ref(&original));
        assert!(copy.deep_eq(&original));
    }

    #[test]
    fn unset_fields_copy_as_null() {
        let strategy = CompositeCopyStrategy::new(metadata());
        let original = Value::object(Object::new(ClassId::new("Tag")).with("weight", Value::Int(1)));

        let copy = strategy.copy(&original);
        let copy = copy.as_object().unwrap().read();
        assert!(copy.get("label").is_null());
        assert_eq!(copy.get("weight"), Value::Int(1));
    }

    #[test]
    fn undeclared_fields_are_dropped() {
        let strategy = CompositeCopyStrategy::new(metadata());
        let original = Value::object(
            Object::new(ClassId::new("Tag"))
                .with("weight", Value::Int(1))
                .with("scratch", Value::Int(99)),
        );

        let copy = strategy.copy(&original);
        assert!(copy.as_object().unwrap().read().get("scratch").is_null());
    }

    #[test]
    fn metadata_lookup() {
        let meta = metadata();
        assert_eq!(meta.class(), &ClassId::new("Tag"));
        assert_eq!(meta.fields().len(), 2);
        assert!(meta.field("label").is_some());
        assert!(meta.field("missing").is_none());
        assert_eq!(meta.new_instance().field_count(), 0);
    }
}
