//! Copy strategy for small fixed-layout value types
//!
//! Vectors, quaternions and colors: a new instance with the same components.

use crate::strategy::{mismatched, CopyStrategy};
use copylib_meta::{ClassId, Value};

/// Copies a core value type component-wise
#[derive(Debug, Clone)]
pub struct ValueTypeCopyStrategy {
    class: ClassId,
}

impl ValueTypeCopyStrategy {
    /// Create strategy for `class`
    #[inline]
    #[must_use]
    pub fn new(class: ClassId) -> Self {
        Self { class }
    }

    /// Class this strategy copies
    #[inline]
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }
}

impl CopyStrategy for ValueTypeCopyStrategy {
    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::Object(object) => {
                let copy = object.read().clone();
                if copy.class() != &self.class {
                    tracing::debug!(
                        "{} strategy copying instance of {}",
                        self.class,
                        copy.class()
                    );
                }
                Value::object(copy)
            }
            other => mismatched(self.name(), other),
        }
    }

    fn name(&self) -> &'static str {
        "value_type"
    }
}
