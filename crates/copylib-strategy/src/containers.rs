//! Container copy strategies
//!
//! Each wraps the strategies of its type parameters and rebuilds a new
//! container of the same shape from copied contents.

use crate::strategy::{mismatched, CopyStrategy, StrategyRef};
use copylib_meta::{Ref, Value};
use indexmap::{IndexMap, IndexSet};

/// Copies an ordered sequence element by element, preserving order
#[derive(Debug, Clone)]
pub struct ListCopyStrategy {
    element: StrategyRef,
}

impl ListCopyStrategy {
    /// Wrap element strategy
    #[inline]
    #[must_use]
    pub fn new(element: StrategyRef) -> Self {
        Self { element }
    }

    /// Strategy applied to each element
    #[inline]
    #[must_use]
    pub fn element_strategy(&self) -> &StrategyRef {
        &self.element
    }
}

impl CopyStrategy for ListCopyStrategy {
    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::List(items) => {
                // Snapshot first; an element may alias the list itself.
                let items = items.read().clone();
                Value::list(items.iter().map(|v| self.element.copy(v)).collect())
            }
            other => mismatched(self.name(), other),
        }
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

/// Copies a set element by element
///
/// Copies that compare equal collapse into one element.
#[derive(Debug, Clone)]
pub struct SetCopyStrategy {
    element: StrategyRef,
}

impl SetCopyStrategy {
    /// Wrap element strategy
    #[inline]
    #[must_use]
    pub fn new(element: StrategyRef) -> Self {
        Self { element }
    }

    /// Strategy applied to each element
    #[inline]
    #[must_use]
    pub fn element_strategy(&self) -> &StrategyRef {
        &self.element
    }
}

impl CopyStrategy for SetCopyStrategy {
    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::Set(items) => {
                let items: Vec<Value> = items.read().iter().cloned().collect();
                let copied: IndexSet<Value> = items.iter().map(|v| self.element.copy(v)).collect();
                Value::Set(Ref::new(copied))
            }
            other => mismatched(self.name(), other),
        }
    }

    fn name(&self) -> &'static str {
        "set"
    }
}

/// Copies a mapping, copying keys and values independently
///
/// Associations are kept. A key copy that changes equality may collide with
/// another copied key; the later entry wins.
#[derive(Debug, Clone)]
pub struct MapCopyStrategy {
    key: StrategyRef,
    value: StrategyRef,
}

impl MapCopyStrategy {
    /// Wrap key and value strategies
    #[inline]
    #[must_use]
    pub fn new(key: StrategyRef, value: StrategyRef) -> Self {
        Self { key, value }
    }

    /// Strategy applied to keys
    #[inline]
    #[must_use]
    pub fn key_strategy(&self) -> &StrategyRef {
        &self.key
    }

    /// Strategy applied to values
    #[inline]
    #[must_use]
    pub fn value_strategy(&self) -> &StrategyRef {
        &self.value
    }
}

impl CopyStrategy for MapCopyStrategy {
    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::Map(entries) => {
                let entries: Vec<(Value, Value)> = entries
                    .read()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                let copied: IndexMap<Value, Value> = entries
                    .iter()
                    .map(|(k, v)| (self.key.copy(k), self.value.copy(v)))
                    .collect();
                Value::Map(Ref::new(copied))
            }
            other => mismatched(self.name(), other),
        }
    }

    fn name(&self) -> &'static str {
        "map"
    }
}
