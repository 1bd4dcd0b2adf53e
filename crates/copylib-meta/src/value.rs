//! Dynamic values
//!
//! Provides [`Value`], the runtime representation of anything a copy strategy
//! can be applied to. Compound values (objects and containers) live behind a
//! shared mutable [`Ref`], so two fields may alias the same instance, exactly
//! the situation deep copying exists to break.

use crate::class::ClassId;
use indexmap::{IndexMap, IndexSet};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared mutable reference with identity semantics
///
/// Equality and hashing use the address of the referenced cell, not its
/// contents.
pub struct Ref<T>(Arc<RwLock<T>>);

impl<T> Ref<T> {
    /// Allocate a new cell
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Borrow contents for reading
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Borrow contents for writing
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Whether both point at the same cell
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0).cast::<()>(), state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(inner) => inner.fmt(f),
            None => f.write_str("<locked>"),
        }
    }
}

/// Instance of a class: class identity plus named field values
#[derive(Debug, Clone)]
pub struct Object {
    class: ClassId,
    fields: IndexMap<String, Value>,
}

impl Object {
    /// Empty instance
    #[inline]
    #[must_use]
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            fields: IndexMap::new(),
        }
    }

    /// Set a field, builder style
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Instance class
    #[inline]
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Field value; unset fields read as null
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Write a field
    #[inline]
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Iterate set fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of set fields
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Dynamic value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point; compared and hashed by bit pattern
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Class instance
    Object(Ref<Object>),
    /// Ordered sequence
    List(Ref<Vec<Value>>),
    /// Set of unique elements
    Set(Ref<IndexSet<Value>>),
    /// Key-value mapping
    Map(Ref<IndexMap<Value, Value>>),
}

impl Value {
    /// String value
    #[inline]
    #[must_use]
    pub fn str(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }

    /// Wrap an object in a fresh reference
    #[inline]
    #[must_use]
    pub fn object(object: Object) -> Self {
        Self::Object(Ref::new(object))
    }

    /// Fresh list
    #[inline]
    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Ref::new(items))
    }

    /// Fresh set
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(Ref::new(items.into_iter().collect()))
    }

    /// Fresh map
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(Ref::new(entries.into_iter().collect()))
    }

    /// Check if value is null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as float
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Try to get as object reference
    #[must_use]
    pub fn as_object(&self) -> Option<&Ref<Object>> {
        match self {
            Self::Object(r) => Some(r),
            _ => None,
        }
    }

    /// Try to get as list reference
    #[must_use]
    pub fn as_list(&self) -> Option<&Ref<Vec<Value>>> {
        match self {
            Self::List(r) => Some(r),
            _ => None,
        }
    }

    /// Short variant name for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Object(_) => "object",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    /// Whether the value lives behind a shared reference
    #[inline]
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::Object(_) | Self::List(_) | Self::Set(_) | Self::Map(_)
        )
    }

    /// Identity comparison: same cell for references, equal for scalars
    #[inline]
    #[must_use]
    pub fn same_ref(&self, other: &Self) -> bool {
        self == other
    }

    /// Structural comparison, following references
    ///
    /// Does not terminate on cyclic value graphs.
    #[must_use]
    pub fn deep_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.class == b.class
                    && a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .all(|(name, v)| b.fields.get(name).is_some_and(|w| v.deep_eq(w)))
            }
            (Self::List(a), Self::List(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(v, w)| v.deep_eq(w))
            }
            (Self::Set(a), Self::Set(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len() && a.iter().all(|v| b.iter().any(|w| v.deep_eq(w)))
            }
            (Self::Map(a), Self::Map(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter()
                            .any(|(k2, v2)| k.deep_eq(k2) && v.deep_eq(v2))
                    })
            }
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Str(v) => v.hash(state),
            Self::Object(r) => r.hash(state),
            Self::List(r) => r.hash(state),
            Self::Set(r) => r.hash(state),
            Self::Map(r) => r.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::str(v)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::object(object)
    }
}
