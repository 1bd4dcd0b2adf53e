//! Class metadata
//!
//! Provides [`ClassId`] and [`ClassInfo`], the explicit description of a class
//! that stands in for runtime reflection: nesting kind, abstractness, the
//! mapped-container marker, the container abstraction it implements, its
//! fields and its no-argument constructor.

use crate::descriptor::TypeDescriptor;
use crate::value::Object;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Identity of a concrete class
///
/// Cheap to clone; two ids are equal when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(Arc<str>);

impl ClassId {
    /// Create class id from name
    #[inline]
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Fully qualified class name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Last segment of a dotted name
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Where a class is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassKind {
    /// Top-level class
    #[default]
    TopLevel,

    /// Static nested class (no enclosing instance)
    StaticMember,

    /// Non-static inner class (needs an enclosing instance)
    InnerMember,

    /// Class declared inside a function body
    Local,
}

/// Container abstraction a class implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerShape {
    /// Ordered sequence, one type parameter
    Sequence,

    /// Unique elements, one type parameter
    Set,

    /// Key-value mapping, two type parameters
    Mapping,
}

/// Structural classification used by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// Ordered sequence container
    Sequence,

    /// Set container
    Set,

    /// Key-value mapping container
    Mapping,

    /// Plain data class marked for field-by-field copying
    Composite,

    /// Anything else
    Opaque,
}

impl From<ContainerShape> for TypeShape {
    fn from(shape: ContainerShape) -> Self {
        match shape {
            ContainerShape::Sequence => Self::Sequence,
            ContainerShape::Set => Self::Set,
            ContainerShape::Mapping => Self::Mapping,
        }
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Accessible from anywhere
    #[default]
    Public,

    /// Not accessible to the copy library
    Private,
}

/// No-argument constructor of a class
#[derive(Clone)]
pub struct Constructor {
    visibility: Visibility,
    factory: Arc<dyn Fn() -> Object + Send + Sync>,
}

impl Constructor {
    /// Public no-argument constructor
    #[must_use]
    pub fn public<F>(factory: F) -> Self
    where
        F: Fn() -> Object + Send + Sync + 'static,
    {
        Self {
            visibility: Visibility::Public,
            factory: Arc::new(factory),
        }
    }

    /// Private no-argument constructor
    #[must_use]
    pub fn private<F>(factory: F) -> Self
    where
        F: Fn() -> Object + Send + Sync + 'static,
    {
        Self {
            visibility: Visibility::Private,
            factory: Arc::new(factory),
        }
    }

    /// Constructor that yields an object of `class` with no field set
    /// (unset fields read as null)
    #[must_use]
    pub fn empty(class: ClassId) -> Self {
        Self::public(move || Object::new(class.clone()))
    }

    /// Constructor visibility
    #[inline]
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the copy library may call this constructor
    #[inline]
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Create a fresh instance
    #[inline]
    #[must_use]
    pub fn invoke(&self) -> Object {
        (self.factory)()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Declared field of a class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,

    /// Declared (possibly generic) type
    pub ty: TypeDescriptor,

    /// Class-level field, not part of an instance
    pub is_static: bool,

    /// Excluded from copying and serialization
    pub is_transient: bool,
}

impl FieldInfo {
    /// Create instance field
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_transient: false,
        }
    }

    /// Mark as static
    #[inline]
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as transient
    #[inline]
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    /// Whether the field belongs to instances and takes part in copying
    #[inline]
    #[must_use]
    pub fn is_instance_field(&self) -> bool {
        !self.is_static && !self.is_transient
    }
}

/// Class metadata
///
/// Built with a fluent API:
///
/// ```
/// use copylib_meta::{ClassInfo, FieldInfo, TypeDescriptor};
///
/// let info = ClassInfo::new("game.Health")
///     .mapped()
///     .field(FieldInfo::new("current", TypeDescriptor::class("int")))
///     .field(FieldInfo::new("max", TypeDescriptor::class("int")))
///     .with_default_constructor();
///
/// assert_eq!(info.fields.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Class identity
    pub id: ClassId,

    /// Declaration site
    pub kind: ClassKind,

    /// Cannot be instantiated directly
    pub is_abstract: bool,

    /// Carries the mapped-container marker
    pub mapped: bool,

    /// Container abstraction implemented, if any
    pub container: Option<ContainerShape>,

    /// Direct superclass
    pub superclass: Option<ClassId>,

    /// Fields declared on this class (not inherited ones)
    pub fields: Vec<FieldInfo>,

    /// No-argument constructor, if declared
    pub constructor: Option<Constructor>,
}

impl ClassInfo {
    /// Create top-level concrete class with no fields
    #[must_use]
    pub fn new(id: impl Into<ClassId>) -> Self {
        Self {
            id: id.into(),
            kind: ClassKind::TopLevel,
            is_abstract: false,
            mapped: false,
            container: None,
            superclass: None,
            fields: Vec::new(),
            constructor: None,
        }
    }

    /// Container class of the given shape
    #[must_use]
    pub fn container(id: impl Into<ClassId>, shape: ContainerShape) -> Self {
        let mut info = Self::new(id);
        info.container = Some(shape);
        info
    }

    /// Set declaration kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark abstract
    #[inline]
    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add the mapped-container marker
    #[inline]
    #[must_use]
    pub fn mapped(mut self) -> Self {
        self.mapped = true;
        self
    }

    /// Set superclass
    #[inline]
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<ClassId>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Declare a field
    #[inline]
    #[must_use]
    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Set constructor
    #[inline]
    #[must_use]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Public constructor producing an empty instance of this class
    #[inline]
    #[must_use]
    pub fn with_default_constructor(self) -> Self {
        let constructor = Constructor::empty(self.id.clone());
        self.with_constructor(constructor)
    }

    /// Structural classification from this class's own declaration
    ///
    /// Container abstraction wins over the mapped marker. Inherited
    /// container shapes are resolved by
    /// [`TypeIntrospector::type_shape`](crate::TypeIntrospector::type_shape).
    #[must_use]
    pub fn shape(&self) -> TypeShape {
        match self.container {
            Some(shape) => shape.into(),
            None if self.mapped => TypeShape::Composite,
            None => TypeShape::Opaque,
        }
    }
}
