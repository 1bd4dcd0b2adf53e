//! Type introspection
//!
//! Provides the [`TypeIntrospector`] trait, the only collaborator the copy
//! strategy resolver needs, and [`ClassCatalog`], an in-memory implementation
//! populated by explicit class registration.

use crate::class::{ClassId, ClassInfo, Constructor, ContainerShape, FieldInfo, TypeShape};
use crate::core_types;
use crate::descriptor::TypeDescriptor;
use dashmap::DashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Structural introspection over classes and generic types
///
/// Only [`class_info`](Self::class_info) is required; the remaining
/// operations derive from it and from the descriptor itself.
pub trait TypeIntrospector: Send + Sync + fmt::Debug {
    /// Metadata for a class, `None` when the class is unknown
    fn class_info(&self, class: &ClassId) -> Option<Arc<ClassInfo>>;

    /// Raw class of a descriptor, `None` when it cannot be determined
    fn raw_class(&self, ty: &TypeDescriptor) -> Option<ClassId> {
        ty.raw_class().cloned()
    }

    /// Generic argument at `index`, `None` when absent
    fn type_parameter(&self, ty: &TypeDescriptor, index: usize) -> Option<TypeDescriptor> {
        ty.type_argument(index).cloned()
    }

    /// Declared and inherited instance fields
    ///
    /// Superclass fields come first. Static and transient fields are
    /// skipped. A field redeclared in a subclass replaces the inherited one
    /// in place.
    fn fields(&self, class: &ClassId) -> Vec<FieldInfo> {
        let mut fields: Vec<FieldInfo> = Vec::new();
        for info in superclass_chain(self, class).iter().rev() {
            for field in info.fields.iter().filter(|f| f.is_instance_field()) {
                match fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field.clone(),
                    None => fields.push(field.clone()),
                }
            }
        }
        fields
    }

    /// Container abstraction the class is assignable to
    ///
    /// The nearest declaration along the superclass chain wins.
    fn container_shape(&self, class: &ClassId) -> Option<ContainerShape> {
        superclass_chain(self, class)
            .iter()
            .find_map(|info| info.container)
    }

    /// Structural classification driving strategy resolution
    ///
    /// An inherited container shape wins over the class's own mapped
    /// marker. Unknown classes are [`TypeShape::Opaque`].
    fn type_shape(&self, class: &ClassId) -> TypeShape {
        match self.container_shape(class) {
            Some(shape) => shape.into(),
            None => self
                .class_info(class)
                .map_or(TypeShape::Opaque, |info| info.shape()),
        }
    }

    /// Accessible no-argument constructor
    fn default_constructor(&self, class: &ClassId) -> Option<Constructor> {
        self.class_info(class)?
            .constructor
            .clone()
            .filter(Constructor::is_accessible)
    }
}

/// The class followed by its known superclasses, nearest first
///
/// Stops at the first unknown class or at a repeated one.
fn superclass_chain<I>(introspector: &I, class: &ClassId) -> Vec<Arc<ClassInfo>>
where
    I: TypeIntrospector + ?Sized,
{
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut next = Some(class.clone());
    while let Some(id) = next.take() {
        if !seen.insert(id.clone()) {
            break;
        }
        let Some(info) = introspector.class_info(&id) else {
            break;
        };
        next = info.superclass.clone();
        chain.push(info);
    }
    chain
}

/// In-memory class catalog
///
/// Thread-safe; classes can be registered through a shared reference.
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: DashMap<ClassId, Arc<ClassInfo>>,
}

impl ClassCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in container classes and the core
    /// value types
    #[must_use]
    pub fn with_core_types() -> Self {
        let catalog = Self::new();
        for info in core_types::builtin_containers() {
            catalog.register(info);
        }
        for info in core_types::core_value_classes() {
            catalog.register(info);
        }
        catalog
    }

    /// Register class metadata, returning the previous entry
    pub fn register(&self, info: ClassInfo) -> Option<Arc<ClassInfo>> {
        self.classes.insert(info.id.clone(), Arc::new(info))
    }

    /// Check if class is known
    #[inline]
    #[must_use]
    pub fn contains(&self, class: &ClassId) -> bool {
        self.classes.contains_key(class)
    }

    /// Get number of registered classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeIntrospector for ClassCatalog {
    fn class_info(&self, class: &ClassId) -> Option<Arc<ClassInfo>> {
        self.classes.get(class).map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use pretty_assertions::assert_eq;

    fn int() -> TypeDescriptor {
        TypeDescriptor::class("int")
    }

    fn names(fields: &[FieldInfo]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn inherited_fields_come_first() {
        let catalog = ClassCatalog::new();
        catalog.register(ClassInfo::new("Base").field(FieldInfo::new("id", int())));
        catalog.register(
            ClassInfo::new("Derived")
                .extends("Base")
                .field(FieldInfo::new("extra", int())),
        );

        let fields = catalog.fields(&ClassId::new("Derived"));
        assert_eq!(names(&fields), vec!["id", "extra"]);
    }

    #[test]
    fn static_and_transient_fields_skipped() {
        let catalog = ClassCatalog::new();
        catalog.register(
            ClassInfo::new("A")
                .field(FieldInfo::new("kept", int()))
                .field(FieldInfo::new("shared", int()).static_field())
                .field(FieldInfo::new("cache", int()).transient()),
        );
        assert_eq!(names(&catalog.fields(&ClassId::new("A"))), vec!["kept"]);
    }

    #[test]
    fn redeclared_field_replaces_inherited() {
        let catalog = ClassCatalog::new();
        catalog.register(ClassInfo::new("Base").field(FieldInfo::new("v", int())));
        catalog.register(
            ClassInfo::new("Derived")
                .extends("Base")
                .field(FieldInfo::new("v", TypeDescriptor::class("String"))),
        );

        let fields = catalog.fields(&ClassId::new("Derived"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].ty, TypeDescriptor::class("String"));
    }

    #[test]
    fn superclass_cycle_terminates() {
        let catalog = ClassCatalog::new();
        catalog.register(ClassInfo::new("A").extends("B").field(FieldInfo::new("a", int())));
        catalog.register(ClassInfo::new("B").extends("A").field(FieldInfo::new("b", int())));
        assert_eq!(catalog.fields(&ClassId::new("A")).len(), 2);
    }

    #[test]
    fn private_constructor_is_not_default() {
        let catalog = ClassCatalog::new();
        catalog.register(
            ClassInfo::new("Hidden")
                .with_constructor(Constructor::private(|| Object::new(ClassId::new("Hidden")))),
        );
        catalog.register(ClassInfo::new("Open").with_default_constructor());

        assert!(catalog.default_constructor(&ClassId::new("Hidden")).is_none());
        assert!(catalog.default_constructor(&ClassId::new("Open")).is_some());
        assert!(catalog.default_constructor(&ClassId::new("Unknown")).is_none());
    }

    #[test]
    fn core_catalog_knows_containers() {
        let catalog = ClassCatalog::with_core_types();
        let list = catalog.class_info(&ClassId::new("ArrayList")).unwrap();
        assert_eq!(list.container, Some(ContainerShape::Sequence));
        assert!(catalog.contains(&ClassId::new(core_types::VECTOR3F)));
    }

    #[test]
    fn register_returns_previous() {
        let catalog = ClassCatalog::new();
        assert!(catalog.register(ClassInfo::new("A")).is_none());
        assert!(catalog.register(ClassInfo::new("A").mapped()).is_some());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.class_info(&ClassId::new("A")).unwrap().mapped);
    }

    #[test]
    fn container_shape_inherited() {
        let catalog = ClassCatalog::with_core_types();
        catalog.register(ClassInfo::new("game.Path").extends("ArrayList"));
        catalog.register(ClassInfo::new("game.ShortPath").extends("game.Path").mapped());

        assert_eq!(
            catalog.container_shape(&ClassId::new("game.ShortPath")),
            Some(ContainerShape::Sequence)
        );
        assert_eq!(
            catalog.type_shape(&ClassId::new("game.ShortPath")),
            TypeShape::Sequence
        );
        assert_eq!(
            catalog.type_shape(&ClassId::new("HashMap")),
            TypeShape::Mapping
        );
    }

    #[test]
    fn type_shape_of_plain_classes() {
        let catalog = ClassCatalog::new();
        catalog.register(ClassInfo::new("Base"));
        catalog.register(ClassInfo::new("Data").extends("Base").mapped());

        assert_eq!(catalog.type_shape(&ClassId::new("Data")), TypeShape::Composite);
        assert_eq!(catalog.type_shape(&ClassId::new("Base")), TypeShape::Opaque);
        assert_eq!(catalog.type_shape(&ClassId::new("Missing")), TypeShape::Opaque);
        assert_eq!(catalog.container_shape(&ClassId::new("Data")), None);
    }
}
