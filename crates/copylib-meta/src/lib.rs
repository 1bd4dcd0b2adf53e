//! copylib class metadata
//!
//! The explicit object model copy strategies operate on.
//!
//! # Core Concepts
//!
//! - [`ClassInfo`]: Declared shape of a class (fields, constructor, markers)
//! - [`TypeDescriptor`]: Possibly-generic declared type (`Map<String, Foo>`)
//! - [`TypeIntrospector`]: Collaborator trait the resolver queries
//! - [`ClassCatalog`]: In-memory introspector fed by explicit registration
//! - [`Value`]: Dynamic value; compound values are shared [`Ref`]s
//!
//! # Example
//!
//! ```
//! use copylib_meta::{ClassCatalog, ClassId, ClassInfo, FieldInfo, TypeDescriptor, TypeIntrospector};
//!
//! let catalog = ClassCatalog::with_core_types();
//! catalog.register(
//!     ClassInfo::new("game.Location")
//!         .mapped()
//!         .field(FieldInfo::new("position", TypeDescriptor::class("Vector3f")))
//!         .with_default_constructor(),
//! );
//!
//! let fields = catalog.fields(&ClassId::new("game.Location"));
//! assert_eq!(fields[0].name, "position");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod class;
pub mod core_types;
mod descriptor;
mod introspect;
mod value;

pub use class::{
    ClassId, ClassInfo, ClassKind, Constructor, ContainerShape, FieldInfo, TypeShape, Visibility,
};
pub use descriptor::{DescriptorError, TypeDescriptor, MAX_NESTING};
pub use introspect::{ClassCatalog, TypeIntrospector};
pub use value::{Object, Ref, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
