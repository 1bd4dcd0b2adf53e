//! copylib copy strategies
//!
//! Resolves declared types to strategies that produce independent copies of
//! values.
//!
//! # Core Concepts
//!
//! - [`CopyStrategy`]: Core trait, `copy(&Value) -> Value`
//! - [`CopyStrategyLibrary`]: Registry and resolver, memoizing per class
//! - [`ListCopyStrategy`], [`SetCopyStrategy`], [`MapCopyStrategy`]: Container shapes
//! - [`CompositeCopyStrategy`]: Generated field-by-field copy of mapped classes
//! - [`PassthroughStrategy`]: Default that returns the value unaltered
//! - [`ResolveIssue`]: Non-fatal problems reported during resolution
//!
//! # Example
//!
//! ```
//! use copylib_meta::{ClassCatalog, ClassInfo, FieldInfo, Object, TypeDescriptor, Value};
//! use copylib_meta::core_types::vector3f;
//! use copylib_strategy::{CopyStrategy, CopyStrategyLibrary};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ClassCatalog::with_core_types());
//! catalog.register(
//!     ClassInfo::new("game.Location")
//!         .mapped()
//!         .field(FieldInfo::new("position", TypeDescriptor::class("Vector3f")))
//!         .with_default_constructor(),
//! );
//!
//! let mut library = CopyStrategyLibrary::create(catalog);
//! let strategy = library.get_strategy(&"game.Location".parse::<TypeDescriptor>().unwrap());
//!
//! let original = Value::object(
//!     Object::new("game.Location".into()).with("position", vector3f(1.0, 2.0, 3.0)),
//! );
//! let copy = strategy.copy(&original);
//! assert!(copy.deep_eq(&original));
//! assert!(!copy.same_ref(&original));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod composite;
mod config;
mod containers;
mod diagnostics;
mod library;
mod shared;
mod strategy;
mod value_types;

pub use composite::{ClassMetadata, CompositeCopyStrategy, FieldMetadata};
pub use config::{ConfigError, LibraryConfig};
pub use containers::{ListCopyStrategy, MapCopyStrategy, SetCopyStrategy};
pub use diagnostics::{DiagnosticLog, ParameterSlot, ResolveIssue, ShapeDefect};
pub use library::CopyStrategyLibrary;
pub use shared::SharedCopyStrategyLibrary;
pub use strategy::{CopyStrategy, DeferredStrategy, PassthroughStrategy, StrategyRef};
pub use value_types::ValueTypeCopyStrategy;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
