//! Copy strategy library
//!
//! Provides [`CopyStrategyLibrary`], which maps declared types to copy
//! strategies. The library starts with strategies for a number of core types;
//! as strategies are requested for other types, new ones are generated.
//!
//! # Resolution order
//! 1. Descriptor without a raw class → passthrough (reported)
//! 2. Sequence container, including subclasses of one → [`ListCopyStrategy`]
//!    over the element strategy
//! 3. Set container → [`SetCopyStrategy`] over the element strategy
//! 4. Mapping container → [`MapCopyStrategy`] over key and value strategies
//! 5. Registered class → the registered strategy
//! 6. Mapped class → generated [`CompositeCopyStrategy`], or passthrough
//!    (reported) if the class cannot be instantiated
//! 7. Anything else → passthrough, remembered for the class
//!
//! A missing container type argument falls back to passthrough for that slot.
//! Container strategies are rebuilt on every call; only raw classes are
//! cached.

use crate::composite::{ClassMetadata, CompositeCopyStrategy, FieldMetadata};
use crate::config::LibraryConfig;
use crate::containers::{ListCopyStrategy, MapCopyStrategy, SetCopyStrategy};
use crate::diagnostics::{DiagnosticLog, ParameterSlot, ResolveIssue, ShapeDefect};
use crate::strategy::{
    CopyStrategy, DeferredStrategy, PassthroughStrategy, StrategyRef, StrategyTable,
};
use crate::value_types::ValueTypeCopyStrategy;
use copylib_meta::core_types::CORE_VALUE_TYPES;
use copylib_meta::{
    ClassId, ClassInfo, ClassKind, TypeDescriptor, TypeIntrospector, TypeShape, Value,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry and resolver of copy strategies
///
/// Resolution memoizes into the registry, so [`get_strategy`](Self::get_strategy)
/// takes `&mut self`. For use from several threads, wrap the library in a
/// [`SharedCopyStrategyLibrary`](crate::SharedCopyStrategyLibrary) or give
/// each thread its own [`fork`](Self::fork).
#[derive(Debug)]
pub struct CopyStrategyLibrary {
    strategies: Arc<StrategyTable>,
    in_progress: HashMap<ClassId, Arc<DeferredStrategy>>,
    default_strategy: StrategyRef,
    introspector: Arc<dyn TypeIntrospector>,
    diagnostics: Arc<DiagnosticLog>,
    config: LibraryConfig,
}

impl CopyStrategyLibrary {
    /// Create new empty library
    #[must_use]
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self::with_config(introspector, LibraryConfig::default())
    }

    /// Create new empty library with configuration
    #[must_use]
    pub fn with_config(introspector: Arc<dyn TypeIntrospector>, config: LibraryConfig) -> Self {
        Self {
            strategies: Arc::default(),
            in_progress: HashMap::new(),
            default_strategy: Arc::new(PassthroughStrategy),
            introspector,
            diagnostics: Arc::new(DiagnosticLog::new(config.max_diagnostics)),
            config,
        }
    }

    /// Create library populated with the core value types
    #[must_use]
    pub fn create(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self::create_with_config(introspector, LibraryConfig::default())
    }

    /// Create library populated with the core value types, with configuration
    #[must_use]
    pub fn create_with_config(
        introspector: Arc<dyn TypeIntrospector>,
        config: LibraryConfig,
    ) -> Self {
        let mut library = Self::with_config(introspector, config);
        for (name, _, _) in CORE_VALUE_TYPES {
            let class = ClassId::new(name);
            library.register(class.clone(), Arc::new(ValueTypeCopyStrategy::new(class)));
        }
        library
    }

    /// Register the strategy for a class, replacing any previous one
    pub fn register(&mut self, class: impl Into<ClassId>, strategy: StrategyRef) {
        let class = class.into();
        tracing::trace!("Registering {} copy strategy for {}", strategy.name(), class);
        self.strategies.write().insert(class, strategy);
    }

    /// Check if a strategy is registered or cached for a class
    #[inline]
    #[must_use]
    pub fn contains(&self, class: &ClassId) -> bool {
        self.strategies.read().contains_key(class)
    }

    /// Get number of registered and cached strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.read().len()
    }

    /// Check if library is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.read().is_empty()
    }

    /// The passthrough strategy this library falls back to
    #[inline]
    #[must_use]
    pub fn default_strategy(&self) -> StrategyRef {
        Arc::clone(&self.default_strategy)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Introspector used for resolution
    #[inline]
    #[must_use]
    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.introspector
    }

    /// Diagnostic log, shared with forks
    #[inline]
    #[must_use]
    pub fn diagnostic_log(&self) -> &Arc<DiagnosticLog> {
        &self.diagnostics
    }

    /// Snapshot of reported issues
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ResolveIssue> {
        self.diagnostics.entries()
    }

    /// Remove and return reported issues
    pub fn take_diagnostics(&self) -> Vec<ResolveIssue> {
        self.diagnostics.drain()
    }

    /// Independent library seeded with this one's strategies
    ///
    /// Strategies, introspector and diagnostic log are shared; later
    /// registrations and cache entries are not. Cycle placeholders inside
    /// strategies generated before the fork keep following this library's
    /// entries.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            strategies: Arc::new(RwLock::new(self.strategies.read().clone())),
            in_progress: HashMap::new(),
            default_strategy: Arc::clone(&self.default_strategy),
            introspector: Arc::clone(&self.introspector),
            diagnostics: Arc::clone(&self.diagnostics),
            config: self.config.clone(),
        }
    }

    /// Resolve the copy strategy for a declared type
    ///
    /// Never fails; problems are reported to the diagnostic log and resolve
    /// to the passthrough strategy.
    pub fn get_strategy(&mut self, ty: &TypeDescriptor) -> StrategyRef {
        let Some(class) = self.introspector.raw_class(ty) else {
            self.diagnostics.record(ResolveIssue::UnresolvableType {
                descriptor: ty.clone(),
            });
            return self.default_strategy();
        };

        let shape = self.introspector.type_shape(&class);
        match shape {
            TypeShape::Sequence => {
                let element = self.parameter_strategy(ty, &class, 0, ParameterSlot::Element);
                return Arc::new(ListCopyStrategy::new(element));
            }
            TypeShape::Set => {
                let element = self.parameter_strategy(ty, &class, 0, ParameterSlot::Element);
                return Arc::new(SetCopyStrategy::new(element));
            }
            TypeShape::Mapping => {
                let key = self.parameter_strategy(ty, &class, 0, ParameterSlot::Key);
                let value = self.parameter_strategy(ty, &class, 1, ParameterSlot::Value);
                return Arc::new(MapCopyStrategy::new(key, value));
            }
            TypeShape::Composite | TypeShape::Opaque => {}
        }

        let registered = self.strategies.read().get(&class).cloned();
        if let Some(strategy) = registered {
            return strategy;
        }

        if shape == TypeShape::Composite {
            if let Some(info) = self.introspector.class_info(&class) {
                return self.mapped_strategy(&class, &info);
            }
        }

        tracing::debug!("Using default copy strategy for {}", class);
        let strategy = self.default_strategy();
        if self.config.cache_unknown_types {
            self.strategies.write().insert(class, Arc::clone(&strategy));
        }
        strategy
    }

    /// Resolve and apply in one step
    pub fn copy(&mut self, ty: &TypeDescriptor, value: &Value) -> Value {
        self.get_strategy(ty).copy(value)
    }

    fn parameter_strategy(
        &mut self,
        ty: &TypeDescriptor,
        container: &ClassId,
        index: usize,
        slot: ParameterSlot,
    ) -> StrategyRef {
        match self.introspector.type_parameter(ty, index) {
            Some(parameter) => self.get_strategy(&parameter),
            None => {
                self.diagnostics.record(ResolveIssue::MissingTypeParameter {
                    container: container.clone(),
                    slot,
                });
                self.default_strategy()
            }
        }
    }

    fn mapped_strategy(&mut self, class: &ClassId, info: &ClassInfo) -> StrategyRef {
        if let Some(pending) = self.in_progress.get(class) {
            tracing::trace!("{} refers back to itself, deferring", class);
            return Arc::clone(pending) as StrategyRef;
        }

        let defect = if info.is_abstract {
            Some(ShapeDefect::Abstract)
        } else {
            match info.kind {
                ClassKind::Local => Some(ShapeDefect::LocalClass),
                ClassKind::InnerMember => Some(ShapeDefect::InnerClass),
                ClassKind::TopLevel | ClassKind::StaticMember => None,
            }
        };
        if let Some(defect) = defect {
            self.diagnostics.record(ResolveIssue::InvalidMappedClass {
                class: class.clone(),
                defect,
            });
            return self.failed_composite(class);
        }

        let Some(constructor) = self.introspector.default_constructor(class) else {
            self.diagnostics.record(ResolveIssue::NoDefaultConstructor {
                class: class.clone(),
            });
            return self.failed_composite(class);
        };

        let deferred = Arc::new(DeferredStrategy::new(
            class.clone(),
            &self.strategies,
            Arc::clone(&self.diagnostics),
        ));
        self.in_progress.insert(class.clone(), Arc::clone(&deferred));

        let fields: Vec<FieldMetadata> = self
            .introspector
            .fields(class)
            .into_iter()
            .map(|field| {
                let strategy = self.get_strategy(&field.ty);
                tracing::trace!("{}.{} copies with {}", class, field.name, strategy.name());
                FieldMetadata::new(field.name, field.ty, strategy)
            })
            .collect();

        self.in_progress.remove(class);

        let metadata = ClassMetadata::new(class.clone(), constructor, fields);
        let strategy: StrategyRef = Arc::new(CompositeCopyStrategy::new(metadata));
        deferred.bind(&strategy);

        if self.config.cache_generated_composites {
            self.strategies
                .write()
                .insert(class.clone(), Arc::clone(&strategy));
        }
        strategy
    }

    fn failed_composite(&mut self, class: &ClassId) -> StrategyRef {
        let strategy = self.default_strategy();
        if self.config.cache_failed_composites {
            self.strategies
                .write()
                .insert(class.clone(), Arc::clone(&strategy));
        }
        strategy
    }
}
