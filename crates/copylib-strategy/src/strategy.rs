//! Copy strategy trait and core strategies
//!
//! Provides the [`CopyStrategy`] trait along with the passthrough default and
//! the deferred strategy used to break cycles in self-referential classes.

use crate::diagnostics::{DiagnosticLog, ResolveIssue};
use copylib_meta::{ClassId, Value};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Weak};

/// Produces an independent copy of values of one type
///
/// # Contract
/// - `copy()` must not mutate its input
/// - The result must not share the top-level reference of the input, unless
///   the strategy is the passthrough default
/// - `Null` copies to `Null`
pub trait CopyStrategy: Send + Sync + Debug {
    /// Copy a value
    fn copy(&self, value: &Value) -> Value;

    /// Strategy name (for debugging)
    fn name(&self) -> &'static str;
}

/// Shared handle to a strategy
pub type StrategyRef = Arc<dyn CopyStrategy>;

/// Registered and cached strategies of one library, keyed by class
pub(crate) type StrategyTable = RwLock<HashMap<ClassId, StrategyRef>>;

/// Returns the value unaltered
///
/// Used whenever no copy rule applies. Reference values come back as the
/// same reference, so callers must tolerate sharing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughStrategy;

impl CopyStrategy for PassthroughStrategy {
    #[inline]
    fn copy(&self, value: &Value) -> Value {
        value.clone()
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Stand-in for a strategy that is still being generated
///
/// Handed out when a class is requested again while its own composite
/// strategy is under construction. Each copy delegates to the strategy the
/// owning library currently holds for the class, so a later registration
/// replaces the generated composite here too. When the library holds none
/// (composite caching off), the composite bound at the end of generation is
/// used.
///
/// Only weak links are kept, so a composite that reaches itself through its
/// fields does not keep itself alive. If every target is gone, the copy is
/// reported as [`ResolveIssue::ReleasedStrategy`] and the value returned as
/// is.
#[derive(Debug)]
pub struct DeferredStrategy {
    class: ClassId,
    table: Weak<StrategyTable>,
    diagnostics: Arc<DiagnosticLog>,
    target: OnceCell<Weak<dyn CopyStrategy>>,
}

impl DeferredStrategy {
    /// Create unbound placeholder for `class`, looked up in `table`
    #[must_use]
    pub(crate) fn new(
        class: ClassId,
        table: &Arc<StrategyTable>,
        diagnostics: Arc<DiagnosticLog>,
    ) -> Self {
        Self {
            class,
            table: Arc::downgrade(table),
            diagnostics,
            target: OnceCell::new(),
        }
    }

    /// Class whose strategy this stands for
    #[inline]
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Bind the finished strategy
    ///
    /// Returns `false` if already bound.
    pub fn bind(&self, strategy: &StrategyRef) -> bool {
        self.target.set(Arc::downgrade(strategy)).is_ok()
    }

    /// Check if a target has been bound
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.target.get().is_some()
    }

    /// Strategy copies currently delegate to
    #[must_use]
    pub fn current(&self) -> Option<StrategyRef> {
        let registered = self
            .table
            .upgrade()
            .and_then(|table| table.read().get(&self.class).cloned());
        registered.or_else(|| self.target.get().and_then(Weak::upgrade))
    }
}

impl CopyStrategy for DeferredStrategy {
    fn copy(&self, value: &Value) -> Value {
        match self.current() {
            Some(strategy) => strategy.copy(value),
            None => {
                self.diagnostics.record(ResolveIssue::ReleasedStrategy {
                    class: self.class.clone(),
                });
                value.clone()
            }
        }
    }

    fn name(&self) -> &'static str {
        "deferred"
    }
}

/// Fallback for a value whose variant does not match the strategy
pub(crate) fn mismatched(strategy: &str, value: &Value) -> Value {
    tracing::debug!(
        "{} strategy received {} value, returning it as is",
        strategy,
        value.kind_name()
    );
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use copylib_meta::Object;

    #[derive(Debug)]
    struct Doubling;

    impl CopyStrategy for Doubling {
        fn copy(&self, value: &Value) -> Value {
            match value {
                Value::Int(v) => Value::Int(v * 2),
                other => other.clone(),
            }
        }

        fn name(&self) -> &'static str {
            "doubling"
        }
    }

    #[derive(Debug)]
    struct Negating;

    impl CopyStrategy for Negating {
        fn copy(&self, value: &Value) -> Value {
            match value {
                Value::Int(v) => Value::Int(-v),
                other => other.clone(),
            }
        }

        fn name(&self) -> &'static str {
            "negating"
        }
    }

    fn deferred() -> (Arc<StrategyTable>, Arc<DiagnosticLog>, DeferredStrategy) {
        let table = Arc::new(StrategyTable::default());
        let log = Arc::new(DiagnosticLog::default());
        let deferred = DeferredStrategy::new(ClassId::new("A"), &table, Arc::clone(&log));
        (table, log, deferred)
    }

    #[test]
    fn passthrough_returns_same_reference() {
        let value = Value::object(Object::new(ClassId::new("A")));
        let copy = PassthroughStrategy.copy(&value);
        assert!(copy.same_ref(&value));
    }

    #[test]
    fn deferred_delegates_after_bind() {
        let (_table, log, deferred) = deferred();
        let target: StrategyRef = Arc::new(Doubling);

        assert!(!deferred.is_bound());
        assert_eq!(deferred.copy(&Value::Int(2)), Value::Int(2));
        assert_eq!(log.len(), 1);

        assert!(deferred.bind(&target));
        assert!(!deferred.bind(&target));
        assert_eq!(deferred.copy(&Value::Int(2)), Value::Int(4));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn deferred_prefers_table_entry() {
        let (table, log, deferred) = deferred();
        let bound: StrategyRef = Arc::new(Doubling);
        deferred.bind(&bound);

        table
            .write()
            .insert(ClassId::new("A"), Arc::new(Negating) as StrategyRef);
        assert_eq!(deferred.copy(&Value::Int(3)), Value::Int(-3));
        assert_eq!(deferred.current().map(|s| s.name()), Some("negating"));
        assert!(log.is_empty());
    }

    #[test]
    fn deferred_reports_when_every_target_dropped() {
        let (table, log, deferred) = deferred();
        {
            let target: StrategyRef = Arc::new(Doubling);
            table.write().insert(ClassId::new("A"), Arc::clone(&target));
            deferred.bind(&target);
        }
        drop(table);

        assert_eq!(deferred.copy(&Value::Int(3)), Value::Int(3));
        assert_eq!(
            log.entries(),
            vec![ResolveIssue::ReleasedStrategy {
                class: ClassId::new("A"),
            }]
        );
    }

    #[test]
    fn strategy_names() {
        let (_table, _log, deferred) = deferred();
        assert_eq!(PassthroughStrategy.name(), "passthrough");
        assert_eq!(deferred.name(), "deferred");
    }
}
