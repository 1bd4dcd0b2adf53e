//! Thread-safe library handle
//!
//! One lock around resolution and registration. Copies run outside the lock.

use crate::diagnostics::ResolveIssue;
use crate::library::CopyStrategyLibrary;
use crate::strategy::{CopyStrategy, StrategyRef};
use copylib_meta::{ClassId, TypeDescriptor, Value};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, mutex-guarded [`CopyStrategyLibrary`]
#[derive(Debug, Clone)]
pub struct SharedCopyStrategyLibrary {
    inner: Arc<Mutex<CopyStrategyLibrary>>,
}

impl SharedCopyStrategyLibrary {
    /// Wrap a library
    #[inline]
    #[must_use]
    pub fn new(library: CopyStrategyLibrary) -> Self {
        Self {
            inner: Arc::new(Mutex::new(library)),
        }
    }

    /// Resolve the strategy for a declared type
    pub fn get_strategy(&self, ty: &TypeDescriptor) -> StrategyRef {
        self.inner.lock().get_strategy(ty)
    }

    /// Register the strategy for a class
    pub fn register(&self, class: impl Into<ClassId>, strategy: StrategyRef) {
        self.inner.lock().register(class, strategy);
    }

    /// Resolve and apply; the lock is released before copying
    pub fn copy(&self, ty: &TypeDescriptor, value: &Value) -> Value {
        let strategy = self.get_strategy(ty);
        strategy.copy(value)
    }

    /// Snapshot of reported issues
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ResolveIssue> {
        self.inner.lock().diagnostics()
    }

    /// Thread-local fork of the guarded library
    #[must_use]
    pub fn fork(&self) -> CopyStrategyLibrary {
        self.inner.lock().fork()
    }
}

impl From<CopyStrategyLibrary> for SharedCopyStrategyLibrary {
    fn from(library: CopyStrategyLibrary) -> Self {
        Self::new(library)
    }
}
