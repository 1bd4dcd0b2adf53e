//! Resolution diagnostics
//!
//! Resolution never fails: every problem degrades to the passthrough
//! strategy. The problems are reported here instead, so callers that need
//! strict deep copies can detect degraded ones.

use copylib_meta::{ClassId, TypeDescriptor};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};

/// Generic parameter position of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSlot {
    /// Element of a sequence or set
    Element,
    /// Key of a mapping
    Key,
    /// Value of a mapping
    Value,
}

impl Display for ParameterSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Element => "element",
            Self::Key => "key",
            Self::Value => "value",
        })
    }
}

/// Why a mapped class cannot be instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeDefect {
    /// Declared abstract
    Abstract,
    /// Non-static inner class
    InnerClass,
    /// Declared inside a function body
    LocalClass,
}

impl Display for ShapeDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abstract => "class is abstract",
            Self::InnerClass => "class is a non-static inner class",
            Self::LocalClass => "class is a local class",
        })
    }
}

/// Non-fatal resolution problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveIssue {
    /// Raw class could not be determined
    #[error("cannot obtain class for type {descriptor}, using default strategy")]
    UnresolvableType {
        /// Offending descriptor
        descriptor: TypeDescriptor,
    },

    /// Container declared without a type argument
    #[error("{container} is missing its {slot} type parameter, using default strategy")]
    MissingTypeParameter {
        /// Container class
        container: ClassId,
        /// Missing position
        slot: ParameterSlot,
    },

    /// Mapped marker on a class that cannot be instantiated
    #[error("type {class} is not a valid mapped class: {defect}")]
    InvalidMappedClass {
        /// Mapped class
        class: ClassId,
        /// Reason
        defect: ShapeDefect,
    },

    /// Mapped class without accessible no-argument constructor
    #[error(
        "unable to create copy strategy for {class}: no publicly accessible default constructor"
    )]
    NoDefaultConstructor {
        /// Mapped class
        class: ClassId,
    },

    /// Cycle placeholder copied after its strategy was released
    #[error("copy strategy for {class} is no longer available, copying by reference")]
    ReleasedStrategy {
        /// Class the placeholder stood for
        class: ClassId,
    },
}

impl ResolveIssue {
    /// Class the issue concerns, if one was resolved
    #[must_use]
    pub fn class(&self) -> Option<&ClassId> {
        match self {
            Self::UnresolvableType { .. } => None,
            Self::MissingTypeParameter { container, .. } => Some(container),
            Self::InvalidMappedClass { class, .. }
            | Self::NoDefaultConstructor { class }
            | Self::ReleasedStrategy { class } => Some(class),
        }
    }
}

/// Bounded log of resolution issues
///
/// When full, the oldest entry is dropped.
#[derive(Debug)]
pub struct DiagnosticLog {
    inner: Mutex<LogState>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct LogState {
    entries: VecDeque<ResolveIssue>,
    dropped: u64,
}

impl DiagnosticLog {
    /// Create log holding at most `capacity` entries (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LogState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Report an issue
    pub fn record(&self, issue: ResolveIssue) {
        tracing::error!("{}", issue);
        let mut guard = self.inner.lock();
        if guard.entries.len() == self.capacity {
            guard.entries.pop_front();
            guard.dropped += 1;
        }
        guard.entries.push_back(issue);
    }

    /// Snapshot of retained issues, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<ResolveIssue> {
        self.inner.lock().entries.iter().cloned().collect()
    }

    /// Remove and return retained issues
    pub fn drain(&self) -> Vec<ResolveIssue> {
        self.inner.lock().entries.drain(..).collect()
    }

    /// Number of retained issues
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if no issue is retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Issues evicted because the log was full
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.inner.lock().dropped
    }

    /// Maximum retained entries
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(name: &str) -> ResolveIssue {
        ResolveIssue::NoDefaultConstructor {
            class: ClassId::new(name),
        }
    }

    #[test]
    fn record_and_drain() {
        let log = DiagnosticLog::default();
        log.record(issue("A"));
        log.record(issue("B"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0], issue("A"));
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let log = DiagnosticLog::new(2);
        log.record(issue("A"));
        log.record(issue("B"));
        log.record(issue("C"));

        assert_eq!(log.entries(), vec![issue("B"), issue("C")]);
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn zero_capacity_clamped() {
        assert_eq!(DiagnosticLog::new(0).capacity(), 1);
    }

    #[test]
    fn issue_messages() {
        let missing = ResolveIssue::MissingTypeParameter {
            container: ClassId::new("Map"),
            slot: ParameterSlot::Key,
        };
        assert_eq!(
            missing.to_string(),
            "Map is missing its key type parameter, using default strategy"
        );

        let invalid = ResolveIssue::InvalidMappedClass {
            class: ClassId::new("Shape"),
            defect: ShapeDefect::Abstract,
        };
        assert_eq!(
            invalid.to_string(),
            "type Shape is not a valid mapped class: class is abstract"
        );
        assert_eq!(invalid.class(), Some(&ClassId::new("Shape")));

        let unresolved = ResolveIssue::UnresolvableType {
            descriptor: TypeDescriptor::variable("T"),
        };
        assert!(unresolved.class().is_none());
        assert!(unresolved.to_string().contains("$T"));
    }
}
