//! Library configuration
//!
//! Controls which resolution outcomes are memoized and how many diagnostics
//! are retained. Loadable from TOML; missing keys take their defaults.
//!
//! ```toml
//! cache_unknown_types = true
//! cache_generated_composites = true
//! cache_failed_composites = false
//! max_diagnostics = 256
//! ```

use serde::{Deserialize, Serialize};

/// Copy strategy library configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Remember the passthrough decision for unknown classes
    pub cache_unknown_types: bool,
    /// Remember generated composite strategies
    pub cache_generated_composites: bool,
    /// Remember the passthrough decision for mapped classes that failed
    /// generation, so the failure is reported once
    pub cache_failed_composites: bool,
    /// Diagnostic log capacity
    pub max_diagnostics: usize,
}

impl LibraryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With unknown-type caching
    #[inline]
    #[must_use]
    pub fn with_cache_unknown_types(mut self, enabled: bool) -> Self {
        self.cache_unknown_types = enabled;
        self
    }

    /// With composite caching
    #[inline]
    #[must_use]
    pub fn with_cache_generated_composites(mut self, enabled: bool) -> Self {
        self.cache_generated_composites = enabled;
        self
    }

    /// With failed-composite caching
    #[inline]
    #[must_use]
    pub fn with_cache_failed_composites(mut self, enabled: bool) -> Self {
        self.cache_failed_composites = enabled;
        self
    }

    /// With diagnostic capacity
    #[inline]
    #[must_use]
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error on malformed TOML, unknown value types, or a zero
    /// diagnostic capacity
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check invariants
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroDiagnosticCapacity`] if `max_diagnostics` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_diagnostics == 0 {
            return Err(ConfigError::ZeroDiagnosticCapacity);
        }
        Ok(())
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            cache_unknown_types: true,
            cache_generated_composites: true,
            cache_failed_composites: true,
            max_diagnostics: 1024,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("invalid library config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("cannot serialize library config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Diagnostic log must hold at least one entry
    #[error("max_diagnostics must be at least 1")]
    ZeroDiagnosticCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = LibraryConfig::new();
        assert!(config.cache_unknown_types);
        assert!(config.cache_generated_composites);
        assert!(config.cache_failed_composites);
        assert_eq!(config.max_diagnostics, 1024);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = LibraryConfig::from_toml_str("cache_failed_composites = false").unwrap();
        assert_eq!(
            config,
            LibraryConfig::new().with_cache_failed_composites(false)
        );
    }

    #[test]
    fn toml_round_trip() {
        let config = LibraryConfig::new()
            .with_cache_unknown_types(false)
            .with_max_diagnostics(8);
        let text = config.to_toml_string().unwrap();
        assert_eq!(LibraryConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = LibraryConfig::from_toml_str("max_diagnostics = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDiagnosticCapacity));
    }

    #[test]
    fn rejects_wrong_value_type() {
        let err = LibraryConfig::from_toml_str("cache_unknown_types = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
