//! Editor configuration

use crate::error::EditorError;
use serde::{Deserialize, Serialize};

/// Editor configuration
///
/// Every key is optional when loading from TOML; missing keys take their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Check hard invariants when a snapshot is loaded
    pub validate_snapshots: bool,
    /// Record setters whose new value equals the old one
    pub record_noop_changes: bool,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With snapshot validation on load
    #[inline]
    #[must_use]
    pub fn with_validate_snapshots(mut self, enabled: bool) -> Self {
        self.validate_snapshots = enabled;
        self
    }

    /// With recording of no-op setters
    #[inline]
    #[must_use]
    pub fn with_record_noop_changes(mut self, enabled: bool) -> Self {
        self.record_noop_changes = enabled;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`EditorError::Config`] on malformed TOML or mistyped keys
    pub fn from_toml_str(text: &str) -> Result<Self, EditorError> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            validate_snapshots: true,
            record_noop_changes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EditorConfig::new();
        assert!(config.validate_snapshots);
        assert!(config.record_noop_changes);
    }

    #[test]
    fn toml_fills_missing_keys() {
        let config = EditorConfig::from_toml_str("record_noop_changes = false").unwrap();
        assert_eq!(
            config,
            EditorConfig::new().with_record_noop_changes(false)
        );
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn toml_rejects_wrong_type() {
        let err = EditorConfig::from_toml_str("validate_snapshots = \"yes\"").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }
}
