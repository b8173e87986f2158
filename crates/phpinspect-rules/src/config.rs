//! Run configuration
//!
//! Hosts enable, disable and re-level rules through a small YAML document:
//!
//! ```yaml
//! disabled_rules:
//!   - singleton_factory_pattern
//! severity:
//!   nested_not_operators: warning
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use phpinspect_core::Severity;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Severity override as spelled in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Error,
    Warning,
    Suggestion,
}

impl From<SeverityLevel> for Severity {
    fn from(level: SeverityLevel) -> Severity {
        match level {
            SeverityLevel::Error => Severity::Error,
            SeverityLevel::Warning => Severity::Warning,
            SeverityLevel::Suggestion => Severity::Suggestion,
        }
    }
}

/// Which rules run and at what severity
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    /// Rule names excluded from the run.
    pub disabled_rules: HashSet<String>,
    /// Per-rule severity overrides.
    pub severity: HashMap<String, SeverityLevel>,
}

impl InspectionConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load and parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.contains(rule)
    }

    pub fn severity_override(&self, rule: &str) -> Option<Severity> {
        self.severity.get(rule).copied().map(Severity::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = InspectionConfig::default();
        assert!(config.is_enabled("nested_not_operators"));
        assert!(config.severity_override("nested_not_operators").is_none());
    }

    #[test]
    fn test_parse_disabled_rules() {
        let config = InspectionConfig::from_yaml(
            "disabled_rules:\n  - singleton_factory_pattern\n",
        )
        .unwrap();
        assert!(!config.is_enabled("singleton_factory_pattern"));
        assert!(config.is_enabled("nested_not_operators"));
    }

    #[test]
    fn test_parse_severity_overrides() {
        let config = InspectionConfig::from_yaml(
            "severity:\n  nested_not_operators: warning\n",
        )
        .unwrap();
        assert_eq!(
            config.severity_override("nested_not_operators"),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_empty_document_is_valid() {
        let config = InspectionConfig::from_yaml("").unwrap();
        assert!(config.disabled_rules.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let result = InspectionConfig::from_yaml("disabled_rules: {not: [a, list");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
