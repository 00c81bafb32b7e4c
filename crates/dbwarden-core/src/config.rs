//! Configuration schema (dbwarden.toml)

use crate::report::Status;
use serde::{Deserialize, Serialize};

/// Which registered checks take part in a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckSelection {
    /// Check codes (or `*` patterns) to leave out
    #[serde(default)]
    pub skip: Vec<String>,
}

impl CheckSelection {
    /// Check if a check code is disabled
    pub fn is_skipped(&self, code: &str) -> bool {
        matches_pattern(code, &self.skip)
    }
}

/// When a run counts as failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Lowest status that fails the run
    #[serde(default = "default_fail_on")]
    pub fail_on: Status,
}

fn default_fail_on() -> Status {
    Status::Critical
}

impl Default for SeverityThreshold {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schemas (or `*` patterns) whose objects are not audited
    #[serde(default)]
    pub skip_schemas: Vec<String>,

    /// Check selection
    #[serde(default)]
    pub checks: CheckSelection,

    /// Failure threshold
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_schemas: Vec::new(),
            checks: CheckSelection::default(),
            severity: SeverityThreshold::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Check if objects in a schema should be left out
    pub fn is_schema_skipped(&self, schema: &str) -> bool {
        matches_pattern(schema, &self.skip_schemas)
    }
}

/// Check if a name matches any pattern in the list
fn matches_pattern(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.contains('*') {
            glob_match(pattern, name)
        } else {
            pattern == name
        }
    })
}

/// Simple glob matching (a single `*` wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
