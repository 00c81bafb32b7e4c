//! The check contract
//!
//! A check is one piece of domain expertise: it decides which entities it
//! applies to and turns an applicable entity into at most one [`Report`].
//! New rules are new implementations; the driver and entity model never change.

use crate::entity::Entity;
use crate::report::Report;
use serde::Serialize;

/// Identity of a check, for display only
///
/// `code` is stable and used by configuration to select checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CheckMeta {
    /// Stable identifier, e.g. `REQUIRE_PRIMARY_KEY`
    pub code: &'static str,

    /// Human readable name
    pub name: &'static str,

    pub description: &'static str,

    /// Where to read more about the rule
    pub reference_uri: &'static str,
}

impl std::fmt::Display for CheckMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A check was used outside its contract
///
/// These are defects in a check or in the collector, never findings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("check {check} was run on unsupported {entity}")]
    Unsupported { check: &'static str, entity: String },

    #[error("check {check} needs {field} on {entity}, but it was not collected")]
    MissingMetadata {
        check: &'static str,
        entity: String,
        field: &'static str,
    },
}

impl CheckError {
    pub fn unsupported(check: CheckMeta, entity: &Entity<'_>) -> Self {
        Self::Unsupported {
            check: check.code,
            entity: entity.to_string(),
        }
    }

    pub fn missing_metadata(check: CheckMeta, entity: &Entity<'_>, field: &'static str) -> Self {
        Self::MissingMetadata {
            check: check.code,
            entity: entity.to_string(),
            field,
        }
    }
}

/// A rule evaluated against single entities
pub trait Check: Send + Sync {
    /// Name, description and reference URI
    fn meta(&self) -> CheckMeta;

    /// Whether this check applies to `entity`
    ///
    /// Must be pure and must not inspect fields a non-applicable variant
    /// may lack.
    fn supports(&self, entity: &Entity<'_>) -> bool;

    /// Evaluate an entity for which [`Check::supports`] returned true
    ///
    /// `Ok(None)` means the rule has nothing to say about this instance.
    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError>;
}
