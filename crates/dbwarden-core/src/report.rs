//! Findings produced by checks
//!
//! Status names are serialised into audit results and consumed by CI
//! configuration. Never rename them.

use crate::check::CheckMeta;
use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from harmless to urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing to do
    Ok,

    /// Should be reviewed
    Warning,

    /// Could not be assessed, or likely to cause trouble
    Concern,

    /// Needs attention now
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Concern => "concern",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Owned identity of the entity a report is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,

    /// Human readable identity, e.g. `shop.orders`
    pub name: String,
}

impl From<&Entity<'_>> for EntityRef {
    fn from(entity: &Entity<'_>) -> Self {
        Self {
            kind: entity.kind(),
            name: entity.display_name(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// The outcome of one check on one entity
///
/// Immutable once built: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    check: CheckMeta,
    entity: EntityRef,
    status: Status,
    messages: Vec<String>,
}

impl Report {
    pub fn new<I, S>(check: CheckMeta, entity: &Entity<'_>, status: Status, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            check,
            entity: EntityRef::from(entity),
            status,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// A report with no explanation lines
    pub fn bare(check: CheckMeta, entity: &Entity<'_>, status: Status) -> Self {
        Self::new(check, entity, status, Vec::<String>::new())
    }

    /// Identity of the check that produced this report
    pub fn check(&self) -> &CheckMeta {
        &self.check
    }

    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Explanation lines in order
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
