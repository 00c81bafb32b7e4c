//! Audit result schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use crate::report::{Report, Status};
use serde::Serialize;

/// Audit result schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl AuditVersion {
    /// Current audit result schema version
    pub const CURRENT: AuditVersion = AuditVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for AuditVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for an audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    /// Total number of reports
    pub total: usize,

    pub ok: usize,

    pub warnings: usize,

    pub concerns: usize,

    pub critical: usize,

    /// Number of entities in the audited graph
    pub entities_evaluated: usize,

    /// Number of checks that were registered
    pub checks_run: usize,
}

impl AuditSummary {
    fn count(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::Warning => self.warnings += 1,
            Status::Concern => self.concerns += 1,
            Status::Critical => self.critical += 1,
        }
        self.total += 1;
    }
}

/// Result of one audit run, handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    /// Schema version
    pub version: AuditVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Audited server, `host:port`
    pub database: String,

    pub summary: AuditSummary,

    /// Reports in evaluation order
    pub reports: Vec<Report>,
}

impl AuditResult {
    /// Wrap the reports of a finished run
    pub fn from_reports(
        database: impl Into<String>,
        reports: Vec<Report>,
        entities_evaluated: usize,
        checks_run: usize,
    ) -> Self {
        let mut summary = AuditSummary {
            entities_evaluated,
            checks_run,
            ..AuditSummary::default()
        };
        for report in &reports {
            summary.count(report.status());
        }

        Self {
            version: AuditVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            database: database.into(),
            summary,
            reports,
        }
    }

    /// Most severe status among all reports
    pub fn worst_status(&self) -> Option<Status> {
        self.reports.iter().map(Report::status).max()
    }

    /// Whether any report reaches `threshold`
    pub fn fails(&self, threshold: Status) -> bool {
        self.worst_status().is_some_and(|worst| worst >= threshold)
    }

    /// Reports at or above `status`
    pub fn reports_at_least(&self, status: Status) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(move |report| report.status() >= status)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckMeta;
    use crate::entity::{DatabaseBuilder, Entity};

    const META: CheckMeta = CheckMeta {
        code: "TEST_CHECK",
        name: "Test Check",
        description: "Used in tests",
        reference_uri: "https://example.com/test-check",
    };

    fn reports(statuses: &[Status]) -> Vec<Report> {
        let database = DatabaseBuilder::new("localhost", 3306).build();
        let entity = Entity::Database(&database);
        statuses
            .iter()
            .map(|status| Report::bare(META, &entity, *status))
            .collect()
    }

    #[test]
    fn empty_audit() {
        let result = AuditResult::from_reports("localhost:3306", Vec::new(), 1, 2);
        assert_eq!(result.version, AuditVersion::CURRENT);
        assert_eq!(result.summary.total, 0);
        assert_eq!(result.worst_status(), None);
        assert!(!result.fails(Status::Ok));
    }

    #[test]
    fn audit_summary_counts() {
        let result = AuditResult::from_reports(
            "localhost:3306",
            reports(&[Status::Ok, Status::Warning, Status::Warning, Status::Concern]),
            10,
            2,
        );

        assert_eq!(result.summary.total, 4);
        assert_eq!(result.summary.ok, 1);
        assert_eq!(result.summary.warnings, 2);
        assert_eq!(result.summary.concerns, 1);
        assert_eq!(result.summary.critical, 0);
        assert_eq!(result.summary.entities_evaluated, 10);
        assert_eq!(result.worst_status(), Some(Status::Concern));
        assert_eq!(result.reports_at_least(Status::Warning).count(), 3);
    }

    #[test]
    fn fail_threshold() {
        let result =
            AuditResult::from_reports("localhost:3306", reports(&[Status::Ok, Status::Warning]), 1, 1);
        assert!(result.fails(Status::Warning));
        assert!(!result.fails(Status::Concern));
    }

    #[test]
    fn audit_serialization() {
        let result = AuditResult::from_reports("localhost:3306", reports(&[Status::Ok]), 1, 1);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"reports\""));
        assert!(json.contains("\"database\": \"localhost:3306\""));
    }
}
