//! Evaluation driver
//!
//! Cross-applies every registered check to every entity of a frozen
//! [`Database`] and collects the reports in encounter order: checks in
//! registration order, entities in [`Database::entities`] order.

use crate::checks::default_checks;
use dbwarden_core::{AuditResult, Check, CheckError, Config, Database, Entity, Report};

/// A check broke its contract; the run is aborted
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Check '{check}' failed on {entity}: {source}")]
    CheckFailed {
        check: &'static str,
        entity: String,
        #[source]
        source: CheckError,
    },
}

/// Runs a registry of checks against a database
pub struct Auditor {
    checks: Vec<Box<dyn Check>>,
    config: Config,
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Auditor {
    /// An auditor with no checks registered
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            config: Config::default(),
        }
    }

    /// An auditor with every built-in check
    pub fn with_default_checks() -> Self {
        Self::new().with_checks(default_checks())
    }

    /// Built-in checks minus the ones the configuration skips
    pub fn from_config(config: &Config) -> Self {
        let checks = default_checks()
            .into_iter()
            .filter(|check| {
                let skipped = config.checks.is_skipped(check.meta().code);
                if skipped {
                    tracing::debug!(check = check.meta().code, "Check disabled by configuration");
                }
                !skipped
            })
            .collect();

        Self {
            checks,
            config: config.clone(),
        }
    }

    /// Register one more check after the existing ones
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Box<dyn Check>>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Registered checks in evaluation order
    pub fn checks(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|check| check.as_ref())
    }

    /// Run every check and wrap the reports for a renderer
    pub fn audit(&self, database: &Database) -> Result<AuditResult, AuditError> {
        let entities = self.entities(database);
        tracing::info!(
            database = %database.name(),
            entities = entities.len(),
            checks = self.checks.len(),
            "Starting audit"
        );

        let reports = self.evaluate(&entities)?;
        let result =
            AuditResult::from_reports(database.name(), reports, entities.len(), self.checks.len());

        tracing::info!(
            reports = result.summary.total,
            warnings = result.summary.warnings,
            concerns = result.summary.concerns,
            critical = result.summary.critical,
            "Audit finished"
        );
        Ok(result)
    }

    /// Run every check against the given entities
    pub fn evaluate(&self, entities: &[Entity<'_>]) -> Result<Vec<Report>, AuditError> {
        let mut reports = Vec::new();

        for check in &self.checks {
            let meta = check.meta();

            for entity in entities.iter().filter(|entity| check.supports(entity)) {
                tracing::debug!(check = meta.code, %entity, "Running check");

                match check.run(entity) {
                    Ok(Some(report)) => reports.push(report),
                    Ok(None) => tracing::debug!(check = meta.code, %entity, "Not applicable"),
                    Err(source) => {
                        return Err(AuditError::CheckFailed {
                            check: meta.code,
                            entity: entity.display_name(),
                            source,
                        })
                    }
                }
            }
        }

        Ok(reports)
    }

    /// Every entity of `database` outside the skipped schemas
    pub fn entities<'a>(&self, database: &'a Database) -> Vec<Entity<'a>> {
        database
            .entities()
            .into_iter()
            .filter(|entity| match entity.schema_name() {
                Some(schema) if self.config.is_schema_skipped(schema) => {
                    tracing::debug!(%entity, "Skipped by configuration");
                    false
                }
                _ => true,
            })
            .collect()
    }
}
