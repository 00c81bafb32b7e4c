//! Server-level enforcement of primary keys

use dbwarden_core::{Check, CheckError, CheckMeta, Entity, Report, ServerVersion, Status};

const OPTION: &str = "sql_require_primary_key";

/// `sql_require_primary_key` first shipped in this release
fn introduced_in() -> ServerVersion {
    ServerVersion::new(8, 0, 13)
}

/// Warns when a server able to reject tables without a PRIMARY KEY is not
/// configured to do so
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirePrimaryKey;

impl Check for RequirePrimaryKey {
    fn meta(&self) -> CheckMeta {
        CheckMeta {
            code: "REQUIRE_PRIMARY_KEY",
            name: "Require Primary Key Configuration",
            description: "Ensure MySQL is configured to block the creation of tables without PRIMARY KEYs.",
            reference_uri: "https://github.com/xsist10/cadfael/wiki/Force-Primary-Key-Requirement",
        }
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        matches!(entity, Entity::Database(_))
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Entity::Database(database) = entity else {
            return Err(CheckError::unsupported(self.meta(), entity));
        };

        let version = match database.version() {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(database = %database.name(), error = %e, "Cannot evaluate {}", OPTION);
                return Ok(Some(Report::new(
                    self.meta(),
                    entity,
                    Status::Concern,
                    [e.to_string(), "This makes us nervous.".to_string()],
                )));
            }
        };

        if version < introduced_in() {
            return Ok(Some(Report::new(
                self.meta(),
                entity,
                Status::Ok,
                [format!(
                    "MySQL {} predates {}, so there is nothing to configure.",
                    version, OPTION
                )],
            )));
        }

        let require_pk_disabled = database.variable(OPTION) != Some("ON");
        if require_pk_disabled {
            return Ok(Some(Report::new(
                self.meta(),
                entity,
                Status::Warning,
                [
                    format!(
                        "You are running MySQL 8.0.13+ (MySQL {}) without {} enabled.",
                        version, OPTION
                    ),
                    "Every table should have a primary key, so it's better to enforce it via configuration."
                        .to_string(),
                ],
            )));
        }

        Ok(Some(Report::new(
            self.meta(),
            entity,
            Status::Ok,
            [format!("You have {} enabled.", OPTION)],
        )))
    }
}
