//! Primary key width on InnoDB tables
//!
//! InnoDB clusters rows on the primary key and appends the full key to every
//! secondary index entry, so a wide key is paid for once per index.

use dbwarden_core::{Check, CheckError, CheckMeta, Entity, Report, Status};

/// Width of the synthetic `INT UNSIGNED AUTO_INCREMENT` key we would suggest
const SYNTHETIC_KEY_BYTES: u64 = 4;

/// Keys up to this width are as cheap as a BIGINT
const CHEAP_KEY_BYTES: u64 = 8;

/// Suggests a synthetic key when a wide primary key is copied into
/// secondary indexes
#[derive(Debug, Clone, Copy, Default)]
pub struct SaneInnoDbPrimaryKey;

/// Bytes spent on primary key copies with the current design
fn current_cost(pk_size: u64, secondary_count: u64) -> u128 {
    u128::from(pk_size) * (u128::from(secondary_count) + 1)
}

/// Bytes spent with a synthetic key and the old key demoted to UNIQUE
fn alternative_cost(pk_size: u64, secondary_count: u64) -> u128 {
    let synthetic = u128::from(SYNTHETIC_KEY_BYTES);
    u128::from(pk_size) + synthetic * (u128::from(secondary_count) + 2)
}

impl Check for SaneInnoDbPrimaryKey {
    fn meta(&self) -> CheckMeta {
        CheckMeta {
            code: "SANE_INNODB_PRIMARY_KEY",
            name: "Sane InnoDB PRIMARY KEY",
            description: "Due to how InnoDB uses PRIMARY KEYS, certain types or combinations should be avoided.",
            reference_uri: "https://github.com/xsist10/cadfael/wiki/Sane-InnoDb-Primary-Key",
        }
    }

    fn supports(&self, entity: &Entity<'_>) -> bool {
        matches!(entity, Entity::Table(table) if table.engine() == Some("InnoDB"))
    }

    fn run(&self, entity: &Entity<'_>) -> Result<Option<Report>, CheckError> {
        let Entity::Table(table) = entity else {
            return Err(CheckError::unsupported(self.meta(), entity));
        };

        let primary_key = table.primary_key_columns();
        if primary_key.is_empty() {
            // Missing primary keys are another rule's business
            return Ok(None);
        }

        let pk_size = primary_key
            .iter()
            .fold(0u64, |total, column| total.saturating_add(column.storage_byte_size()));
        let secondary_count = table.indexes().filter(|index| !index.is_primary_key()).count() as u64;

        tracing::debug!(
            table = %table.qualified_name(),
            pk_size,
            secondary_count,
            "Sizing InnoDB primary key"
        );

        if pk_size <= CHEAP_KEY_BYTES || secondary_count == 0 {
            return Ok(Some(Report::bare(self.meta(), entity, Status::Ok)));
        }

        let current = current_cost(pk_size, secondary_count);
        let alternative = alternative_cost(pk_size, secondary_count);
        if current <= alternative {
            return Ok(Some(Report::bare(self.meta(), entity, Status::Ok)));
        }

        Ok(Some(Report::new(
            self.meta(),
            entity,
            Status::Warning,
            [
                "In InnoDB tables, the PRIMARY KEY is appended to other indexes.".to_string(),
                "If the PRIMARY KEY is big, other indexes will use more space.".to_string(),
                format!(
                    "This PRIMARY KEY is {} bytes and copied into {} other index(es): {} bytes per row, against {} with a surrogate key.",
                    pk_size, secondary_count, current, alternative
                ),
                "Maybe turn your PRIMARY KEY into UNIQUE and add an auto_increment PRIMARY KEY."
                    .to_string(),
            ],
        )))
    }
}
