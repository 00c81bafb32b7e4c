//! Offline metadata snapshots
//!
//! A snapshot is the collector's output written to JSON, so an audit can run
//! without a live server. Loading goes through [`DatabaseBuilder`], so a
//! snapshot with dangling references is rejected as a whole.

use crate::entity::{
    ColumnInformationSchema, Database, DatabaseBuilder, GraphError, TableInformationSchema,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors while loading a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Graph(#[from] GraphError),
}

/// Everything collected from one server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub status: HashMap<String, String>,

    #[serde(default)]
    pub schemas: Vec<SchemaSnapshot>,

    #[serde(default)]
    pub accounts: Vec<AccountSnapshot>,
}

fn default_port() -> u16 {
    3306
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub name: String,

    #[serde(default)]
    pub tables: Vec<TableSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,

    #[serde(default)]
    pub information_schema: Option<TableInformationSchema>,

    #[serde(default)]
    pub columns: Vec<ColumnSnapshot>,

    #[serde(default)]
    pub indexes: Vec<IndexSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub name: String,

    #[serde(flatten)]
    pub information_schema: ColumnInformationSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,

    #[serde(default)]
    pub unique: bool,

    /// Member column names in key order
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub username: String,
    pub host: String,
}

impl Snapshot {
    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot file
    pub fn from_file(path: &std::path::Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Build the entity graph
    pub fn into_database(self) -> Result<Database, SnapshotError> {
        let mut builder = DatabaseBuilder::new(self.host, self.port)
            .with_variables(self.variables)
            .with_status(self.status);

        for schema in self.schemas {
            let schema_id = builder.add_schema(schema.name)?;

            for table in schema.tables {
                let table_id = builder.add_table(schema_id, table.name, table.information_schema)?;

                for column in table.columns {
                    builder.add_column(table_id, column.name, column.information_schema)?;
                }

                for index in table.indexes {
                    let members = index
                        .columns
                        .iter()
                        .map(|name| builder.column_id(table_id, name))
                        .collect::<Result<Vec<_>, _>>()?;
                    builder.add_index(table_id, index.name, index.unique, &members)?;
                }
            }
        }

        for account in self.accounts {
            builder.add_account(account.username, account.host);
        }

        let database = builder.build();
        tracing::debug!(
            database = %database.name(),
            entities = database.entities().len(),
            "Loaded metadata snapshot"
        );
        Ok(database)
    }
}
