//! Schemas and tables

use super::{Column, Id, Index, Node};
use serde::{Deserialize, Serialize};

/// A named namespace, owned by exactly one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub(crate) tables: Vec<Id<Table>>,
}

/// `information_schema.TABLES` row for a table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableInformationSchema {
    /// Storage engine, e.g. `InnoDB`
    pub engine: String,

    /// `BASE TABLE`, `VIEW`, ...
    pub table_type: String,

    pub row_format: Option<String>,

    /// Estimated row count
    pub table_rows: Option<u64>,

    pub data_length: Option<u64>,

    pub index_length: Option<u64>,

    pub auto_increment: Option<u64>,

    pub table_collation: Option<String>,

    pub table_comment: String,
}

impl TableInformationSchema {
    /// Base table record for the given engine
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            table_type: "BASE TABLE".to_string(),
            ..Self::default()
        }
    }
}

/// A table and its structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub information_schema: Option<TableInformationSchema>,
    pub(crate) schema: Id<Schema>,
    pub(crate) columns: Vec<Id<Column>>,
    pub(crate) indexes: Vec<Id<Index>>,
}

impl Table {
    /// Storage engine, if the information schema record was collected
    pub fn engine(&self) -> Option<&str> {
        self.information_schema
            .as_ref()
            .map(|info| info.engine.as_str())
    }
}

impl<'a> Node<'a, Schema> {
    pub fn tables(&self) -> impl Iterator<Item = Node<'a, Table>> + 'a {
        Node::many(self.database(), &self.get().tables)
    }

    pub fn table(&self, name: &str) -> Option<Node<'a, Table>> {
        self.tables().find(|table| table.name == name)
    }
}

impl<'a> Node<'a, Table> {
    /// Owning schema
    pub fn schema(&self) -> Node<'a, Schema> {
        Node::new(self.database(), self.get().schema)
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> impl Iterator<Item = Node<'a, Column>> + 'a {
        Node::many(self.database(), &self.get().columns)
    }

    pub fn column(&self, name: &str) -> Option<Node<'a, Column>> {
        self.columns().find(|column| column.name == name)
    }

    pub fn indexes(&self) -> impl Iterator<Item = Node<'a, Index>> + 'a {
        Node::many(self.database(), &self.get().indexes)
    }

    /// The index named `PRIMARY`, if the table has one
    pub fn primary_key(&self) -> Option<Node<'a, Index>> {
        self.indexes().find(|index| index.is_primary_key())
    }

    /// Member columns of the primary key, empty when there is none
    pub fn primary_key_columns(&self) -> Vec<Node<'a, Column>> {
        self.primary_key()
            .map(|index| index.columns().collect())
            .unwrap_or_default()
    }

    /// `schema.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema().name, self.name)
    }
}
