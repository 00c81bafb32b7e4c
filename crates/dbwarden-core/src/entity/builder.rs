//! Graph construction
//!
//! The collector populates a [`DatabaseBuilder`] in one pass and freezes it
//! with [`DatabaseBuilder::build`]. Every call that creates a link validates
//! all of its inputs before touching the arenas, so a rejected call leaves
//! the builder exactly as it was.

use super::{
    Account, Column, ColumnInformationSchema, Database, Id, Index, Schema, Stored, Table,
    TableInformationSchema,
};
use std::sync::atomic::{AtomicU32, Ordering};

/// Source of graph tags; 0 is never handed out
static NEXT_GRAPH: AtomicU32 = AtomicU32::new(1);

/// Rejected graph construction step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown {kind} id {index}")]
    UnknownId { kind: &'static str, index: usize },

    #[error("{kind} id {index} belongs to another graph")]
    ForeignId { kind: &'static str, index: usize },

    #[error("Schema '{0}' already exists")]
    DuplicateSchema(String),

    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Index '{0}' already exists")]
    DuplicateIndex(String),

    #[error("Column '{column}' does not belong to table '{table}'")]
    ForeignColumn { column: String, table: String },

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { column: String, table: String },
}

/// Builds a [`Database`] graph
#[derive(Debug)]
pub struct DatabaseBuilder {
    database: Database,
}

impl DatabaseBuilder {
    /// Start a graph for the server at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            database: Database {
                graph: NEXT_GRAPH.fetch_add(1, Ordering::Relaxed),
                host: host.into(),
                port,
                ..Database::default()
            },
        }
    }

    /// Replace the server variables
    pub fn with_variables(mut self, variables: impl IntoIterator<Item = (String, String)>) -> Self {
        self.database.variables = variables.into_iter().collect();
        self
    }

    /// Replace the server status counters
    pub fn with_status(mut self, status: impl IntoIterator<Item = (String, String)>) -> Self {
        self.database.status = status.into_iter().collect();
        self
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.database.variables.insert(name.into(), value.into());
    }

    pub fn add_account(&mut self, username: impl Into<String>, host: impl Into<String>) -> Id<Account> {
        self.database.accounts.push(Account {
            username: username.into(),
            host: host.into(),
        });
        Id::new(self.database.graph, self.database.accounts.len() - 1)
    }

    pub fn add_schema(&mut self, name: impl Into<String>) -> Result<Id<Schema>, GraphError> {
        let name = name.into();
        if self.database.schemas.iter().any(|schema| schema.name == name) {
            return Err(GraphError::DuplicateSchema(name));
        }

        self.database.schemas.push(Schema {
            name,
            tables: Vec::new(),
        });
        Ok(Id::new(self.database.graph, self.database.schemas.len() - 1))
    }

    pub fn add_table(
        &mut self,
        schema: Id<Schema>,
        name: impl Into<String>,
        information_schema: Option<TableInformationSchema>,
    ) -> Result<Id<Table>, GraphError> {
        let name = name.into();
        let owner = self.resolve(schema, "schema")?;

        if owner
            .tables
            .iter()
            .any(|table| self.database.tables[table.index()].name == name)
        {
            return Err(GraphError::DuplicateTable(format!("{}.{}", owner.name, name)));
        }

        let id = Id::new(self.database.graph, self.database.tables.len());
        self.database.tables.push(Table {
            name,
            information_schema,
            schema,
            columns: Vec::new(),
            indexes: Vec::new(),
        });
        self.database.schemas[schema.index()].tables.push(id);
        Ok(id)
    }

    pub fn add_column(
        &mut self,
        table: Id<Table>,
        name: impl Into<String>,
        information_schema: ColumnInformationSchema,
    ) -> Result<Id<Column>, GraphError> {
        let name = name.into();
        let owner = self.table(table)?;

        if owner
            .columns
            .iter()
            .any(|column| self.database.columns[column.index()].name == name)
        {
            return Err(GraphError::DuplicateColumn(format!("{}.{}", owner.name, name)));
        }

        let id = Id::new(self.database.graph, self.database.columns.len());
        self.database.columns.push(Column {
            name,
            information_schema,
            table,
        });
        self.database.tables[table.index()].columns.push(id);
        Ok(id)
    }

    /// Add an index; every member column must belong to `table`
    pub fn add_index(
        &mut self,
        table: Id<Table>,
        name: impl Into<String>,
        unique: bool,
        columns: &[Id<Column>],
    ) -> Result<Id<Index>, GraphError> {
        let name = name.into();
        let owner = self.table(table)?;

        if owner
            .indexes
            .iter()
            .any(|index| self.database.indexes[index.index()].name == name)
        {
            return Err(GraphError::DuplicateIndex(format!("{}.{}", owner.name, name)));
        }

        for column in columns {
            let member = self.resolve(*column, "column")?;

            if member.table != table {
                return Err(GraphError::ForeignColumn {
                    column: member.name.clone(),
                    table: owner.name.clone(),
                });
            }
        }

        let id = Id::new(self.database.graph, self.database.indexes.len());
        self.database.indexes.push(Index {
            name,
            unique,
            table,
            columns: columns.to_vec(),
        });
        self.database.tables[table.index()].indexes.push(id);
        Ok(id)
    }

    /// Find a column of `table` by name
    pub fn column_id(&self, table: Id<Table>, name: &str) -> Result<Id<Column>, GraphError> {
        let owner = self.table(table)?;
        owner
            .columns
            .iter()
            .copied()
            .find(|column| self.database.columns[column.index()].name == name)
            .ok_or_else(|| GraphError::UnknownColumn {
                column: name.to_string(),
                table: owner.name.clone(),
            })
    }

    /// Freeze the graph
    pub fn build(self) -> Database {
        self.database
    }

    fn table(&self, table: Id<Table>) -> Result<&Table, GraphError> {
        self.resolve(table, "table")
    }

    fn resolve<T: Stored>(&self, id: Id<T>, kind: &'static str) -> Result<&T, GraphError> {
        let index = id.index();
        if id.graph() != self.database.graph {
            return Err(GraphError::ForeignId { kind, index });
        }
        T::arena(&self.database)
            .get(index)
            .ok_or(GraphError::UnknownId { kind, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_owned_by_the_database() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_schema("shop").unwrap();
        builder.add_schema("crm").unwrap();
        let database = builder.build();

        let names: Vec<_> = database.schemas().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["shop", "crm"]);
        for schema in database.schemas() {
            assert!(std::ptr::eq(schema.database(), &database));
        }
    }

    #[test]
    fn duplicate_schema_rejected() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_schema("shop").unwrap();
        assert_eq!(
            builder.add_schema("shop"),
            Err(GraphError::DuplicateSchema("shop".to_string()))
        );
        assert_eq!(builder.build().schemas().count(), 1);
    }

    #[test]
    fn schema_from_another_builder_rejected() {
        let mut other = DatabaseBuilder::new("localhost", 3306);
        other.add_schema("a").unwrap();
        let foreign = other.add_schema("b").unwrap();

        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let result = builder.add_table(foreign, "orders", None);
        assert_eq!(result, Err(GraphError::ForeignId { kind: "schema", index: 1 }));
        assert!(builder.build().entities().len() == 1);
    }

    #[test]
    fn in_range_ids_from_another_builder_rejected() {
        let mut other = DatabaseBuilder::new("localhost", 3306);
        let other_shop = other.add_schema("shop").unwrap();
        let other_orders = other.add_table(other_shop, "orders", None).unwrap();
        let other_id = other
            .add_column(other_orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();

        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let shop = builder.add_schema("shop").unwrap();
        let orders = builder.add_table(shop, "orders", None).unwrap();
        builder
            .add_column(orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();

        // same positions in both arenas, different graphs
        assert_eq!(shop.index(), other_shop.index());
        assert_ne!(shop, other_shop);
        assert_eq!(
            builder.add_table(other_shop, "users", None),
            Err(GraphError::ForeignId { kind: "schema", index: 0 })
        );
        assert_eq!(
            builder.add_column(other_orders, "total", ColumnInformationSchema::new("int")),
            Err(GraphError::ForeignId { kind: "table", index: 0 })
        );
        assert_eq!(
            builder.add_index(orders, "PRIMARY", true, &[other_id]),
            Err(GraphError::ForeignId { kind: "column", index: 0 })
        );

        let database = builder.build();
        let orders = database.schema("shop").unwrap().table("orders").unwrap();
        assert_eq!(orders.columns().count(), 1);
        assert_eq!(orders.indexes().count(), 0);
        assert_eq!(database.schemas().count(), 1);
    }

    #[test]
    fn index_with_foreign_column_rejected_without_side_effects() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let shop = builder.add_schema("shop").unwrap();
        let orders = builder.add_table(shop, "orders", None).unwrap();
        let users = builder.add_table(shop, "users", None).unwrap();
        let order_id = builder
            .add_column(orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();
        let user_id = builder
            .add_column(users, "id", ColumnInformationSchema::new("int"))
            .unwrap();

        let result = builder.add_index(orders, "PRIMARY", true, &[order_id, user_id]);
        assert_eq!(
            result,
            Err(GraphError::ForeignColumn {
                column: "id".to_string(),
                table: "orders".to_string(),
            })
        );

        let database = builder.build();
        let orders = database.schema("shop").unwrap().table("orders").unwrap();
        assert_eq!(orders.indexes().count(), 0);
    }

    #[test]
    fn column_lookup_by_name() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let shop = builder.add_schema("shop").unwrap();
        let orders = builder.add_table(shop, "orders", None).unwrap();
        let id = builder
            .add_column(orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();

        assert_eq!(builder.column_id(orders, "id"), Ok(id));
        assert!(matches!(
            builder.column_id(orders, "missing"),
            Err(GraphError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn duplicate_column_rejected() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let shop = builder.add_schema("shop").unwrap();
        let orders = builder.add_table(shop, "orders", None).unwrap();
        builder
            .add_column(orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();
        assert!(matches!(
            builder.add_column(orders, "id", ColumnInformationSchema::new("bigint")),
            Err(GraphError::DuplicateColumn(_))
        ));
    }
}
