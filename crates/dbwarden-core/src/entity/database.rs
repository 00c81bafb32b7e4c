//! Root entity and arena owner

use super::{Account, Column, Entity, Id, Index, Node, Schema, Stored, Table};
use crate::version::{ServerVersion, VersionError};
use std::collections::HashMap;
use std::fmt;

/// One database server, as captured by a single metadata-gathering pass
///
/// Built once through [`DatabaseBuilder`](super::DatabaseBuilder) and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Database {
    /// Tag shared by every id minted for this graph
    pub(crate) graph: u32,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) variables: HashMap<String, String>,
    pub(crate) status: HashMap<String, String>,
    pub(crate) schemas: Vec<Schema>,
    pub(crate) tables: Vec<Table>,
    pub(crate) columns: Vec<Column>,
    pub(crate) indexes: Vec<Index>,
    pub(crate) accounts: Vec<Account>,
}

impl Database {
    /// Display name derived from the connection, `host:port`
    pub fn name(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Server variables (`SHOW GLOBAL VARIABLES`)
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Look up a single server variable
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Server status counters (`SHOW GLOBAL STATUS`)
    pub fn status(&self) -> &HashMap<String, String> {
        &self.status
    }

    /// Parsed server version
    ///
    /// Metadata may be incomplete, so callers have to handle the unknown case.
    pub fn version(&self) -> Result<ServerVersion, VersionError> {
        let raw = self.variable("version").ok_or(VersionError::Unknown)?;
        raw.parse()
    }

    /// Whether the performance schema is enabled
    ///
    /// Some servers only expose the `performance_schema_*` sub-variables and
    /// not the umbrella flag, so their presence counts as enabled.
    pub fn has_performance_schema(&self) -> bool {
        if let Some(flag) = self.variable("performance_schema").filter(|v| !v.is_empty()) {
            return flag == "ON";
        }

        self.variables
            .keys()
            .any(|key| key.to_ascii_lowercase().starts_with("performance_schema_"))
    }

    /// Schemas in collection order
    pub fn schemas(&self) -> impl Iterator<Item = Node<'_, Schema>> + '_ {
        (0..self.schemas.len()).map(move |index| Node::new(self, Id::new(self.graph, index)))
    }

    /// Find a schema by name
    pub fn schema(&self, name: &str) -> Option<Node<'_, Schema>> {
        self.schemas().find(|schema| schema.name == name)
    }

    pub fn accounts(&self) -> impl Iterator<Item = Node<'_, Account>> + '_ {
        (0..self.accounts.len()).map(move |index| Node::new(self, Id::new(self.graph, index)))
    }

    /// Exact match on username and host
    pub fn account(&self, username: &str, host: &str) -> Option<Node<'_, Account>> {
        self.accounts()
            .find(|account| account.username == username && account.host == host)
    }

    /// Resolve an id minted for this database
    pub fn get<T: Stored>(&self, id: Id<T>) -> Option<Node<'_, T>> {
        (id.graph() == self.graph && id.index() < T::arena(self).len()).then(|| Node::new(self, id))
    }

    /// Every entity reachable from this database, depth first
    ///
    /// Order: the database, then for each schema the schema, its tables and,
    /// for each table, its columns followed by its indexes. Accounts come last.
    pub fn entities(&self) -> Vec<Entity<'_>> {
        let mut entities = Vec::with_capacity(
            1 + self.schemas.len()
                + self.tables.len()
                + self.columns.len()
                + self.indexes.len()
                + self.accounts.len(),
        );

        entities.push(Entity::Database(self));

        for schema in self.schemas() {
            entities.push(Entity::Schema(schema));

            for table in schema.tables() {
                entities.push(Entity::Table(table));
                entities.extend(table.columns().map(Entity::Column));
                entities.extend(table.indexes().map(Entity::Index));
            }
        }

        entities.extend(self.accounts().map(Entity::Account));
        entities
    }

    pub fn is_virtual(&self) -> bool {
        false
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Stored for Schema {
    fn arena(database: &Database) -> &[Self] {
        &database.schemas
    }
}

impl Stored for Table {
    fn arena(database: &Database) -> &[Self] {
        &database.tables
    }
}

impl Stored for Column {
    fn arena(database: &Database) -> &[Self] {
        &database.columns
    }
}

impl Stored for Index {
    fn arena(database: &Database) -> &[Self] {
        &database.indexes
    }
}

impl Stored for Account {
    fn arena(database: &Database) -> &[Self] {
        &database.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DatabaseBuilder;

    fn database_with(variables: &[(&str, &str)]) -> Database {
        DatabaseBuilder::new("localhost", 3306)
            .with_variables(variables.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .build()
    }

    #[test]
    fn name_is_host_and_port() {
        let database = DatabaseBuilder::new("db.internal", 3307).build();
        assert_eq!(database.name(), "db.internal:3307");
        assert_eq!(database.to_string(), "db.internal:3307");
        assert!(!database.is_virtual());
    }

    #[test]
    fn performance_schema_flag_on() {
        assert!(database_with(&[("performance_schema", "ON")]).has_performance_schema());
    }

    #[test]
    fn performance_schema_flag_off_without_sub_variables() {
        assert!(!database_with(&[("performance_schema", "OFF")]).has_performance_schema());
    }

    #[test]
    fn performance_schema_flag_off_wins_over_sub_variables() {
        let database = database_with(&[
            ("performance_schema", "OFF"),
            ("performance_schema_events_waits_enabled", "ON"),
        ]);
        assert!(!database.has_performance_schema());
    }

    #[test]
    fn performance_schema_from_sub_variables() {
        let database = database_with(&[("performance_schema_events_waits_enabled", "ON")]);
        assert!(database.has_performance_schema());

        let database = database_with(&[("PERFORMANCE_SCHEMA_MAX_THREAD_INSTANCES", "-1")]);
        assert!(database.has_performance_schema());
    }

    #[test]
    fn performance_schema_absent() {
        assert!(!database_with(&[("version", "8.0.36")]).has_performance_schema());
    }

    #[test]
    fn version_unknown_when_not_collected() {
        let database = database_with(&[]);
        assert!(matches!(database.version(), Err(VersionError::Unknown)));
    }

    #[test]
    fn version_parsed() {
        let database = database_with(&[("version", "8.0.13-log")]);
        assert_eq!(database.version().unwrap(), ServerVersion::new(8, 0, 13));
    }

    #[test]
    fn account_lookup() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_account("app", "%");
        builder.add_account("root", "localhost");
        let database = builder.build();

        let root = database.account("root", "localhost").unwrap();
        assert_eq!(root.to_string(), "root@localhost");
        assert!(database.account("root", "%").is_none());
        assert!(database.account("nobody", "localhost").is_none());
    }

    #[test]
    fn get_rejects_foreign_ids() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_schema("shop").unwrap();
        builder.add_schema("crm").unwrap();
        let big = builder.build();
        let small = DatabaseBuilder::new("localhost", 3306).build();

        let crm = big.schema("crm").unwrap().id();
        assert!(small.get(crm).is_none());
        assert_eq!(big.get(crm).unwrap().name, "crm");

        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_schema("shop").unwrap();
        let twin = builder.build();
        let shop = big.schema("shop").unwrap().id();
        assert!(twin.get(shop).is_none());
        assert_eq!(twin.get(twin.schema("shop").unwrap().id()).unwrap().name, "shop");
    }
}
