//! Entity model
//!
//! A [`Database`] owns every object collected from one server in flat arenas.
//! Parent/child links are typed [`Id`] indices into those arenas, so a graph is
//! always fully linked once [`DatabaseBuilder::build`] returns.
//!
//! Checks never see the arenas directly. They receive an [`Entity`], a closed
//! enum of borrowed views, and navigate through [`Node`] handles.

mod account;
mod builder;
mod column;
mod database;
mod index;
mod table;

pub use account::Account;
pub use builder::{DatabaseBuilder, GraphError};
pub use column::{Column, ColumnInformationSchema};
pub use database::Database;
pub use index::{Index, PRIMARY_KEY_NAME};
pub use table::{Schema, Table, TableInformationSchema};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

/// Typed index into one of the arenas owned by a [`Database`]
///
/// Ids are tagged with the graph that minted them; a [`Database`] or
/// [`DatabaseBuilder`] never resolves an id minted for another graph.
pub struct Id<T> {
    graph: u32,
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub(crate) fn new(graph: u32, index: usize) -> Self {
        Self {
            graph,
            index: index as u32,
            _marker: PhantomData,
        }
    }

    pub(crate) fn graph(self) -> u32 {
        self.graph
    }

    /// Position of the entry in its arena
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.graph == other.graph && self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.hash(state);
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index)
    }
}

/// Types stored in a [`Database`] arena
pub trait Stored: Sized + sealed::Sealed {
    #[doc(hidden)]
    fn arena(database: &Database) -> &[Self];
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Schema {}
    impl Sealed for super::Table {}
    impl Sealed for super::Column {}
    impl Sealed for super::Index {}
    impl Sealed for super::Account {}
}

/// Borrowed handle on one arena entry, able to follow links to its relatives
pub struct Node<'a, T> {
    database: &'a Database,
    id: Id<T>,
    value: &'a T,
}

impl<'a, T: Stored> Node<'a, T> {
    /// Ids are only minted by the builder for this arena, so the lookup is in bounds
    pub(crate) fn new(database: &'a Database, id: Id<T>) -> Self {
        Self {
            database,
            id,
            value: &T::arena(database)[id.index()],
        }
    }

    pub(crate) fn many(
        database: &'a Database,
        ids: &'a [Id<T>],
    ) -> impl Iterator<Item = Node<'a, T>> + 'a {
        ids.iter().map(move |id| Node::new(database, *id))
    }
}

impl<'a, T> Node<'a, T> {
    /// Owning database
    pub fn database(&self) -> &'a Database {
        self.database
    }

    /// Arena id of this entry
    pub fn id(&self) -> Id<T> {
        self.id
    }

    /// The entry itself, with the graph lifetime
    pub fn get(&self) -> &'a T {
        self.value
    }
}

impl<T> Clone for Node<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

impl<T> Deref for Node<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("value", self.value)
            .finish()
    }
}

/// Discriminator for the entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Database,
    Schema,
    Table,
    Column,
    Index,
    Account,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Schema => write!(f, "schema"),
            Self::Table => write!(f, "table"),
            Self::Column => write!(f, "column"),
            Self::Index => write!(f, "index"),
            Self::Account => write!(f, "account"),
        }
    }
}

/// Any auditable object in the graph
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Database(&'a Database),
    Schema(Node<'a, Schema>),
    Table(Node<'a, Table>),
    Column(Node<'a, Column>),
    Index(Node<'a, Index>),
    Account(Node<'a, Account>),
}

impl<'a> Entity<'a> {
    /// Which variant this is
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Database(_) => EntityKind::Database,
            Self::Schema(_) => EntityKind::Schema,
            Self::Table(_) => EntityKind::Table,
            Self::Column(_) => EntityKind::Column,
            Self::Index(_) => EntityKind::Index,
            Self::Account(_) => EntityKind::Account,
        }
    }

    /// Human readable identity, e.g. `shop.orders` or `root@localhost`
    pub fn display_name(&self) -> String {
        match self {
            Self::Database(database) => database.name(),
            Self::Schema(schema) => schema.name.clone(),
            Self::Table(table) => table.qualified_name(),
            Self::Column(column) => column.qualified_name(),
            Self::Index(index) => index.qualified_name(),
            Self::Account(account) => account.to_string(),
        }
    }

    /// Name of the schema this entity lives in, if it lives in one
    pub fn schema_name(&self) -> Option<&'a str> {
        match self {
            Self::Database(_) | Self::Account(_) => None,
            Self::Schema(schema) => Some(schema.get().name.as_str()),
            Self::Table(table) => Some(table.schema().get().name.as_str()),
            Self::Column(column) => Some(column.table().schema().get().name.as_str()),
            Self::Index(index) => Some(index.table().schema().get().name.as_str()),
        }
    }

    /// Whether the entity is synthesised rather than backed by a real server object
    pub fn is_virtual(&self) -> bool {
        match self {
            Self::Database(database) => database.is_virtual(),
            Self::Account(account) => account.is_virtual(),
            Self::Schema(_) | Self::Table(_) | Self::Column(_) | Self::Index(_) => false,
        }
    }
}

impl fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> Database {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        let shop = builder.add_schema("shop").unwrap();
        let orders = builder
            .add_table(shop, "orders", Some(TableInformationSchema::new("InnoDB")))
            .unwrap();
        let id = builder
            .add_column(orders, "id", ColumnInformationSchema::new("int"))
            .unwrap();
        builder.add_index(orders, PRIMARY_KEY_NAME, true, &[id]).unwrap();
        builder.add_account("root", "localhost");
        builder.build()
    }

    #[test]
    fn entities_in_encounter_order() {
        let database = database();
        let described: Vec<_> = database
            .entities()
            .iter()
            .map(|entity| (entity.kind(), entity.display_name()))
            .collect();

        assert_eq!(
            described,
            vec![
                (EntityKind::Database, "localhost:3306".to_string()),
                (EntityKind::Schema, "shop".to_string()),
                (EntityKind::Table, "shop.orders".to_string()),
                (EntityKind::Column, "shop.orders.id".to_string()),
                (EntityKind::Index, "shop.orders.PRIMARY".to_string()),
                (EntityKind::Account, "root@localhost".to_string()),
            ]
        );
    }

    #[test]
    fn schema_name_and_virtuality() {
        let database = database();
        for entity in database.entities() {
            assert!(!entity.is_virtual());
            match entity {
                Entity::Database(_) | Entity::Account(_) => assert_eq!(entity.schema_name(), None),
                _ => assert_eq!(entity.schema_name(), Some("shop")),
            }
        }
    }

    #[test]
    fn entity_display_includes_kind() {
        let database = database();
        let table = database.schema("shop").unwrap().table("orders").unwrap();
        assert_eq!(Entity::Table(table).to_string(), "table shop.orders");
        assert_eq!(EntityKind::Index.to_string(), "index");
    }
}
