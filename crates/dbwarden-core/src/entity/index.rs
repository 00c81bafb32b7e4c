//! Indexes

use super::{Column, Id, Node, Table};

/// Name MySQL reserves for the primary key index
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// An index over an ordered list of columns of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub(crate) table: Id<Table>,
    pub(crate) columns: Vec<Id<Column>>,
}

impl Index {
    pub fn is_primary_key(&self) -> bool {
        self.name == PRIMARY_KEY_NAME
    }
}

impl<'a> Node<'a, Index> {
    pub fn table(&self) -> Node<'a, Table> {
        Node::new(self.database(), self.get().table)
    }

    /// Member columns in key order
    pub fn columns(&self) -> impl Iterator<Item = Node<'a, Column>> + 'a {
        Node::many(self.database(), &self.get().columns)
    }

    /// `schema.table.index`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table().qualified_name(), self.name)
    }
}
