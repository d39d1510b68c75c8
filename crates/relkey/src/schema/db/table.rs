use super::{Column, ColumnId, Type};
use crate::stmt;

use std::fmt;

/// A database table
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl Table {
    pub(crate) fn new(id: TableId, name: String) -> Self {
        Self {
            id,
            name,
            columns: vec![],
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        assert_eq!(self.id, id.table);
        &self.columns[id.index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|column| column.primary_key)
    }

    /// Adds a column, or returns the existing column of the same name. The
    /// second mapping of a column must agree on its storage type; on conflict
    /// the existing column's storage type is returned as the error.
    pub(crate) fn push_column(
        &mut self,
        name: &str,
        ty: stmt::Type,
        storage_ty: Type,
        nullable: bool,
        primary_key: bool,
    ) -> Result<ColumnId, Type> {
        if let Some(existing) = self.columns.iter().position(|column| column.name == name) {
            let existing = &self.columns[existing];
            if existing.storage_ty != storage_ty {
                return Err(existing.storage_ty.clone());
            }
            return Ok(existing.id);
        }

        let id = ColumnId {
            table: self.id,
            index: self.columns.len(),
        };

        self.columns.push(Column {
            id,
            name: name.to_string(),
            ty,
            storage_ty,
            nullable,
            primary_key,
        });

        Ok(id)
    }
}

impl TableId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
