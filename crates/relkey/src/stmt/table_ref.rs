use crate::schema::db::{Table, TableId};

/// A table as it appears in a query, under an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReference {
    /// Alias the table is referenced by (`o1`, `l2`, ...)
    pub alias: String,

    /// The physical table
    pub table: TableId,
}

impl TableReference {
    pub fn new(alias: impl Into<String>, table: TableId) -> Self {
        Self {
            alias: alias.into(),
            table,
        }
    }

    pub fn for_table(alias: impl Into<String>, table: &Table) -> Self {
        Self::new(alias, table.id)
    }

    pub fn references(&self, table_id: TableId) -> bool {
        self.table == table_id
    }
}
