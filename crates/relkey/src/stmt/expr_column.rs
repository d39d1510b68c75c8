use super::{Expr, TableReference};
use crate::schema::db::ColumnId;

/// A reference to a column through a specific table reference of a query.
///
/// Two references to the same physical column through different aliases are
/// different expressions; self-referencing joins depend on this.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExprColumn {
    /// Alias of the table reference the column is read through
    pub table_ref: String,

    /// The referenced column
    pub column: ColumnId,

    /// The column name, kept for rendering
    pub name: String,
}

impl Expr {
    pub fn column(column: impl Into<ExprColumn>) -> Self {
        column.into().into()
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }
}

impl ExprColumn {
    pub fn new(table_ref: &TableReference, column: ColumnId, name: impl Into<String>) -> Self {
        debug_assert_eq!(table_ref.table, column.table);

        ExprColumn {
            table_ref: table_ref.alias.clone(),
            column,
            name: name.into(),
        }
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
