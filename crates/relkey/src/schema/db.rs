//! Database-level schema: the tables and columns the mapping model produces.

mod column;
pub use column::{Column, ColumnId};

mod schema;
pub use schema::Schema;

mod table;
pub use table::{Table, TableId};

mod ty;
pub use ty::Type;
