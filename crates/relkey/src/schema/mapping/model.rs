use super::Field;
use crate::schema::{
    app::ModelId,
    db::{ColumnId, TableId},
};

/// Defines how a model is stored in the database.
#[derive(Debug)]
pub struct Model {
    /// The model this mapping applies to
    pub id: ModelId,

    /// The model's primary table
    pub table: TableId,

    /// Secondary tables, in declaration order
    pub secondary_tables: Vec<TableId>,

    /// Identifier columns in the primary table, in leaf declaration order.
    /// Empty until the model's root sub-parts are ready.
    pub identifier: Vec<ColumnId>,

    /// Per-field mappings, indexed by field index. A slot is `None` until the
    /// field has been mapped.
    pub fields: Vec<Option<Field>>,
}

impl Model {
    pub(crate) fn new(id: ModelId, table: TableId, num_fields: usize) -> Self {
        Self {
            id,
            table,
            secondary_tables: vec![],
            identifier: vec![],
            fields: (0..num_fields).map(|_| None).collect(),
        }
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    pub fn tables(&self) -> impl Iterator<Item = TableId> + '_ {
        std::iter::once(self.table).chain(self.secondary_tables.iter().copied())
    }
}
