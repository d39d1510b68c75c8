use super::TableReference;
use crate::schema::db::TableId;

/// The table references contributed by one entity (or collection) to a query.
///
/// The primary reference is the one the group is driven by; secondary
/// references cover additional tables of the same entity.
#[derive(Debug, Clone)]
pub struct TableGroup {
    primary: TableReference,
    secondary: Vec<TableReference>,
}

impl TableGroup {
    pub fn new(primary: TableReference) -> Self {
        Self {
            primary,
            secondary: vec![],
        }
    }

    pub fn with_secondary(mut self, reference: TableReference) -> Self {
        self.secondary.push(reference);
        self
    }

    pub fn primary(&self) -> &TableReference {
        &self.primary
    }

    pub fn references(&self) -> impl Iterator<Item = &TableReference> + '_ {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    /// Finds the reference this group uses for `table`, if any.
    pub fn table_reference(&self, table: TableId) -> Option<&TableReference> {
        self.references().find(|reference| reference.references(table))
    }
}
