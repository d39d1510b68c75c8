use super::{ForeignKeyId, KeyPartId, KeyProjection, VirtualAttribute};
use crate::{
    schema::{
        app::{FieldId, ModelId},
        db::{self, ColumnId, TableId},
        NavigableRole,
    },
    stmt::{Fetch, SqlSelections, TableGroup, TableReference},
    Error, Result,
};

/// One side of a foreign key: a table and the ordered columns in it.
#[derive(Debug, Clone)]
pub struct Side {
    /// The model part whose columns make up the side
    pub role: NavigableRole,

    pub table: TableId,

    pub table_name: String,

    /// One column for a basic key, N for a composite key
    pub columns: Vec<SideColumn>,

    /// The model part reading the side's value
    pub key: SideKey,

    /// Structural projection of the columns, in leaf declaration order
    pub parts: Vec<VirtualAttribute>,

    foreign_key: ForeignKeyId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideColumn {
    pub id: ColumnId,
    pub name: String,
    pub ty: db::Type,
}

/// Identifies the model part that projects a side's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideKey {
    /// An association's key
    KeyPart(KeyPartId),

    /// A referenced, non-identifier field
    Field(FieldId),

    /// A model's identifier
    Identifier(ModelId),
}

impl Side {
    pub fn new(
        role: NavigableRole,
        table: &db::Table,
        columns: Vec<SideColumn>,
        key: SideKey,
        parts: Vec<VirtualAttribute>,
    ) -> Self {
        Self {
            role,
            table: table.id,
            table_name: table.name.clone(),
            columns,
            key,
            parts,
            foreign_key: ForeignKeyId::placeholder(),
        }
    }

    /// The foreign key this side belongs to.
    pub fn foreign_key(&self) -> ForeignKeyId {
        self.foreign_key
    }

    pub(super) fn bind(&mut self, foreign_key: ForeignKeyId) {
        self.foreign_key = foreign_key;
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.columns.iter().map(|column| &column.name[..])
    }

    pub fn storage_types(&self) -> impl ExactSizeIterator<Item = &db::Type> + '_ {
        self.columns.iter().map(|column| &column.ty)
    }

    /// Calls `visitor` with the (table, column, storage type) of each column.
    pub fn visit_columns(&self, mut visitor: impl FnMut(&str, &str, &db::Type)) {
        for column in &self.columns {
            visitor(&self.table_name, &column.name, &column.ty);
        }
    }

    /// Finds this side's table in `table_group`.
    pub fn table_reference<'a>(&self, table_group: &'a TableGroup) -> Result<&'a TableReference> {
        table_group.table_reference(self.table).ok_or_else(|| {
            Error::mapping_model_creation(
                &self.role,
                format!("table `{}` is not part of the table group", self.table_name),
            )
        })
    }

    pub fn generate_fetch(
        &self,
        table_group: &TableGroup,
        selections: &mut SqlSelections,
    ) -> Result<Fetch> {
        let table_ref = self.table_reference(table_group)?;
        Ok(KeyProjection::generate_fetch(self, table_ref, selections))
    }
}

impl KeyProjection for Side {
    fn visit_columns(&self, visitor: &mut dyn FnMut(&SideColumn)) {
        for part in &self.parts {
            part.visit_columns(visitor);
        }
    }

    fn generate_fetch(&self, table_ref: &TableReference, selections: &mut SqlSelections) -> Fetch {
        match &self.parts[..] {
            [part] => part.generate_fetch(table_ref, selections),
            parts => Fetch::Composite {
                name: self.role.local_name().to_string(),
                fetches: parts
                    .iter()
                    .map(|part| part.generate_fetch(table_ref, selections))
                    .collect(),
            },
        }
    }
}
