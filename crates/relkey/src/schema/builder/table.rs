use super::CreationProcess;
use crate::{
    schema::{
        app::Model,
        db::{self, ColumnId, Table, TableId},
        mapping::{self, SideColumn},
        Name, NavigableRole,
    },
    stmt, Error, Result,
};

/// A column to add to a table.
pub(crate) struct NewColumn {
    pub(crate) name: String,
    pub(crate) ty: stmt::Type,
    pub(crate) storage_ty: db::Type,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
}

impl CreationProcess<'_> {
    /// Creates the model's table, its secondary tables and an empty mapping.
    pub(super) fn build_table_stub_for_model(&mut self, model: &Model) -> Result<TableId> {
        let root = model.expect_root();
        let role = NavigableRole::new(model.name.upper_camel_case());

        let table_name = match &root.table_name {
            Some(table_name) => self.prefix_table_name(table_name),
            None => self.table_name_from_model(&model.name),
        };

        let table = self.register_table(&table_name, &role)?;
        let mut mapping = mapping::Model::new(model.id, table, model.fields.len());

        for secondary in &root.secondary_tables {
            let name = self.prefix_table_name(secondary);
            mapping.secondary_tables.push(self.register_table(&name, &role)?);
        }

        self.mapping_mut().models.insert(model.id, mapping);
        Ok(table)
    }

    pub(crate) fn register_table(&mut self, name: &str, role: &NavigableRole) -> Result<TableId> {
        self.check_identifier_length(role, name)?;

        if self.table_lookup.contains_key(name) {
            return Err(Error::mapping_model_creation(
                role,
                format!("table `{name}` is mapped twice"),
            ));
        }

        let id = TableId(self.tables.len());
        self.table_lookup.insert(name.to_string(), id);
        self.tables.push(Table::new(id, name.to_string()));
        Ok(id)
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.table_lookup.get(name).copied()
    }

    /// Adds a column to `table`. A column of the same name is shared when the
    /// storage types agree.
    pub(crate) fn add_column(
        &mut self,
        role: &NavigableRole,
        table: TableId,
        column: NewColumn,
    ) -> Result<ColumnId> {
        self.check_identifier_length(role, &column.name)?;

        let table = &mut self.tables[table.0];
        table
            .push_column(
                &column.name,
                column.ty,
                column.storage_ty.clone(),
                column.nullable,
                column.primary_key,
            )
            .map_err(|existing| {
                Error::mapping_model_creation(
                    role,
                    format!(
                        "column `{}.{}` is mapped as both {:?} and {:?}",
                        table.name, column.name, existing, column.storage_ty
                    ),
                )
            })
    }

    pub(crate) fn side_column(&self, id: ColumnId) -> SideColumn {
        let column = self.table(id.table).column(id);
        SideColumn {
            id,
            name: column.name.clone(),
            ty: column.storage_ty.clone(),
        }
    }

    pub(super) fn check_identifier_length(&self, role: &NavigableRole, name: &str) -> Result<()> {
        let max = self.capability().max_identifier_length;

        if name.len() > max {
            return Err(Error::mapping_model_creation(
                role,
                format!("identifier `{name}` is longer than {max} characters"),
            ));
        }

        Ok(())
    }

    fn table_name_from_model(&self, model_name: &Name) -> String {
        self.prefix_table_name(&model_name.plural_snake_case())
    }

    pub(super) fn prefix_table_name(&self, name: &str) -> String {
        if let Some(prefix) = &self.builder().table_name_prefix {
            format!("{prefix}{name}")
        } else {
            name.to_string()
        }
    }
}
