use super::{table::NewColumn, CreationProcess, SubPartGroup};
use crate::{
    schema::{
        app::{FieldTy, ModelId},
        db::{ColumnId, TableId},
        mapping::{ForeignKey, Side, SideKey, VirtualAttribute},
        NavigableRole,
    },
    Error, Result,
};

/// Where and how to create the columns of a referring side.
pub(super) struct ReferringColumns {
    pub(super) role: NavigableRole,
    pub(super) table: TableId,

    /// Prepended to each target column name when no explicit names are given
    pub(super) prefix: String,

    /// Explicit column names, in target column order
    pub(super) explicit: Vec<String>,

    pub(super) nullable: bool,
    pub(super) primary_key: bool,
}

impl CreationProcess<'_> {
    /// The identifier of `model` as the target of a foreign key.
    pub(super) fn identifier_side(&self, model_id: ModelId) -> Result<Side> {
        debug_assert!(self.is_ready(model_id, SubPartGroup::Root));

        let app = self.app();
        let model = app.model(model_id);
        let role = NavigableRole::new(model.name.upper_camel_case()).append("{id}");
        let mapping = self.mapping().model(model_id);

        let columns = mapping
            .identifier
            .iter()
            .map(|column| self.side_column(*column))
            .collect::<Vec<_>>();

        let mut leaves = columns.clone().into_iter();
        let parts = model
            .primary_key_fields()
            .into_iter()
            .flatten()
            .map(|field| VirtualAttribute::copy_of(app, &role, field, mapping.table, &mut leaves))
            .collect::<Result<Vec<_>>>()?;

        Ok(Side::new(
            role,
            self.table(mapping.table),
            columns,
            SideKey::Identifier(model_id),
            parts,
        ))
    }

    /// A non-identifier field of `model` as the target of a foreign key.
    /// `role` is the association referring to it.
    pub(super) fn referenced_field_side(
        &self,
        role: &NavigableRole,
        model_id: ModelId,
        field_name: &str,
    ) -> Result<Side> {
        let app = self.app();
        let model = app.model(model_id);
        let model_name = model.name.upper_camel_case();

        let Some(field) = model.field_by_name(field_name) else {
            return Err(Error::mapping_model_creation(
                role,
                format!("referenced field `{model_name}.{field_name}` does not exist"),
            ));
        };

        if !matches!(field.ty, FieldTy::Primitive(_) | FieldTy::Embedded(_)) {
            return Err(Error::mapping_model_creation(
                role,
                format!("referenced field `{model_name}.{field_name}` is not a basic or embedded attribute"),
            ));
        }

        let mut ids = vec![];
        let mapped = self
            .mapping()
            .model(model_id)
            .field(field.id.index)
            .is_some_and(|mapped| mapped.collect_columns(self.mapping(), &mut ids));

        if !mapped {
            return Err(Error::mapping_model_creation(
                role,
                format!("referenced field `{model_name}.{field_name}` is not mapped"),
            ));
        }

        let table = single_table(role, &ids)?;
        let columns = ids
            .iter()
            .map(|column| self.side_column(*column))
            .collect::<Vec<_>>();

        let side_role = NavigableRole::new(model_name).append(&field.name.app_name);
        let mut leaves = columns.clone().into_iter();
        let part = VirtualAttribute::copy_of(app, &side_role, field, table, &mut leaves)?;

        Ok(Side::new(
            side_role,
            self.table(table),
            columns,
            SideKey::Field(field.id),
            vec![part],
        ))
    }

    /// Creates the columns referring to `target` and returns the side they
    /// form. Column types are taken from the target columns.
    pub(super) fn referring_side(
        &mut self,
        key: SideKey,
        spec: ReferringColumns,
        target: &Side,
    ) -> Result<Side> {
        let names = if spec.explicit.is_empty() {
            target
                .columns
                .iter()
                .map(|column| format!("{}_{}", spec.prefix, column.name))
                .collect::<Vec<_>>()
        } else {
            spec.explicit.clone()
        };

        ForeignKey::verify_column_count(&spec.role, names.len(), target)?;

        let mut columns = Vec::with_capacity(names.len());
        for (name, target_column) in names.into_iter().zip(&target.columns) {
            let ty = self.table(target_column.id.table).column(target_column.id).ty;
            let id = self.add_column(
                &spec.role,
                spec.table,
                NewColumn {
                    name,
                    ty,
                    storage_ty: target_column.ty.clone(),
                    nullable: spec.nullable,
                    primary_key: spec.primary_key,
                },
            )?;
            columns.push(self.side_column(id));
        }

        let mut leaves = columns.clone().into_iter();
        let parts = target
            .parts
            .iter()
            .map(|part| part.rebind(&spec.role, spec.table, &mut leaves))
            .collect::<Result<Vec<_>>>()?;

        Ok(Side::new(
            spec.role,
            self.table(spec.table),
            columns,
            key,
            parts,
        ))
    }
}

/// The one table all of a key's columns live in.
fn single_table(role: &NavigableRole, columns: &[ColumnId]) -> Result<TableId> {
    let Some(first) = columns.first() else {
        return Err(Error::mapping_model_creation(role, "key has no columns"));
    };

    if columns.iter().any(|column| column.table != first.table) {
        return Err(Error::mapping_model_creation(
            role,
            "composite key is ambiguous: its columns span more than one table",
        ));
    }

    Ok(first.table)
}
