use super::{
    attribute::{self, Owner},
    table::NewColumn,
    CreationProcess, SubPartGroup,
};
use crate::{
    schema::{
        app::{self, FieldTy, ModelId},
        NavigableRole,
    },
    Error, Result,
};

use tracing::{debug, trace};

/// Maps the identifier of `model_id` and marks its root sub-parts ready.
///
/// An identifier containing to-ones (a derived identifier) is built once the
/// identifiers of the referenced models are ready.
pub(super) fn build_identifier(cx: &mut CreationProcess<'_>, model_id: ModelId) -> Result<()> {
    let app = cx.app();
    let model = app.model(model_id);
    let role = NavigableRole::new(model.name.upper_camel_case());

    let mut dependencies = vec![];
    for field in model.primary_key_fields().into_iter().flatten() {
        collect_dependencies(app, &role, field, &mut dependencies)?;
    }

    if dependencies.contains(&model_id) {
        return Err(Error::mapping_model_creation(
            &role.append("{id}"),
            "identifier refers to its own model",
        ));
    }

    if let Some(dependency) = dependencies
        .into_iter()
        .find(|dependency| !cx.is_ready(*dependency, SubPartGroup::Root))
    {
        trace!(model = %role, dependency = ?dependency, "identifier waits for dependency");
        return cx.register_sub_part_group_initialization_listener(
            dependency,
            SubPartGroup::Root,
            move |cx| build_identifier(cx, model_id),
        );
    }

    let owner = Owner::root(cx, model_id, true);
    let mut identifier = vec![];

    for field in model.primary_key_fields().into_iter().flatten() {
        let mapped = attribute::map_field(cx, &owner, field)?;

        if !mapped.collect_columns(cx.mapping(), &mut identifier) {
            return Err(Error::mapping_model_creation(
                &owner.field_role(field),
                "identifier association did not resolve",
            ));
        }

        cx.mapping_mut().model_mut(model_id).fields[field.id.index] = Some(mapped);
    }

    // Secondary tables are keyed by a copy of the identifier
    let secondary_tables = cx.mapping().model(model_id).secondary_tables.clone();
    for table in secondary_tables {
        for column in &identifier {
            let source = cx.table(column.table).column(*column);
            let copy = NewColumn {
                name: source.name.clone(),
                ty: source.ty,
                storage_ty: source.storage_ty.clone(),
                nullable: false,
                primary_key: true,
            };
            cx.add_column(&role, table, copy)?;
        }
    }

    debug!(model = %role, columns = identifier.len(), "identifier mapped");
    cx.mapping_mut().model_mut(model_id).identifier = identifier;
    cx.mark_ready(model_id, SubPartGroup::Root)
}

fn collect_dependencies(
    app: &app::Schema,
    role: &NavigableRole,
    field: &app::Field,
    out: &mut Vec<ModelId>,
) -> Result<()> {
    let role = role.append(&field.name.app_name);

    match &field.ty {
        FieldTy::Primitive(_) => Ok(()),
        FieldTy::Embedded(embedded) => embedded
            .target(app)
            .fields
            .iter()
            .try_for_each(|sub| collect_dependencies(app, &role, sub, out)),
        FieldTy::ToOne(to_one) if to_one.mapped_by.is_some() => Err(Error::mapping_model_creation(
            &role,
            "an identifier association must own its foreign key",
        )),
        FieldTy::ToOne(to_one) if to_one.referenced_field.is_some() => {
            Err(Error::mapping_model_creation(
                &role,
                "an identifier association must refer to the target's identifier",
            ))
        }
        FieldTy::ToOne(to_one) => {
            out.push(to_one.target);
            Ok(())
        }
        FieldTy::Collection(_) => Err(Error::mapping_model_creation(
            &role,
            "a collection cannot be part of an identifier",
        )),
    }
}
