use super::{attribute::Owner, side::ReferringColumns, CreationProcess, SubPartGroup};
use crate::{
    schema::{
        app::{self, Cardinality, FieldTy, ModelId, ToOne},
        mapping::{self, FieldToOne, KeyPartId, KeyPartKind, SideKey},
        NavigableRole,
    },
    Error, Result,
};

pub(super) fn build(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    to_one: &ToOne,
) -> Result<mapping::Field> {
    let key = match &to_one.mapped_by {
        None => build_referring(cx, owner, field, to_one)?,
        Some(mapped_by) => build_target(cx, owner, field, to_one, mapped_by)?,
    };

    Ok(mapping::Field::ToOne(FieldToOne { key }))
}

/// The owning side computes the foreign key once the target's identifier, or
/// the referenced field, is mapped.
fn build_referring(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    to_one: &ToOne,
) -> Result<KeyPartId> {
    let role = owner.field_role(field);
    let key = cx.new_key_part(role.clone(), KeyPartKind::ToOneReferring, field.id);

    let target = to_one.target;
    let referenced_field = to_one.referenced_field.clone();
    let group = match referenced_field {
        Some(_) => SubPartGroup::Normal,
        None => SubPartGroup::Root,
    };

    let columns = ReferringColumns {
        role: role.clone(),
        table: owner.table,
        prefix: owner.column_name(field.name.storage_name()),
        explicit: to_one.join_columns.clone(),
        nullable: owner.nullable || field.nullable,
        primary_key: owner.primary_key,
    };

    cx.register_sub_part_group_initialization_listener(target, group, move |cx| {
        let target_side = match &referenced_field {
            Some(name) => cx.referenced_field_side(&role, target, name)?,
            None => cx.identifier_side(target)?,
        };

        let referring_side = cx.referring_side(SideKey::KeyPart(key), columns, &target_side)?;
        let foreign_key = cx.add_foreign_key(referring_side, target_side)?;
        cx.set_foreign_key(key, foreign_key)
    })?;

    Ok(key)
}

/// The inverse side of a one-to-one shares the foreign key of the to-one it is
/// mapped by.
fn build_target(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    to_one: &ToOne,
    mapped_by: &str,
) -> Result<KeyPartId> {
    let role = owner.field_role(field);

    match to_one.cardinality {
        Cardinality::OneToOne => {}
        Cardinality::ManyToOne => {
            return Err(Error::mapping_model_creation(
                &role,
                "a many-to-one always owns its foreign key and cannot be mapped by another attribute",
            ))
        }
        Cardinality::LogicalOneToOne => {
            return Err(Error::unsupported_feature(format!(
                "logical one-to-one `{role}` as a foreign-key target"
            )))
        }
    }

    let key = cx.new_key_part(role.clone(), KeyPartKind::ToOneTarget, field.id);
    subscribe_to_mapped_by(cx, key, role, to_one.target, mapped_by, owner.model)?;
    Ok(key)
}

/// Waits for the `mapped_by` to-one of `target` to be mapped, then takes its
/// foreign key once resolved. The to-one must refer back to `owner_model`.
pub(super) fn subscribe_to_mapped_by(
    cx: &mut CreationProcess<'_>,
    key: KeyPartId,
    role: NavigableRole,
    target: ModelId,
    mapped_by: &str,
    owner_model: ModelId,
) -> Result<()> {
    let mapped_by = mapped_by.to_string();

    cx.register_sub_part_group_initialization_listener(target, SubPartGroup::Normal, move |cx| {
        let pair = mapped_by_key(cx, &role, target, &mapped_by, owner_model)?;
        cx.register_foreign_key_initialization_listener(pair, move |cx, foreign_key| {
            cx.set_foreign_key(key, foreign_key)
        })
    })
}

fn mapped_by_key(
    cx: &CreationProcess<'_>,
    role: &NavigableRole,
    target: ModelId,
    mapped_by: &str,
    owner_model: ModelId,
) -> Result<KeyPartId> {
    let app = cx.app();
    let model = app.model(target);
    let path = format!("{}.{mapped_by}", model.name.upper_camel_case());

    let Some(pair) = model.field_by_name(mapped_by) else {
        return Err(Error::mapping_model_creation(
            role,
            format!("mapped-by attribute `{path}` does not exist"),
        ));
    };

    let FieldTy::ToOne(pair_to_one) = &pair.ty else {
        return Err(Error::mapping_model_creation(
            role,
            format!("mapped-by attribute `{path}` is not a to-one association"),
        ));
    };

    if pair_to_one.mapped_by.is_some() {
        return Err(Error::mapping_model_creation(
            role,
            format!("mapped-by attribute `{path}` is itself mapped by another attribute"),
        ));
    }

    if pair_to_one.target != owner_model {
        return Err(Error::mapping_model_creation(
            role,
            format!(
                "mapped-by attribute `{path}` does not refer to `{}`",
                app.model(owner_model).name.upper_camel_case()
            ),
        ));
    }

    match cx
        .mapping()
        .model(target)
        .field(pair.id.index)
        .and_then(mapping::Field::as_to_one)
    {
        Some(mapped) => Ok(mapped.key),
        None => Err(Error::mapping_model_creation(
            role,
            format!("mapped-by attribute `{path}` is not mapped"),
        )),
    }
}
