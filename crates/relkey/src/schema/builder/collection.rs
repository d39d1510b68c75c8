use super::{
    attribute::Owner, join_table, side::ReferringColumns, table::NewColumn, to_one,
    CreationProcess, SubPartGroup,
};
use crate::{
    schema::{
        app::{self, Collection, CollectionElement, FieldId, ModelId},
        db::{self, TableId},
        mapping::{self, FieldCollection, KeyPartId, KeyPartKind, SideKey},
        NavigableRole,
    },
    Error, Result,
};

pub(super) fn build(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    collection: &Collection,
) -> Result<mapping::Field> {
    let role = owner.field_role(field);
    let key_role = role.append("{key}");
    let owner_prefix = cx.app().model(owner.model).name.snake_case();

    let mapped = match (&collection.element, &collection.mapped_by) {
        (CollectionElement::Entity(target), Some(mapped_by)) => {
            if collection.join_table.is_some() {
                return Err(Error::mapping_model_creation(
                    &role,
                    "a mapped-by collection cannot declare a join table",
                ));
            }

            let key = cx.new_key_part(key_role.clone(), KeyPartKind::Collection, field.id);
            to_one::subscribe_to_mapped_by(cx, key, key_role, *target, mapped_by, owner.model)?;

            FieldCollection {
                table: cx.mapping().model(*target).table,
                key,
                element_key: None,
                element_column: None,
            }
        }
        (CollectionElement::Basic(_), Some(_)) => {
            return Err(Error::mapping_model_creation(
                &role,
                "an element collection cannot be mapped by another attribute",
            ))
        }
        (CollectionElement::Entity(target), None) => match &collection.join_table {
            Some(join_table) => {
                let table = collection_table(cx, owner, field, join_table.name.as_deref(), &role)?;

                let key = inline_key(
                    cx,
                    InlineKey {
                        role: key_role.clone(),
                        field: field.id,
                        owner: owner.model,
                        referenced_field: collection.key_referenced_field.clone(),
                        columns: ReferringColumns {
                            role: key_role,
                            table,
                            prefix: owner_prefix,
                            explicit: join_table.key_columns.clone(),
                            nullable: false,
                            primary_key: true,
                        },
                    },
                )?;

                let element_key = join_table::build(
                    cx,
                    role.append("{element}"),
                    field.id,
                    *target,
                    ReferringColumns {
                        role: role.append("{element}"),
                        table,
                        prefix: field.name.storage_name().to_string(),
                        explicit: join_table.element_columns.clone(),
                        nullable: false,
                        primary_key: true,
                    },
                )?;

                FieldCollection {
                    table,
                    key,
                    element_key: Some(element_key),
                    element_column: None,
                }
            }
            None => {
                // Unidirectional one-to-many: the key columns live in the
                // element table and are null for unowned rows
                let table = cx.mapping().model(*target).table;

                let key = inline_key(
                    cx,
                    InlineKey {
                        role: key_role.clone(),
                        field: field.id,
                        owner: owner.model,
                        referenced_field: collection.key_referenced_field.clone(),
                        columns: ReferringColumns {
                            role: key_role,
                            table,
                            prefix: field.name.storage_name().to_string(),
                            explicit: collection.key_columns.clone(),
                            nullable: true,
                            primary_key: false,
                        },
                    },
                )?;

                FieldCollection {
                    table,
                    key,
                    element_key: None,
                    element_column: None,
                }
            }
        },
        (CollectionElement::Basic(element), None) => {
            let table_name = collection
                .join_table
                .as_ref()
                .and_then(|join_table| join_table.name.as_deref());
            let table = collection_table(cx, owner, field, table_name, &role)?;

            let key = inline_key(
                cx,
                InlineKey {
                    role: key_role.clone(),
                    field: field.id,
                    owner: owner.model,
                    referenced_field: collection.key_referenced_field.clone(),
                    columns: ReferringColumns {
                        role: key_role,
                        table,
                        prefix: owner_prefix,
                        explicit: collection.key_columns.clone(),
                        nullable: false,
                        primary_key: false,
                    },
                },
            )?;

            let storage_ty = db::Type::from_app(
                &element.ty,
                element.storage_ty.as_ref(),
                &cx.capability().storage_types,
            )?;

            let element_column = cx.add_column(
                &role,
                table,
                NewColumn {
                    name: field.name.storage_name().to_string(),
                    ty: element.ty,
                    storage_ty,
                    nullable: false,
                    primary_key: false,
                },
            )?;

            FieldCollection {
                table,
                key,
                element_key: None,
                element_column: Some(element_column),
            }
        }
    };

    Ok(mapping::Field::Collection(mapped))
}

/// A collection key that computes its own foreign key.
struct InlineKey {
    role: NavigableRole,
    field: FieldId,
    owner: ModelId,
    referenced_field: Option<String>,
    columns: ReferringColumns,
}

/// Creates a key computing its foreign key once the owner's identifier, or
/// the referenced owner field, is mapped.
fn inline_key(cx: &mut CreationProcess<'_>, spec: InlineKey) -> Result<KeyPartId> {
    let InlineKey {
        role,
        field,
        owner,
        referenced_field,
        columns,
    } = spec;

    let key = cx.new_key_part(role.clone(), KeyPartKind::Collection, field);

    let group = match referenced_field {
        Some(_) => SubPartGroup::Normal,
        None => SubPartGroup::Root,
    };

    cx.register_sub_part_group_initialization_listener(owner, group, move |cx| {
        let target_side = match &referenced_field {
            Some(name) => cx.referenced_field_side(&role, owner, name)?,
            None => cx.identifier_side(owner)?,
        };

        let referring_side = cx.referring_side(SideKey::KeyPart(key), columns, &target_side)?;
        let foreign_key = cx.add_foreign_key(referring_side, target_side)?;
        cx.set_foreign_key(key, foreign_key)
    })?;

    Ok(key)
}

/// Registers the table holding the collection's rows. Unless named, it is
/// called `{owner table}_{field}`.
fn collection_table(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    name: Option<&str>,
    role: &NavigableRole,
) -> Result<TableId> {
    let name = match name {
        Some(name) => cx.prefix_table_name(name),
        None => format!(
            "{}_{}",
            cx.table(owner.table).name,
            field.name.storage_name()
        ),
    };

    cx.register_table(&name, role)
}
