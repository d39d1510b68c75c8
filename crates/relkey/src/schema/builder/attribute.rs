use super::{collection, table::NewColumn, to_one, CreationProcess};
use crate::{
    schema::{
        app::{self, FieldTy, ModelId},
        db::{self, TableId},
        mapping::{self, FieldEmbedded, FieldPrimitive},
        NavigableRole,
    },
    Error, Result,
};

/// The model part whose fields are being mapped, and where their columns go.
#[derive(Debug, Clone)]
pub(super) struct Owner {
    /// The root model whose tables hold the columns
    pub(super) model: ModelId,

    pub(super) table: TableId,

    /// Role of the model or embedded attribute containing the fields
    pub(super) role: NavigableRole,

    /// Column name prefix of the enclosing embedded attributes
    pub(super) prefix: Option<String>,

    pub(super) nullable: bool,

    /// True while mapping the identifier
    pub(super) primary_key: bool,
}

impl Owner {
    pub(super) fn root(cx: &CreationProcess<'_>, model: ModelId, primary_key: bool) -> Self {
        Self {
            model,
            table: cx.mapping().model(model).table,
            role: NavigableRole::new(cx.app().model(model).name.upper_camel_case()),
            prefix: None,
            nullable: false,
            primary_key,
        }
    }

    pub(super) fn field_role(&self, field: &app::Field) -> NavigableRole {
        self.role.append(&field.name.app_name)
    }

    pub(super) fn column_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}_{name}"),
            None => name.to_string(),
        }
    }

    pub(super) fn is_embedded(&self) -> bool {
        self.prefix.is_some()
    }

    fn embed(&self, field: &app::Field) -> Owner {
        Owner {
            role: self.field_role(field),
            prefix: Some(self.column_name(field.name.storage_name())),
            nullable: self.nullable || field.nullable,
            ..self.clone()
        }
    }
}

/// Maps every field of `model_id` not already mapped as part of the
/// identifier.
pub(super) fn build_attributes(cx: &mut CreationProcess<'_>, model_id: ModelId) -> Result<()> {
    let model = cx.app().model(model_id);
    let owner = Owner::root(cx, model_id, false);

    for field in &model.fields {
        if cx.mapping().model(model_id).field(field.id.index).is_some() {
            continue;
        }

        let mapped = map_field(cx, &owner, field)?;
        cx.mapping_mut().model_mut(model_id).fields[field.id.index] = Some(mapped);
    }

    Ok(())
}

pub(super) fn map_field(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
) -> Result<mapping::Field> {
    match &field.ty {
        FieldTy::Primitive(primitive) => map_primitive(cx, owner, field, primitive),
        FieldTy::Embedded(embedded) => {
            let nested = owner.embed(field);
            let fields = embedded
                .target(cx.app())
                .fields
                .iter()
                .map(|sub| map_field(cx, &nested, sub))
                .collect::<Result<_>>()?;

            Ok(mapping::Field::Embedded(FieldEmbedded { fields }))
        }
        FieldTy::ToOne(to_one) => to_one::build(cx, owner, field, to_one),
        FieldTy::Collection(_) if owner.is_embedded() => Err(Error::unsupported_feature(
            format!("collection `{}` inside an embedded attribute", owner.field_role(field)),
        )),
        FieldTy::Collection(collection) => collection::build(cx, owner, field, collection),
    }
}

fn map_primitive(
    cx: &mut CreationProcess<'_>,
    owner: &Owner,
    field: &app::Field,
    primitive: &app::FieldPrimitive,
) -> Result<mapping::Field> {
    let role = owner.field_role(field);

    let table = match &primitive.table {
        None => owner.table,
        Some(_) if owner.primary_key => {
            return Err(Error::mapping_model_creation(
                &role,
                "identifier attributes must be stored in the primary table",
            ))
        }
        Some(name) => {
            let name = cx.prefix_table_name(name);
            cx.table_id(&name)
                .filter(|table| cx.mapping().model(owner.model).secondary_tables.contains(table))
                .ok_or_else(|| {
                    Error::mapping_model_creation(
                        &role,
                        format!("table `{name}` is not a secondary table of the model"),
                    )
                })?
        }
    };

    let storage_ty = db::Type::from_app(
        &primitive.ty,
        primitive.storage_ty.as_ref(),
        &cx.capability().storage_types,
    )?;

    let column = cx.add_column(
        &role,
        table,
        NewColumn {
            name: owner.column_name(field.name.storage_name()),
            ty: primitive.ty,
            storage_ty,
            nullable: owner.nullable || field.nullable,
            primary_key: owner.primary_key,
        },
    )?;

    Ok(mapping::Field::Primitive(FieldPrimitive { column }))
}
