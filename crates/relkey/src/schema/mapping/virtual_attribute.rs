use super::SideColumn;
use crate::{
    schema::{
        app::{self, FieldTy, ModelId},
        db::TableId,
        NavigableRole,
    },
    stmt::{ExprColumn, Fetch, SqlSelections, TableReference},
    Error, Result,
};

/// What a key projection can do: enumerate its columns and read its value.
pub trait KeyProjection {
    /// Calls `visitor` with each column, in leaf declaration order.
    fn visit_columns(&self, visitor: &mut dyn FnMut(&SideColumn));

    /// Adds the columns, read through `table_ref`, to the SELECT list.
    fn generate_fetch(&self, table_ref: &TableReference, selections: &mut SqlSelections) -> Fetch;
}

/// A non-persisted copy of an attribute, rebound to another table's columns.
///
/// Copies let a composite key be read through any table holding its columns,
/// for example a foreign key referring to a composite identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualAttribute {
    pub name: String,

    /// The attribute this is a copy of
    pub source: app::FieldId,

    pub table: TableId,

    pub kind: VirtualAttributeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VirtualAttributeKind {
    Basic { column: SideColumn },
    Embedded { parts: Vec<VirtualAttribute> },
    ToOne { target: ModelId, parts: Vec<VirtualAttribute> },
}

impl VirtualAttribute {
    /// Copies `field`, taking its columns from `columns` in leaf declaration
    /// order. A to-one contributes the leaves of its target's identifier.
    pub fn copy_of(
        app: &app::Schema,
        role: &NavigableRole,
        field: &app::Field,
        table: TableId,
        columns: &mut dyn Iterator<Item = SideColumn>,
    ) -> Result<VirtualAttribute> {
        let name = field.name.app_name.clone();

        let kind = match &field.ty {
            FieldTy::Primitive(_) => {
                let Some(column) = columns.next() else {
                    return Err(Error::mapping_model_creation(
                        role,
                        format!(
                            "ran out of columns copying `{}`",
                            field.full_name(app)
                        ),
                    ));
                };
                VirtualAttributeKind::Basic { column }
            }
            FieldTy::Embedded(embedded) => {
                let parts = embedded
                    .target(app)
                    .fields
                    .iter()
                    .map(|sub| Self::copy_of(app, role, sub, table, columns))
                    .collect::<Result<_>>()?;
                VirtualAttributeKind::Embedded { parts }
            }
            FieldTy::ToOne(to_one) => {
                let target = to_one.target(app);
                let parts = target
                    .primary_key_fields()
                    .into_iter()
                    .flatten()
                    .map(|sub| Self::copy_of(app, role, sub, table, columns))
                    .collect::<Result<_>>()?;
                VirtualAttributeKind::ToOne {
                    target: target.id,
                    parts,
                }
            }
            FieldTy::Collection(_) => {
                return Err(Error::mapping_model_creation(
                    role,
                    format!(
                        "collection `{}` cannot be part of a key",
                        field.full_name(app)
                    ),
                ))
            }
        };

        Ok(VirtualAttribute {
            name,
            source: field.id,
            table,
            kind,
        })
    }

    /// Clones this attribute onto `table`, replacing its columns with ones
    /// taken from `columns` in leaf order.
    pub fn rebind(
        &self,
        role: &NavigableRole,
        table: TableId,
        columns: &mut dyn Iterator<Item = SideColumn>,
    ) -> Result<VirtualAttribute> {
        let kind = match &self.kind {
            VirtualAttributeKind::Basic { .. } => {
                let Some(column) = columns.next() else {
                    return Err(Error::mapping_model_creation(
                        role,
                        format!("ran out of columns rebinding `{}`", self.name),
                    ));
                };
                VirtualAttributeKind::Basic { column }
            }
            VirtualAttributeKind::Embedded { parts } => VirtualAttributeKind::Embedded {
                parts: rebind_all(parts, role, table, columns)?,
            },
            VirtualAttributeKind::ToOne { target, parts } => VirtualAttributeKind::ToOne {
                target: *target,
                parts: rebind_all(parts, role, table, columns)?,
            },
        };

        Ok(VirtualAttribute {
            name: self.name.clone(),
            source: self.source,
            table,
            kind,
        })
    }

    pub fn columns(&self) -> Vec<&SideColumn> {
        let mut out = vec![];
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a SideColumn>) {
        match &self.kind {
            VirtualAttributeKind::Basic { column } => out.push(column),
            VirtualAttributeKind::Embedded { parts } | VirtualAttributeKind::ToOne { parts, .. } => {
                for part in parts {
                    part.collect_columns(out);
                }
            }
        }
    }
}

fn rebind_all(
    parts: &[VirtualAttribute],
    role: &NavigableRole,
    table: TableId,
    columns: &mut dyn Iterator<Item = SideColumn>,
) -> Result<Vec<VirtualAttribute>> {
    parts
        .iter()
        .map(|part| part.rebind(role, table, columns))
        .collect()
}

impl KeyProjection for VirtualAttribute {
    fn visit_columns(&self, visitor: &mut dyn FnMut(&SideColumn)) {
        match &self.kind {
            VirtualAttributeKind::Basic { column } => visitor(column),
            VirtualAttributeKind::Embedded { parts } | VirtualAttributeKind::ToOne { parts, .. } => {
                for part in parts {
                    part.visit_columns(visitor);
                }
            }
        }
    }

    fn generate_fetch(&self, table_ref: &TableReference, selections: &mut SqlSelections) -> Fetch {
        match &self.kind {
            VirtualAttributeKind::Basic { column } => {
                let expr = ExprColumn::new(table_ref, column.id, &column.name);
                Fetch::Basic {
                    name: self.name.clone(),
                    position: selections.resolve(expr, &column.ty),
                    ty: column.ty.clone(),
                }
            }
            VirtualAttributeKind::Embedded { parts } | VirtualAttributeKind::ToOne { parts, .. } => {
                Fetch::Composite {
                    name: self.name.clone(),
                    fetches: parts
                        .iter()
                        .map(|part| part.generate_fetch(table_ref, selections))
                        .collect(),
                }
            }
        }
    }
}
