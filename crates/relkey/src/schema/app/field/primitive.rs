use crate::{schema::db, stmt};

#[derive(Debug, Clone)]
pub struct FieldPrimitive {
    /// The field's primitive type
    pub ty: stmt::Type,

    /// The database storage type of the field.
    ///
    /// This is specified as a hint.
    pub storage_ty: Option<db::Type>,

    /// Name of the secondary table the column lives in. The model's primary
    /// table is used when unset.
    pub table: Option<String>,
}

impl FieldPrimitive {
    pub fn new(ty: stmt::Type) -> Self {
        Self {
            ty,
            storage_ty: None,
            table: None,
        }
    }

    pub fn storage_ty(mut self, storage_ty: db::Type) -> Self {
        self.storage_ty = Some(storage_ty);
        self
    }

    pub fn in_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

impl From<FieldPrimitive> for super::FieldTy {
    fn from(value: FieldPrimitive) -> Self {
        Self::Primitive(value)
    }
}

impl From<stmt::Type> for super::FieldTy {
    fn from(value: stmt::Type) -> Self {
        Self::Primitive(FieldPrimitive::new(value))
    }
}

impl From<super::Embedded> for super::FieldTy {
    fn from(value: super::Embedded) -> Self {
        Self::Embedded(value)
    }
}
