mod primitive;
pub use primitive::FieldPrimitive;

use super::{Collection, Embedded, Model, ModelId, Schema, ToOne};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Primitive, embedded, association, ...
    pub ty: FieldTy,

    /// True if the field can be nullable (`None` in Rust).
    pub nullable: bool,

    /// True if the field is part of the primary key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

#[derive(Clone)]
pub enum FieldTy {
    Primitive(FieldPrimitive),
    Embedded(Embedded),
    ToOne(ToOne),
    Collection(Collection),
}

impl Field {
    pub fn new(id: FieldId, name: &str, ty: impl Into<FieldTy>) -> Self {
        Self {
            id,
            name: FieldName::new(name),
            ty: ty.into(),
            nullable: false,
            primary_key: false,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn ty(&self) -> &FieldTy {
        &self.ty
    }

    pub fn is_association(&self) -> bool {
        self.ty.is_association()
    }

    /// Returns a fully qualified name for the field.
    pub fn full_name(&self, schema: &Schema) -> String {
        let model = schema.model(self.id.model);
        format!("{}.{}", model.name.upper_camel_case(), self.name.app_name)
    }

    /// If the field is an association, return the associated model.
    pub fn association_target_id(&self) -> Option<ModelId> {
        match &self.ty {
            FieldTy::ToOne(to_one) => Some(to_one.target),
            FieldTy::Collection(collection) => collection.target(),
            _ => None,
        }
    }

    pub fn association_target<'a>(&self, schema: &'a Schema) -> Option<&'a Model> {
        self.association_target_id().map(|id| schema.model(id))
    }

    /// The name of the attribute owning the foreign key on the other side, if
    /// this is the inverse side of an association.
    pub fn mapped_by(&self) -> Option<&str> {
        match &self.ty {
            FieldTy::ToOne(to_one) => to_one.mapped_by.as_deref(),
            FieldTy::Collection(collection) => collection.mapped_by.as_deref(),
            _ => None,
        }
    }
}

impl FieldName {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            storage_name: None,
        }
    }

    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn as_primitive(&self) -> Option<&FieldPrimitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_primitive(&self) -> &FieldPrimitive {
        match self {
            Self::Primitive(primitive) => primitive,
            _ => panic!("expected primitive field, but was {self:?}"),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(..))
    }

    pub fn as_embedded(&self) -> Option<&Embedded> {
        match self {
            Self::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::ToOne(..))
    }

    pub fn as_to_one(&self) -> Option<&ToOne> {
        match self {
            Self::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_to_one(&self) -> &ToOne {
        match self {
            Self::ToOne(to_one) => to_one,
            _ => panic!("expected to-one field, but was {self:?}"),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(..))
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn is_association(&self) -> bool {
        matches!(self, Self::ToOne(..) | Self::Collection(..))
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(fmt),
            Self::Embedded(ty) => ty.fmt(fmt),
            Self::ToOne(ty) => ty.fmt(fmt),
            Self::Collection(ty) => ty.fmt(fmt),
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
