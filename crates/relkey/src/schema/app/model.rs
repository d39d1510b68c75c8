use super::{Field, FieldId, FieldTy, Name, PrimaryKey};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    /// Fields contained by the model
    pub fields: Vec<Field>,

    /// Distinguishes root models (with tables and primary keys) from embedded models
    pub kind: ModelKind,
}

#[derive(Debug, Clone)]
pub enum ModelKind {
    /// Root model that maps to a database table
    Root(ModelRoot),
    /// Embedded model that is flattened into its owner's table
    Embedded,
}

#[derive(Debug, Clone)]
pub struct ModelRoot {
    /// The primary key for this model. Root models must have a primary key.
    pub primary_key: PrimaryKey,

    /// If the schema specifies a table to map the model to, this is set.
    pub table_name: Option<String>,

    /// Additional tables holding some of the model's columns. Each one
    /// receives a copy of the identifier columns.
    pub secondary_tables: Vec<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn root(id: ModelId, name: &str) -> Self {
        Self {
            id,
            name: Name::new(name),
            fields: vec![],
            kind: ModelKind::Root(ModelRoot {
                primary_key: PrimaryKey { fields: vec![] },
                table_name: None,
                secondary_tables: vec![],
            }),
        }
    }

    pub fn embedded(id: ModelId, name: &str) -> Self {
        Self {
            id,
            name: Name::new(name),
            fields: vec![],
            kind: ModelKind::Embedded,
        }
    }

    /// Appends a field to the model.
    pub fn with_field(mut self, name: &str, ty: impl Into<FieldTy>) -> Self {
        let id = self.id.field(self.fields.len());
        self.fields.push(Field::new(id, name, ty));
        self
    }

    /// Appends a nullable field to the model.
    pub fn with_nullable_field(mut self, name: &str, ty: impl Into<FieldTy>) -> Self {
        let id = self.id.field(self.fields.len());
        let mut field = Field::new(id, name, ty);
        field.nullable = true;
        self.fields.push(field);
        self
    }

    /// Appends a field to the model and to its primary key.
    #[track_caller]
    pub fn with_id_field(mut self, name: &str, ty: impl Into<FieldTy>) -> Self {
        let id = self.id.field(self.fields.len());
        let mut field = Field::new(id, name, ty);
        field.primary_key = true;
        self.fields.push(field);
        self.expect_root_mut().primary_key.fields.push(id);
        self
    }

    /// Overrides the storage name of the last field added.
    #[track_caller]
    pub fn with_column_name(mut self, column: &str) -> Self {
        let field = self.fields.last_mut().expect("model has no fields");
        field.name.storage_name = Some(column.to_string());
        self
    }

    #[track_caller]
    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.expect_root_mut().table_name = Some(table_name.to_string());
        self
    }

    #[track_caller]
    pub fn with_secondary_table(mut self, table_name: &str) -> Self {
        self.expect_root_mut()
            .secondary_tables
            .push(table_name.to_string());
        self
    }

    /// Returns true if this is a root model (has a table and primary key)
    pub fn is_root(&self) -> bool {
        matches!(self.kind, ModelKind::Root(_))
    }

    /// Returns true if this is an embedded model (flattened into its owner)
    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, ModelKind::Embedded)
    }

    pub fn as_root(&self) -> Option<&ModelRoot> {
        match &self.kind {
            ModelKind::Root(root) => Some(root),
            ModelKind::Embedded => None,
        }
    }

    #[track_caller]
    pub fn expect_root(&self) -> &ModelRoot {
        match &self.kind {
            ModelKind::Root(root) => root,
            ModelKind::Embedded => panic!("expected root model, but `{:?}` is embedded", self.id),
        }
    }

    #[track_caller]
    pub fn expect_root_mut(&mut self) -> &mut ModelRoot {
        let id = self.id;
        match &mut self.kind {
            ModelKind::Root(root) => root,
            ModelKind::Embedded => panic!("expected root model, but `{id:?}` is embedded"),
        }
    }

    /// Returns the primary key if this is a root model, None if embedded
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.as_root().map(|root| &root.primary_key)
    }

    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    /// Iterate over the fields used for the model's primary key.
    /// Returns None if this is an embedded model.
    pub fn primary_key_fields(&self) -> Option<impl ExactSizeIterator<Item = &'_ Field>> {
        self.primary_key().map(|pk| {
            pk.fields
                .iter()
                .map(|pk_field| &self.fields[pk_field.index])
        })
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl From<&ModelId> for ModelId {
    fn from(src: &ModelId) -> ModelId {
        *src
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
