use super::*;

/// A single-valued association: many-to-one or one-to-one.
#[derive(Debug, Clone)]
pub struct ToOne {
    /// Associated model
    pub target: ModelId,

    pub cardinality: Cardinality,

    /// Name of the to-one on the target model that owns the foreign key. When
    /// set, this side is the inverse ("target") side of the association and
    /// never computes the foreign key itself.
    pub mapped_by: Option<String>,

    /// Name of the target field the foreign key references instead of the
    /// target's identifier.
    pub referenced_field: Option<String>,

    /// Explicit referring column names. When empty, names are derived from the
    /// field name and the referenced columns.
    pub join_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ManyToOne,
    OneToOne,

    /// A many-to-one constrained to be unique, standing in for a one-to-one.
    LogicalOneToOne,
}

impl ToOne {
    pub fn new(target: ModelId, cardinality: Cardinality) -> Self {
        Self {
            target,
            cardinality,
            mapped_by: None,
            referenced_field: None,
            join_columns: vec![],
        }
    }

    pub fn many_to_one(target: ModelId) -> Self {
        Self::new(target, Cardinality::ManyToOne)
    }

    pub fn one_to_one(target: ModelId) -> Self {
        Self::new(target, Cardinality::OneToOne)
    }

    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    pub fn referenced_field(mut self, field: impl Into<String>) -> Self {
        self.referenced_field = Some(field.into());
        self
    }

    pub fn join_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.join_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    /// True when this side owns the foreign key columns.
    pub fn is_referring(&self) -> bool {
        self.mapped_by.is_none()
    }
}

impl From<ToOne> for FieldTy {
    fn from(value: ToOne) -> Self {
        Self::ToOne(value)
    }
}
