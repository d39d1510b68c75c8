use super::*;

/// A plural association or element collection.
#[derive(Debug, Clone)]
pub struct Collection {
    pub element: CollectionElement,

    /// Name of the to-one on the element model that owns the foreign key.
    pub mapped_by: Option<String>,

    /// Name of the owner field the collection key references instead of the
    /// owner's identifier.
    pub key_referenced_field: Option<String>,

    /// Join table configuration. Setting this on an entity collection without
    /// `mapped_by` makes it a many-to-many.
    pub join_table: Option<JoinTable>,

    /// Explicit collection key column names, for collections stored in a
    /// collection table or in the element model's table.
    pub key_columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CollectionElement {
    /// Values stored in a collection table
    Basic(FieldPrimitive),

    /// Instances of another root model
    Entity(ModelId),
}

#[derive(Debug, Clone, Default)]
pub struct JoinTable {
    /// Table name; derived from the owner table and field name when unset
    pub name: Option<String>,

    /// Columns referring to the owner
    pub key_columns: Vec<String>,

    /// Columns referring to the element model
    pub element_columns: Vec<String>,
}

impl Collection {
    pub fn one_to_many(target: ModelId) -> Self {
        Self {
            element: CollectionElement::Entity(target),
            mapped_by: None,
            key_referenced_field: None,
            join_table: None,
            key_columns: vec![],
        }
    }

    pub fn many_to_many(target: ModelId) -> Self {
        Self {
            join_table: Some(JoinTable::default()),
            ..Self::one_to_many(target)
        }
    }

    pub fn elements(element: FieldPrimitive) -> Self {
        Self {
            element: CollectionElement::Basic(element),
            mapped_by: None,
            key_referenced_field: None,
            join_table: None,
            key_columns: vec![],
        }
    }

    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    pub fn key_referenced_field(mut self, field: impl Into<String>) -> Self {
        self.key_referenced_field = Some(field.into());
        self
    }

    pub fn join_table(mut self, join_table: JoinTable) -> Self {
        self.join_table = Some(join_table);
        self
    }

    pub fn key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The element model, if the elements are entities.
    pub fn target(&self) -> Option<ModelId> {
        match &self.element {
            CollectionElement::Entity(target) => Some(*target),
            CollectionElement::Basic(_) => None,
        }
    }

    pub fn is_many_to_many(&self) -> bool {
        self.target().is_some() && self.mapped_by.is_none() && self.join_table.is_some()
    }
}

impl From<Collection> for FieldTy {
    fn from(value: Collection) -> Self {
        Self::Collection(value)
    }
}
