use super::{KeyPartId, Mapping};
use crate::schema::db::{ColumnId, TableId};

/// Maps a single app-level field to its storage.
#[derive(Debug)]
pub enum Field {
    Primitive(FieldPrimitive),
    Embedded(FieldEmbedded),
    ToOne(FieldToOne),
    Collection(FieldCollection),
}

#[derive(Debug)]
pub struct FieldPrimitive {
    /// The column storing the field
    pub column: ColumnId,
}

#[derive(Debug)]
pub struct FieldEmbedded {
    /// Mappings of the embedded model's fields, in declaration order
    pub fields: Vec<Field>,
}

#[derive(Debug)]
pub struct FieldToOne {
    pub key: KeyPartId,
}

#[derive(Debug)]
pub struct FieldCollection {
    /// Table holding the collection key columns: a collection table, a join
    /// table, or the element model's table
    pub table: TableId,

    pub key: KeyPartId,

    /// Join-table key referring to the element model, for many-to-many
    pub element_key: Option<KeyPartId>,

    /// Value column of an element collection
    pub element_column: Option<ColumnId>,
}

impl Field {
    pub fn as_primitive(&self) -> Option<&FieldPrimitive> {
        match self {
            Field::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&FieldEmbedded> {
        match self {
            Field::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn as_to_one(&self) -> Option<&FieldToOne> {
        match self {
            Field::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&FieldCollection> {
        match self {
            Field::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Appends the columns storing this field's value, in leaf order.
    ///
    /// A to-one contributes its foreign key columns. Returns `false` when a
    /// to-one's key is not resolved yet; collections contribute nothing.
    pub fn collect_columns(&self, mapping: &Mapping, out: &mut Vec<ColumnId>) -> bool {
        match self {
            Field::Primitive(primitive) => {
                out.push(primitive.column);
                true
            }
            Field::Embedded(embedded) => embedded
                .fields
                .iter()
                .all(|field| field.collect_columns(mapping, out)),
            Field::ToOne(to_one) => {
                let key_part = mapping.key_part(to_one.key);
                match key_part.side(mapping) {
                    Some(side) => {
                        out.extend(side.columns.iter().map(|column| column.id));
                        true
                    }
                    None => false,
                }
            }
            Field::Collection(_) => true,
        }
    }
}
