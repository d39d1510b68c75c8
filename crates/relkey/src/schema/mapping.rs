mod field;
pub use field::{Field, FieldCollection, FieldEmbedded, FieldPrimitive, FieldToOne};

mod foreign_key;
pub use foreign_key::{ForeignKey, ForeignKeyId, ForeignKeyKind};

mod key_part;
pub use key_part::{ForeignKeyDirection, ForeignKeyListener, KeyPart, KeyPartId, KeyPartKind};

mod model;
pub use model::Model;

mod side;
pub use side::{Side, SideColumn, SideKey};

mod virtual_attribute;
pub use virtual_attribute::{KeyProjection, VirtualAttribute, VirtualAttributeKind};

use super::app::{FieldId, ModelId};
use indexmap::IndexMap;

/// Defines the correspondence between app-level models and database-level
/// tables, including every association key and the foreign key it resolved to.
///
/// The mapping is constructed during schema building and remains immutable
/// afterwards. Key parts and foreign keys live in arenas addressed by
/// [`KeyPartId`] and [`ForeignKeyId`]; a foreign key shared by both sides of a
/// bidirectional association is stored once.
#[derive(Debug, Default)]
pub struct Mapping {
    /// Per-model mappings indexed by model identifier.
    pub models: IndexMap<ModelId, Model>,

    /// Every association key, in creation order.
    pub key_parts: Vec<KeyPart>,

    /// Every resolved foreign key, in resolution order.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Mapping {
    /// Returns the mapping for the specified model.
    ///
    /// # Panics
    ///
    /// Panics if the model ID does not exist in the mapping.
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Returns a mutable reference to the mapping for the specified model.
    ///
    /// # Panics
    ///
    /// Panics if the model ID does not exist in the mapping.
    pub fn model_mut(&mut self, id: impl Into<ModelId>) -> &mut Model {
        self.models.get_mut(&id.into()).expect("invalid model ID")
    }

    pub fn key_part(&self, id: KeyPartId) -> &KeyPart {
        &self.key_parts[id.0]
    }

    pub(crate) fn key_part_mut(&mut self, id: KeyPartId) -> &mut KeyPart {
        &mut self.key_parts[id.0]
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[id.0]
    }

    /// The key of a to-one or collection field. For a many-to-many this is the
    /// key referring to the owner; see [`Mapping::element_key_part_for`].
    pub fn key_part_for(&self, field: FieldId) -> Option<&KeyPart> {
        self.key_parts
            .iter()
            .find(|key_part| key_part.owner == field && !key_part.kind.is_join_table())
    }

    /// The join-table key referring to the element model of a many-to-many.
    pub fn element_key_part_for(&self, field: FieldId) -> Option<&KeyPart> {
        self.key_parts
            .iter()
            .find(|key_part| key_part.owner == field && key_part.kind.is_join_table())
    }

    /// The key parts resolved to the given foreign key.
    pub fn key_parts_for_foreign_key(
        &self,
        id: ForeignKeyId,
    ) -> impl Iterator<Item = &KeyPart> + '_ {
        self.key_parts
            .iter()
            .filter(move |key_part| key_part.foreign_key() == Some(id))
    }
}
