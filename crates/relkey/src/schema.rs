pub mod app;

mod builder;
pub use builder::{Builder, CreationProcess, SubPartGroup};

pub mod db;

pub mod mapping;
use mapping::{ForeignKey, KeyPart, Mapping};

mod name;
pub use name::Name;

mod role;
pub use role::NavigableRole;

mod verify;

use app::{FieldId, ModelId};
use db::{Table, TableId};
use std::sync::Arc;

#[derive(Debug)]
pub struct Schema {
    /// Application-level schema
    pub app: app::Schema,

    /// Database-level schema
    pub db: Arc<db::Schema>,

    /// Maps the app-level schema to the db-level schema, including every
    /// association key and its foreign key
    pub mapping: Mapping,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn mapping_for(&self, id: impl Into<ModelId>) -> &mapping::Model {
        self.mapping.model(id)
    }

    pub fn table_for(&self, id: impl Into<ModelId>) -> &Table {
        self.db.table(self.table_id_for(id))
    }

    pub fn table_id_for(&self, id: impl Into<ModelId>) -> TableId {
        self.mapping.model(id).table
    }

    /// The key part of a to-one or collection field.
    pub fn key_part_for(&self, field: FieldId) -> Option<&KeyPart> {
        self.mapping.key_part_for(field)
    }

    /// The resolved foreign key of a to-one or collection field.
    pub fn foreign_key_for(&self, field: FieldId) -> Option<&ForeignKey> {
        let key_part = self.key_part_for(field)?;
        key_part
            .foreign_key()
            .map(|id| self.mapping.foreign_key(id))
    }
}
