mod attribute;
mod collection;
mod identifier;
mod join_table;

mod process;
pub use process::{CreationProcess, SubPartGroup};

mod side;
mod table;
mod to_one;

use super::{app, db, Schema};
use crate::{driver, Result};
use std::sync::Arc;

#[derive(Debug)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            table_name_prefix: None,
        }
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Builds the mapping model of `app` for the database described by `db`.
    ///
    /// Models are processed in registration order. Associations whose keys
    /// depend on models not processed yet wait for them; the result does not
    /// depend on the order.
    pub fn build(&self, app: app::Schema, db: &driver::Capability) -> Result<Schema> {
        let (tables, mapping) = {
            let mut cx = CreationProcess::new(self, &app, db);
            cx.create_mapping_model()?;
            cx.finish()?
        };

        let schema = Schema {
            app,
            db: Arc::new(db::Schema { tables }),
            mapping,
        };

        // Verify the schema structure
        schema.verify()?;

        Ok(schema)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationProcess<'_> {
    fn create_mapping_model(&mut self) -> Result<()> {
        let app = self.app();

        // Tables first, so every model's table exists before any association
        // refers to it. Embedded models are flattened into their owners.
        for model in app.models().filter(|model| model.is_root()) {
            self.build_table_stub_for_model(model)?;
        }

        for model in app.models().filter(|model| model.is_root()) {
            let id = model.id;

            // Attributes may refer to the model's own identifier, so they are
            // mapped once it is available.
            self.register_sub_part_group_initialization_listener(
                id,
                SubPartGroup::Root,
                move |cx| {
                    attribute::build_attributes(cx, id)?;
                    cx.mark_ready(id, SubPartGroup::Normal)
                },
            )?;

            identifier::build_identifier(self, id)?;
        }

        self.execute_post_init_callbacks()
    }
}
