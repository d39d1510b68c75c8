use super::Builder;
use crate::{
    driver,
    schema::{
        app::{self, FieldId, ModelId},
        db::{Table, TableId},
        mapping::{
            ForeignKey, ForeignKeyId, KeyPart, KeyPartId, KeyPartKind, Mapping, Side,
        },
        NavigableRole,
    },
    Error, Result,
};

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Groups of a model's mapped parts that become available together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubPartGroup {
    /// The identifier
    Root,

    /// Every other attribute
    Normal,
}

type GroupListener = Box<dyn FnOnce(&mut CreationProcess<'_>) -> Result<()>>;

struct PostInitCallback {
    description: String,
    callback: Box<dyn FnMut(&mut CreationProcess<'_>) -> Result<bool>>,
}

/// State of a mapping model build.
///
/// Every construction step receives the process explicitly. Work that depends
/// on parts not built yet is registered as a listener and runs, synchronously,
/// as soon as those parts become available.
pub struct CreationProcess<'a> {
    /// Build options
    builder: &'a Builder,

    app: &'a app::Schema,

    db: &'a driver::Capability,

    /// Maps table names to identifiers
    pub(super) table_lookup: IndexMap<String, TableId>,

    /// Tables as they are built
    pub(super) tables: Vec<Table>,

    mapping: Mapping,

    /// Sub-part groups that are ready
    ready: HashSet<(ModelId, SubPartGroup)>,

    /// Listeners waiting for a sub-part group, in registration order
    group_listeners: IndexMap<(ModelId, SubPartGroup), Vec<GroupListener>>,

    /// Retry queue, run after every model was processed
    post_init_callbacks: Vec<PostInitCallback>,
}

impl<'a> CreationProcess<'a> {
    pub(crate) fn new(builder: &'a Builder, app: &'a app::Schema, db: &'a driver::Capability) -> Self {
        Self {
            builder,
            app,
            db,
            table_lookup: IndexMap::new(),
            tables: vec![],
            mapping: Mapping::default(),
            ready: HashSet::new(),
            group_listeners: IndexMap::new(),
            post_init_callbacks: vec![],
        }
    }

    pub fn app(&self) -> &'a app::Schema {
        self.app
    }

    pub fn capability(&self) -> &'a driver::Capability {
        self.db
    }

    pub(super) fn builder(&self) -> &'a Builder {
        self.builder
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub(super) fn mapping_mut(&mut self) -> &mut Mapping {
        &mut self.mapping
    }

    pub fn key_part(&self, id: KeyPartId) -> &KeyPart {
        self.mapping.key_part(id)
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.mapping.foreign_key(id)
    }

    pub fn is_ready(&self, model: ModelId, group: SubPartGroup) -> bool {
        self.ready.contains(&(model, group))
    }

    /// Runs `listener` once `group` of `model` is ready: immediately if it
    /// already is, otherwise when the group is marked ready.
    pub fn register_sub_part_group_initialization_listener(
        &mut self,
        model: ModelId,
        group: SubPartGroup,
        listener: impl FnOnce(&mut CreationProcess<'_>) -> Result<()> + 'static,
    ) -> Result<()> {
        if self.is_ready(model, group) {
            return listener(self);
        }

        trace!(model = ?model, group = ?group, "waiting for sub-part group");
        self.group_listeners
            .entry((model, group))
            .or_default()
            .push(Box::new(listener));
        Ok(())
    }

    /// Marks `group` of `model` ready and runs its listeners in registration
    /// order.
    pub(crate) fn mark_ready(&mut self, model: ModelId, group: SubPartGroup) -> Result<()> {
        let inserted = self.ready.insert((model, group));
        assert!(inserted, "{group:?} sub-parts of {model:?} marked ready twice");

        let listeners = self
            .group_listeners
            .shift_remove(&(model, group))
            .unwrap_or_default();

        debug!(
            model = %self.app.model(model).name.upper_camel_case(),
            group = ?group,
            listeners = listeners.len(),
            "sub-part group ready"
        );

        for listener in listeners {
            listener(self)?;
        }

        Ok(())
    }

    /// Queues `callback` to run after every model was processed. It is called
    /// again on each pass until it returns `Ok(true)`.
    pub fn register_foreign_key_post_init_callback(
        &mut self,
        description: impl Into<String>,
        callback: impl FnMut(&mut CreationProcess<'_>) -> Result<bool> + 'static,
    ) {
        let description = description.into();
        trace!(description = %description, "post-init callback registered");
        self.post_init_callbacks.push(PostInitCallback {
            description,
            callback: Box::new(callback),
        });
    }

    /// Runs the post-init callbacks until all report completion. A pass that
    /// completes nothing and queues nothing new fails the build.
    pub(crate) fn execute_post_init_callbacks(&mut self) -> Result<()> {
        let mut pass = 0;

        while !self.post_init_callbacks.is_empty() {
            pass += 1;

            let pending = std::mem::take(&mut self.post_init_callbacks);
            let num_pending = pending.len();
            let mut remaining = Vec::with_capacity(num_pending);

            for mut entry in pending {
                let done = (entry.callback)(self).map_err(|err| {
                    err.context(crate::err!("post-init callback `{}` failed", entry.description))
                })?;

                if done {
                    debug!(description = %entry.description, pass, "post-init callback completed");
                } else {
                    trace!(description = %entry.description, pass, "post-init callback deferred");
                    remaining.push(entry);
                }
            }

            let completed = num_pending - remaining.len();
            let added = std::mem::take(&mut self.post_init_callbacks);

            if completed == 0 && added.is_empty() {
                let descriptions = remaining
                    .iter()
                    .map(|entry| entry.description.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(crate::err!(
                    "post-init callbacks made no progress; outstanding: {descriptions}"
                ));
            }

            remaining.extend(added);
            self.post_init_callbacks = remaining;
        }

        Ok(())
    }

    pub(crate) fn new_key_part(
        &mut self,
        role: NavigableRole,
        kind: KeyPartKind,
        owner: FieldId,
    ) -> KeyPartId {
        let id = KeyPartId(self.mapping.key_parts.len());
        self.mapping
            .key_parts
            .push(KeyPart::new(id, role, kind, owner));
        id
    }

    /// Runs `listener` once `key` has a foreign key: immediately if it already
    /// does, otherwise when it is set.
    pub fn register_foreign_key_initialization_listener(
        &mut self,
        key: KeyPartId,
        listener: impl FnOnce(&mut CreationProcess<'_>, ForeignKeyId) -> Result<()> + 'static,
    ) -> Result<()> {
        match self
            .mapping
            .key_part_mut(key)
            .register_listener(Box::new(listener))
        {
            Some((foreign_key, listener)) => listener(self, foreign_key),
            None => {
                trace!(role = %self.key_part(key).role, "waiting for foreign key");
                Ok(())
            }
        }
    }

    /// Assigns `foreign_key` to `key` and runs the listeners waiting for it.
    ///
    /// # Panics
    ///
    /// Panics if `key` already has a foreign key.
    pub fn set_foreign_key(&mut self, key: KeyPartId, foreign_key: ForeignKeyId) -> Result<()> {
        let fk = &self.mapping.foreign_keys[foreign_key.0];
        let key_part = &mut self.mapping.key_parts[key.0];
        let listeners = key_part.set_foreign_key(fk);

        debug!(
            role = %key_part.role,
            foreign_key = ?foreign_key,
            direction = ?key_part.direction(),
            listeners = listeners.len(),
            "foreign key resolved"
        );

        for listener in listeners {
            listener(self, foreign_key)?;
        }

        Ok(())
    }

    /// Stores a new foreign key from `referring` to `target`.
    pub fn add_foreign_key(&mut self, referring: Side, target: Side) -> Result<ForeignKeyId> {
        let id = ForeignKeyId(self.mapping.foreign_keys.len());
        let foreign_key = ForeignKey::new(id, referring, target)?;
        self.mapping.foreign_keys.push(foreign_key);
        Ok(id)
    }

    /// Ends the build, checking that nothing is left waiting.
    pub(crate) fn finish(self) -> Result<(Vec<Table>, Mapping)> {
        if let Some(((model, group), _)) = self.group_listeners.first() {
            let model = self.app.model(*model);
            return Err(Error::mapping_model_creation(
                &NavigableRole::new(model.name.upper_camel_case()),
                format!(
                    "{} sub-parts never became ready; the identifier depends on itself",
                    match group {
                        SubPartGroup::Root => "identifier",
                        SubPartGroup::Normal => "attribute",
                    }
                ),
            ));
        }

        if let Some(key_part) = self
            .mapping
            .key_parts
            .iter()
            .find(|key_part| !key_part.is_resolved())
        {
            return Err(Error::mapping_model_creation(
                &key_part.role,
                "foreign key was never resolved",
            ));
        }

        Ok((self.tables, self.mapping))
    }
}
