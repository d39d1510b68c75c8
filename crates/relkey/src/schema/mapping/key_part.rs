use super::{ForeignKey, ForeignKeyId, Mapping, Side, SideKey};
use crate::{
    schema::{app::FieldId, CreationProcess, NavigableRole},
    stmt::{DomainResult, Fetch, Join, JoinType, SqlSelections, TableGroup},
    Error, Result,
};

use std::fmt;

/// Callback invoked once a key part's foreign key is known.
pub type ForeignKeyListener = Box<dyn FnOnce(&mut CreationProcess<'_>, ForeignKeyId) -> Result<()>>;

/// One side of an association's key, before and after its foreign key is
/// known.
///
/// A key part starts unresolved. The foreign key is assigned exactly once,
/// either by the key part's own association computing it or by subscribing to
/// the key part of the attribute it is mapped by. Listeners registered before
/// resolution are queued and run, in registration order, when the foreign key
/// is set; listeners registered afterwards run immediately.
pub struct KeyPart {
    pub id: KeyPartId,

    /// Path of the key within the domain model, for example `Order.lines.{key}`
    pub role: NavigableRole,

    pub kind: KeyPartKind,

    /// The to-one or collection field the key belongs to
    pub owner: FieldId,

    resolution: Option<Resolution>,

    listeners: Vec<ForeignKeyListener>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPartId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPartKind {
    /// Key of a collection, relating element rows to the owner
    Collection,

    /// Owning side of a many-to-one or one-to-one
    ToOneReferring,

    /// Inverse side of a one-to-one, mapped by the owning side
    ToOneTarget,

    /// Join-table key referring to the element model of a many-to-many
    JoinTable,
}

/// Which side of its foreign key a key part stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKeyDirection {
    /// The key part's columns hold the foreign key
    Referring,

    /// The key part's columns are referenced by the foreign key
    Target,
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    foreign_key: ForeignKeyId,
    direction: ForeignKeyDirection,
}

impl KeyPart {
    pub(crate) fn new(id: KeyPartId, role: NavigableRole, kind: KeyPartKind, owner: FieldId) -> Self {
        Self {
            id,
            role,
            kind,
            owner,
            resolution: None,
            listeners: vec![],
        }
    }

    pub fn foreign_key(&self) -> Option<ForeignKeyId> {
        self.resolution.map(|resolution| resolution.foreign_key)
    }

    pub fn direction(&self) -> Option<ForeignKeyDirection> {
        self.resolution.map(|resolution| resolution.direction)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Number of listeners waiting for the foreign key.
    pub fn pending_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Records the foreign key and returns the queued listeners, in
    /// registration order. The caller invokes them.
    ///
    /// # Panics
    ///
    /// Panics if the foreign key was already set or if `foreign_key` was not
    /// bound to its sides.
    pub(crate) fn set_foreign_key(&mut self, foreign_key: &ForeignKey) -> Vec<ForeignKeyListener> {
        assert!(
            self.resolution.is_none(),
            "foreign key of `{}` set twice",
            self.role
        );
        assert!(
            foreign_key.referring_side().foreign_key() == foreign_key.id
                && foreign_key.target_side().foreign_key() == foreign_key.id,
            "foreign key {:?} is missing its sides",
            foreign_key.id
        );

        let direction = if foreign_key.referring_side().key == SideKey::KeyPart(self.id) {
            ForeignKeyDirection::Referring
        } else {
            ForeignKeyDirection::Target
        };

        self.resolution = Some(Resolution {
            foreign_key: foreign_key.id,
            direction,
        });

        std::mem::take(&mut self.listeners)
    }

    /// Queues `listener` until the foreign key is set. If it already is, the
    /// listener is handed back with the foreign key for the caller to invoke.
    pub(crate) fn register_listener(
        &mut self,
        listener: ForeignKeyListener,
    ) -> Option<(ForeignKeyId, ForeignKeyListener)> {
        match self.resolution {
            Some(resolution) => Some((resolution.foreign_key, listener)),
            None => {
                self.listeners.push(listener);
                None
            }
        }
    }

    /// The side of the foreign key this key part reads its value from.
    pub fn side<'a>(&self, mapping: &'a Mapping) -> Option<&'a Side> {
        let resolution = self.resolution?;
        Some(
            mapping
                .foreign_key(resolution.foreign_key)
                .side(resolution.direction),
        )
    }

    /// Adds the key's columns, read through `table_group`, to the SELECT list
    /// and describes how to read the key's value back.
    pub fn generate_fetch(
        &self,
        mapping: &Mapping,
        table_group: &TableGroup,
        selections: &mut SqlSelections,
    ) -> Result<Fetch> {
        let side = self.resolved_side(mapping)?;
        side.generate_fetch(table_group, selections)
    }

    /// Like [`KeyPart::generate_fetch`], as a top-level query result.
    pub fn create_domain_result(
        &self,
        mapping: &Mapping,
        table_group: &TableGroup,
        selections: &mut SqlSelections,
    ) -> Result<DomainResult> {
        let fetch = self.generate_fetch(mapping, table_group, selections)?;
        Ok(DomainResult {
            role: self.role.clone(),
            fetch,
        })
    }

    /// Joins `rhs` when navigating the association from `lhs`, the table group
    /// of the model declaring it.
    pub fn generate_join(
        &self,
        mapping: &Mapping,
        lhs: &TableGroup,
        rhs: &TableGroup,
        join_type: JoinType,
    ) -> Result<Join> {
        let foreign_key = self.resolved_foreign_key(mapping)?;
        foreign_key.generate_join(lhs, rhs, self.kind.declaring_side(), join_type)
    }

    fn resolved_foreign_key<'a>(&self, mapping: &'a Mapping) -> Result<&'a ForeignKey> {
        match self.resolution {
            Some(resolution) => Ok(mapping.foreign_key(resolution.foreign_key)),
            None => Err(unresolved(&self.role)),
        }
    }

    fn resolved_side<'a>(&self, mapping: &'a Mapping) -> Result<&'a Side> {
        self.side(mapping).ok_or_else(|| unresolved(&self.role))
    }
}

fn unresolved(role: &NavigableRole) -> Error {
    Error::mapping_model_creation(role, "foreign key has not been resolved")
}

impl KeyPartKind {
    pub fn is_join_table(self) -> bool {
        matches!(self, KeyPartKind::JoinTable)
    }

    /// The side of the foreign key found in the table group of the model
    /// declaring the association.
    ///
    /// A collection's owner always holds the referenced columns, whichever key
    /// part computed the foreign key.
    pub fn declaring_side(self) -> ForeignKeyDirection {
        match self {
            KeyPartKind::ToOneReferring | KeyPartKind::JoinTable => ForeignKeyDirection::Referring,
            KeyPartKind::ToOneTarget | KeyPartKind::Collection => ForeignKeyDirection::Target,
        }
    }
}

impl ForeignKeyDirection {
    pub fn opposite(self) -> Self {
        match self {
            ForeignKeyDirection::Referring => ForeignKeyDirection::Target,
            ForeignKeyDirection::Target => ForeignKeyDirection::Referring,
        }
    }
}

impl fmt::Debug for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPart")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("foreign_key", &self.foreign_key())
            .field("direction", &self.direction())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Debug for KeyPartId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "KeyPartId({})", self.0)
    }
}
