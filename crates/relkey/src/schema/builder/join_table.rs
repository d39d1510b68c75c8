use super::{side::ReferringColumns, CreationProcess, SubPartGroup};
use crate::{
    schema::{
        app::{FieldId, ModelId},
        mapping::{KeyPartId, KeyPartKind, SideKey},
        NavigableRole,
    },
    Result,
};

use tracing::trace;

/// Creates the join-table key referring to the element model of a
/// many-to-many.
///
/// The foreign key is computed right away when the element model's identifier
/// is mapped. Otherwise it is retried after every model was processed.
pub(super) fn build(
    cx: &mut CreationProcess<'_>,
    role: NavigableRole,
    field: FieldId,
    target: ModelId,
    columns: ReferringColumns,
) -> Result<KeyPartId> {
    let key = cx.new_key_part(role.clone(), KeyPartKind::JoinTable, field);

    if cx.is_ready(target, SubPartGroup::Root) {
        resolve(cx, key, target, columns)?;
        return Ok(key);
    }

    let mut columns = Some(columns);
    cx.register_foreign_key_post_init_callback(format!("join table key `{role}`"), move |cx| {
        if !cx.is_ready(target, SubPartGroup::Root) {
            trace!(role = %role, "element identifier not ready");
            return Ok(false);
        }

        match columns.take() {
            Some(columns) => resolve(cx, key, target, columns)?,
            None => unreachable!("join table key `{role}` resolved twice"),
        }

        Ok(true)
    });

    Ok(key)
}

fn resolve(
    cx: &mut CreationProcess<'_>,
    key: KeyPartId,
    target: ModelId,
    columns: ReferringColumns,
) -> Result<()> {
    let target_side = cx.identifier_side(target)?;
    let referring_side = cx.referring_side(SideKey::KeyPart(key), columns, &target_side)?;
    let foreign_key = cx.add_foreign_key(referring_side, target_side)?;
    cx.set_foreign_key(key, foreign_key)
}
