use super::{
    db::ColumnId,
    mapping::{ForeignKey, ForeignKeyDirection, ForeignKeyId, KeyPartKind, SideKey},
    Schema,
};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ids_populated());

        for foreign_key in &self.schema.mapping.foreign_keys {
            self.verify_column_cardinality(foreign_key);
            self.verify_sides_reference_columns(foreign_key);
            self.verify_column_type_compatibility(foreign_key)?;
            self.verify_referring_key_part(foreign_key)?;
        }

        self.verify_mapped_by_keys_share_foreign_key();
        Ok(())
    }

    fn verify_ids_populated(&self) -> bool {
        for (index, foreign_key) in self.schema.mapping.foreign_keys.iter().enumerate() {
            assert_eq!(foreign_key.id, ForeignKeyId(index));
            assert_ne!(foreign_key.referring_side().foreign_key(), ForeignKeyId::placeholder());
            assert_ne!(foreign_key.target_side().foreign_key(), ForeignKeyId::placeholder());
        }

        for model in self.schema.mapping.models.values() {
            assert!(!model.identifier.is_empty(), "{:?} has no identifier", model.id);
            assert!(model.identifier.iter().all(|column| *column != ColumnId::placeholder()));
            assert!(
                model.fields.iter().all(Option::is_some),
                "{:?} has unmapped fields",
                model.id
            );
        }

        true
    }

    fn verify_column_cardinality(&self, foreign_key: &ForeignKey) {
        assert_eq!(
            foreign_key.referring_side().column_count(),
            foreign_key.target_side().column_count(),
            "{:?} sides differ in column count",
            foreign_key.id
        );

        if foreign_key.is_basic() {
            assert_eq!(foreign_key.column_count(), 1);
        } else {
            assert!(foreign_key.column_count() > 1);
        }
    }

    fn verify_sides_reference_columns(&self, foreign_key: &ForeignKey) {
        for side in [foreign_key.referring_side(), foreign_key.target_side()] {
            assert_eq!(side.foreign_key(), foreign_key.id);

            for column in &side.columns {
                assert_eq!(column.id.table, side.table);
                let db_column = self.schema.db.column(column.id);
                assert_eq!(db_column.name, column.name);
                assert_eq!(db_column.storage_ty, column.ty);
            }
        }
    }

    fn verify_column_type_compatibility(&self, foreign_key: &ForeignKey) -> Result<()> {
        let referring = foreign_key.referring_side();
        let target = foreign_key.target_side();

        for (referring_column, target_column) in referring.columns.iter().zip(&target.columns) {
            if referring_column.ty != target_column.ty {
                return Err(Error::mapping_model_creation(
                    &referring.role,
                    format!(
                        "column `{}.{}` ({:?}) cannot refer to `{}.{}` ({:?})",
                        referring.table_name,
                        referring_column.name,
                        referring_column.ty,
                        target.table_name,
                        target_column.name,
                        target_column.ty
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Exactly one key part computed each foreign key: the one its referring
    /// side names.
    fn verify_referring_key_part(&self, foreign_key: &ForeignKey) -> Result<()> {
        let mapping = &self.schema.mapping;
        let referring = foreign_key.referring_side();

        let SideKey::KeyPart(key) = referring.key else {
            return Err(Error::mapping_model_creation(
                &referring.role,
                "foreign key was not computed by a key part",
            ));
        };

        let computed = mapping.key_parts.get(key.0).is_some_and(|key_part| {
            key_part.foreign_key() == Some(foreign_key.id)
                && key_part.direction() == Some(ForeignKeyDirection::Referring)
        });
        if !computed {
            return Err(Error::mapping_model_creation(
                &referring.role,
                format!("{key:?} does not hold the referring side of its foreign key"),
            ));
        }

        let count = mapping
            .key_parts_for_foreign_key(foreign_key.id)
            .filter(|key_part| key_part.direction() == Some(ForeignKeyDirection::Referring))
            .count();
        if count != 1 {
            return Err(Error::mapping_model_creation(
                &referring.role,
                format!("foreign key has {count} referring key parts"),
            ));
        }

        Ok(())
    }

    /// Mapped-by keys share the foreign key of the to-one owning it.
    fn verify_mapped_by_keys_share_foreign_key(&self) {
        let mapping = &self.schema.mapping;

        for key_part in &mapping.key_parts {
            if key_part.direction() != Some(ForeignKeyDirection::Target) {
                continue;
            }

            let Some(foreign_key) = key_part.foreign_key() else {
                continue;
            };
            if let SideKey::KeyPart(owner) = mapping.foreign_key(foreign_key).referring_side().key {
                assert_eq!(
                    mapping.key_part(owner).kind,
                    KeyPartKind::ToOneReferring,
                    "`{}` is mapped by a key that is not an owning to-one",
                    key_part.role
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::{
            app::{self, ModelId},
            db::{self, Table, TableId},
            mapping::{KeyPart, KeyPartId, Mapping, Side, SideColumn},
        },
        stmt,
    };
    use std::sync::Arc;

    fn column(table: &mut Table, name: &str) -> SideColumn {
        let id = table
            .push_column(name, stmt::Type::I64, db::Type::Integer(8), false, false)
            .unwrap();
        SideColumn {
            id,
            name: name.to_string(),
            ty: db::Type::Integer(8),
        }
    }

    /// `lines.order_id` referring to `orders.id`, with `key` on the referring
    /// side.
    fn schema_with_key(key: SideKey, key_parts: Vec<KeyPart>) -> Schema {
        let mut orders = Table::new(TableId(0), "orders".to_string());
        let mut lines = Table::new(TableId(1), "lines".to_string());

        let id = column(&mut orders, "id");
        let order_id = column(&mut lines, "order_id");

        let target = Side::new(
            role!("Order", "{id}"),
            &orders,
            vec![id],
            SideKey::Identifier(ModelId(0)),
            vec![],
        );
        let referring = Side::new(role!("Line", "order"), &lines, vec![order_id], key, vec![]);
        let foreign_key = ForeignKey::new(ForeignKeyId(0), referring, target).unwrap();

        let mut mapping = Mapping::default();
        mapping.key_parts = key_parts;
        for key_part in &mut mapping.key_parts {
            assert!(key_part.set_foreign_key(&foreign_key).is_empty());
        }
        mapping.foreign_keys.push(foreign_key);

        Schema {
            app: app::Schema::default(),
            db: Arc::new(db::Schema {
                tables: vec![orders, lines],
            }),
            mapping,
        }
    }

    fn line_order_key() -> KeyPart {
        KeyPart::new(
            KeyPartId(0),
            role!("Line", "order"),
            KeyPartKind::ToOneReferring,
            ModelId(1).field(1),
        )
    }

    #[test]
    fn key_computed_by_its_key_part() {
        let schema = schema_with_key(SideKey::KeyPart(KeyPartId(0)), vec![line_order_key()]);
        assert!(schema.verify().is_ok());
    }

    #[test]
    fn key_without_referring_key_part_fails() {
        let schema = schema_with_key(SideKey::Identifier(ModelId(1)), vec![]);

        let err = schema.verify().unwrap_err();
        assert!(err.is_mapping_model_creation());
        assert_eq!(err.mapping_role(), Some("Line.order"));
        assert!(err.to_string().contains("not computed by a key part"));
    }

    #[test]
    fn key_naming_a_missing_key_part_fails() {
        let schema = schema_with_key(SideKey::KeyPart(KeyPartId(3)), vec![]);

        let err = schema.verify().unwrap_err();
        assert!(err.is_mapping_model_creation());
        assert!(err
            .to_string()
            .contains("KeyPartId(3) does not hold the referring side of its foreign key"));
    }
}
