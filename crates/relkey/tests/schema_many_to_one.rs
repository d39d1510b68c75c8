use pretty_assertions::assert_eq;
use relkey::driver::Capability;
use relkey::schema::app::{self, Model, ModelId, ToOne};
use relkey::schema::db;
use relkey::schema::mapping::{ForeignKeyDirection, ForeignKeyKind, SideKey};
use relkey::{stmt, Schema};

const ORDER: ModelId = ModelId(0);
const LINE: ModelId = ModelId(1);

fn order() -> Model {
    Model::root(ORDER, "Order")
        .with_id_field("id", stmt::Type::I64)
        .with_field("invoice_number", stmt::Type::String)
}

fn line(to_one: ToOne) -> Model {
    Model::root(LINE, "Line")
        .with_id_field("id", stmt::Type::I64)
        .with_field("order", to_one)
}

fn build(models: Vec<Model>) -> relkey::Result<Schema> {
    let app = app::Schema::from_models(models)?;
    Schema::builder().build(app, &Capability::SQLITE)
}

fn referring_columns(schema: &Schema) -> Vec<(String, String, db::Type)> {
    let mut columns = vec![];
    schema
        .foreign_key_for(LINE.field(1))
        .unwrap()
        .visit_referring_columns(|table, column, ty| {
            columns.push((table.to_string(), column.to_string(), ty.clone()))
        });
    columns
}

#[test]
fn many_to_one_refers_to_target_identifier() {
    let schema = build(vec![order(), line(ToOne::many_to_one(ORDER))]).unwrap();

    let foreign_key = schema.foreign_key_for(LINE.field(1)).unwrap();
    assert_eq!(foreign_key.kind(), ForeignKeyKind::Basic);
    assert_eq!(foreign_key.referring_side().table_name, "lines");
    assert_eq!(foreign_key.target_side().table_name, "orders");
    assert_eq!(
        foreign_key.target_side().column_names().collect::<Vec<_>>(),
        ["id"]
    );
    assert_eq!(
        foreign_key.target_side().key,
        SideKey::Identifier(ORDER)
    );

    assert_eq!(
        referring_columns(&schema),
        [("lines".to_string(), "order_id".to_string(), db::Type::Integer(8))]
    );

    let key_part = schema.key_part_for(LINE.field(1)).unwrap();
    assert_eq!(key_part.direction(), Some(ForeignKeyDirection::Referring));
    assert_eq!(key_part.role.full_path(), "Line.order");
}

#[test]
fn registration_order_does_not_matter() {
    let forward = build(vec![order(), line(ToOne::many_to_one(ORDER))]).unwrap();
    let backward = build(vec![line(ToOne::many_to_one(ORDER)), order()]).unwrap();

    assert_eq!(referring_columns(&forward), referring_columns(&backward));
    assert_eq!(
        backward
            .key_part_for(LINE.field(1))
            .unwrap()
            .direction(),
        Some(ForeignKeyDirection::Referring)
    );
}

#[test]
fn many_to_one_by_referenced_field() {
    let schema = build(vec![
        order(),
        line(ToOne::many_to_one(ORDER).referenced_field("invoice_number")),
    ])
    .unwrap();

    let foreign_key = schema.foreign_key_for(LINE.field(1)).unwrap();
    assert_eq!(
        foreign_key.target_side().column_names().collect::<Vec<_>>(),
        ["invoice_number"]
    );
    assert_eq!(foreign_key.target_side().key, SideKey::Field(ORDER.field(1)));
    assert_eq!(
        referring_columns(&schema),
        [(
            "lines".to_string(),
            "order_invoice_number".to_string(),
            db::Type::Text
        )]
    );
}

#[test]
fn referenced_field_resolves_in_either_order() {
    let schema = build(vec![
        line(ToOne::many_to_one(ORDER).referenced_field("invoice_number")),
        order(),
    ])
    .unwrap();

    assert_eq!(
        referring_columns(&schema)[0].1,
        "order_invoice_number"
    );
}

#[test]
fn missing_referenced_field_is_an_error() {
    let err = build(vec![
        order(),
        line(ToOne::many_to_one(ORDER).referenced_field("invoice")),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("Line.order"));
    assert!(err.to_string().contains("`Order.invoice` does not exist"));
}

#[test]
fn explicit_join_column() {
    let schema = build(vec![
        order(),
        line(ToOne::many_to_one(ORDER).join_columns(["order_ref"])),
    ])
    .unwrap();

    assert_eq!(referring_columns(&schema)[0].1, "order_ref");
    assert!(schema.db.table_by_name("lines").unwrap().column_by_name("order_ref").is_some());
}

#[test]
fn basic_key_rejects_extra_columns() {
    let err = build(vec![
        order(),
        line(ToOne::many_to_one(ORDER).join_columns(["order_a", "order_b"])),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(!err.is_column_mismatch());
    assert_eq!(err.mapping_role(), Some("Line.order"));
}

#[test]
fn nullable_to_one_has_nullable_column() {
    let line = Model::root(LINE, "Line")
        .with_id_field("id", stmt::Type::I64)
        .with_nullable_field("order", ToOne::many_to_one(ORDER));
    let schema = build(vec![order(), line]).unwrap();

    let column = schema
        .db
        .table_by_name("lines")
        .unwrap()
        .column_by_name("order_id")
        .unwrap();
    assert!(column.nullable);
    assert!(!column.primary_key);
}

#[test]
fn table_name_prefix_applies_to_every_table() {
    let app = app::Schema::from_models(vec![order(), line(ToOne::many_to_one(ORDER))]).unwrap();
    let mut builder = Schema::builder();
    builder.table_name_prefix("shop_");
    let schema = builder.build(app, &Capability::POSTGRESQL).unwrap();

    assert_eq!(schema.table_for(ORDER).name, "shop_orders");
    assert_eq!(schema.table_for(LINE).name, "shop_lines");
    assert_eq!(
        schema.foreign_key_for(LINE.field(1)).unwrap().target_side().table_name,
        "shop_orders"
    );
}

#[test]
fn generated_names_respect_identifier_length() {
    let long = "x".repeat(70);
    let err = build(vec![
        order(),
        line(ToOne::many_to_one(ORDER).join_columns([long.as_str()])),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err.to_string().contains("longer than 63 characters"));
}
