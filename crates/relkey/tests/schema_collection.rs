use pretty_assertions::assert_eq;
use relkey::driver::Capability;
use relkey::schema::app::{self, Collection, Embedded, FieldPrimitive, Model, ModelId, ToOne};
use relkey::schema::mapping::{self, ForeignKeyDirection, KeyPartKind};
use relkey::stmt::{JoinType, TableGroup, TableReference};
use relkey::{stmt, Schema};

const ORDER: ModelId = ModelId(0);
const LINE: ModelId = ModelId(1);

fn order(lines: Collection) -> Model {
    Model::root(ORDER, "Order")
        .with_id_field("id", stmt::Type::I64)
        .with_field("invoice_number", stmt::Type::String)
        .with_field("lines", lines)
}

fn line_with_order() -> Model {
    Model::root(LINE, "Line")
        .with_id_field("id", stmt::Type::I64)
        .with_field("order", ToOne::many_to_one(ORDER))
}

fn plain_line() -> Model {
    Model::root(LINE, "Line").with_id_field("id", stmt::Type::I64)
}

fn build(models: Vec<Model>) -> relkey::Result<Schema> {
    let app = app::Schema::from_models(models)?;
    Schema::builder().build(app, &Capability::SQLITE)
}

fn collection_mapping(schema: &Schema) -> &mapping::FieldCollection {
    schema
        .mapping_for(ORDER)
        .field(2)
        .and_then(mapping::Field::as_collection)
        .unwrap()
}

#[test]
fn mapped_by_collection_shares_the_to_one_key() {
    for models in [
        vec![order(Collection::one_to_many(LINE).mapped_by("order")), line_with_order()],
        vec![line_with_order(), order(Collection::one_to_many(LINE).mapped_by("order"))],
    ] {
        let schema = build(models).unwrap();

        let collection_key = schema.key_part_for(ORDER.field(2)).unwrap();
        let to_one_key = schema.key_part_for(LINE.field(1)).unwrap();

        assert_eq!(collection_key.kind, KeyPartKind::Collection);
        assert_eq!(collection_key.role.full_path(), "Order.lines.{key}");
        assert_eq!(collection_key.foreign_key(), to_one_key.foreign_key());
        assert_eq!(collection_key.direction(), Some(ForeignKeyDirection::Target));
        assert_eq!(to_one_key.direction(), Some(ForeignKeyDirection::Referring));

        assert_eq!(collection_mapping(&schema).table, schema.table_id_for(LINE));
        assert_eq!(schema.mapping.foreign_keys.len(), 1);
    }
}

#[test]
fn collection_join_starts_from_the_owner() {
    let schema = build(vec![
        order(Collection::one_to_many(LINE).mapped_by("order")),
        line_with_order(),
    ])
    .unwrap();

    let orders = TableGroup::new(TableReference::new("o", schema.table_id_for(ORDER)));
    let lines = TableGroup::new(TableReference::new("l", schema.table_id_for(LINE)));

    let join = schema
        .key_part_for(ORDER.field(2))
        .unwrap()
        .generate_join(&schema.mapping, &orders, &lines, JoinType::Left)
        .unwrap();

    assert_eq!(join.table.alias, "l");
    assert!(join.join_type.is_outer());
    assert_eq!(join.constraint.to_string(), "o.id = l.order_id");
}

#[test]
fn mapped_by_must_name_a_to_one() {
    const TAG: ModelId = ModelId(2);

    let tag = Model::root(TAG, "Tag")
        .with_id_field("id", stmt::Type::I64)
        .with_field("orders", Collection::many_to_many(ORDER));
    let order = Model::root(ORDER, "Order")
        .with_id_field("id", stmt::Type::I64)
        .with_field("tags", Collection::one_to_many(TAG).mapped_by("orders"));

    let err = build(vec![order, tag]).unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("Order.tags.{key}"));
    assert!(err.to_string().contains("`Tag.orders` is not a to-one association"));
}

#[test]
fn missing_mapped_by_attribute() {
    let err = build(vec![
        order(Collection::one_to_many(LINE).mapped_by("orderz")),
        line_with_order(),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err
        .to_string()
        .contains("mapped-by attribute `Line.orderz` does not exist"));
}

#[test]
fn element_collection_gets_a_collection_table() {
    let tags = Collection::elements(FieldPrimitive::new(stmt::Type::String));
    let schema = build(vec![order(tags), plain_line()]).unwrap();

    let table = schema.db.table_by_name("orders_lines").unwrap();
    assert_eq!(
        table
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>(),
        ["order_id", "lines"]
    );

    let key = schema.key_part_for(ORDER.field(2)).unwrap();
    assert_eq!(key.direction(), Some(ForeignKeyDirection::Referring));

    let foreign_key = schema.foreign_key_for(ORDER.field(2)).unwrap();
    assert_eq!(foreign_key.referring_side().table, table.id);
    assert_eq!(foreign_key.target_side().table_name, "orders");

    let mapping = collection_mapping(&schema);
    assert_eq!(mapping.table, table.id);
    assert_eq!(mapping.element_column, Some(table.columns[1].id));
}

#[test]
fn unidirectional_one_to_many_adds_key_to_element_table() {
    let schema = build(vec![
        order(Collection::one_to_many(LINE)),
        plain_line(),
    ])
    .unwrap();

    let column = schema
        .table_for(LINE)
        .column_by_name("lines_id")
        .unwrap();
    assert!(column.nullable);

    let key = schema.key_part_for(ORDER.field(2)).unwrap();
    assert_eq!(key.direction(), Some(ForeignKeyDirection::Referring));
    assert_eq!(collection_mapping(&schema).table, schema.table_id_for(LINE));

    let orders = TableGroup::new(TableReference::new("o", schema.table_id_for(ORDER)));
    let lines = TableGroup::new(TableReference::new("l", schema.table_id_for(LINE)));
    let join = key
        .generate_join(&schema.mapping, &orders, &lines, JoinType::Inner)
        .unwrap();
    assert_eq!(join.constraint.to_string(), "o.id = l.lines_id");
}

#[test]
fn collection_key_by_referenced_field_and_explicit_columns() {
    let lines = Collection::one_to_many(LINE)
        .key_referenced_field("invoice_number")
        .key_columns(["invoice"]);
    let schema = build(vec![plain_line(), order(lines)]).unwrap();

    let foreign_key = schema.foreign_key_for(ORDER.field(2)).unwrap();
    assert_eq!(
        foreign_key.target_side().column_names().collect::<Vec<_>>(),
        ["invoice_number"]
    );
    assert_eq!(
        foreign_key.referring_side().column_names().collect::<Vec<_>>(),
        ["invoice"]
    );
    assert_eq!(foreign_key.referring_side().table_name, "lines");
}

#[test]
fn collection_inside_embedded_attribute_is_unsupported() {
    const HISTORY: ModelId = ModelId(2);

    let history = Model::embedded(HISTORY, "History")
        .with_field("lines", Collection::one_to_many(LINE));
    let order = Model::root(ORDER, "Order")
        .with_id_field("id", stmt::Type::I64)
        .with_field("history", Embedded { target: HISTORY });

    let err = build(vec![order, plain_line(), history]).unwrap_err();
    assert!(err.is_unsupported_feature());
}
