use pretty_assertions::assert_eq;
use relkey::driver::Capability;
use relkey::schema::app::{self, Collection, Model, ModelId, ToOne};
use relkey::schema::mapping::ForeignKeyDirection;
use relkey::stmt::{Fetch, JoinType, SqlSelections, TableGroup, TableReference};
use relkey::{schema::db, stmt, Schema};

const CATEGORY: ModelId = ModelId(0);
const ORDER: ModelId = ModelId(1);
const LINE: ModelId = ModelId(2);

fn category() -> Model {
    Model::root(CATEGORY, "Category")
        .with_id_field("id", stmt::Type::I64)
        .with_nullable_field("parent", ToOne::many_to_one(CATEGORY))
        .with_field("children", Collection::one_to_many(CATEGORY).mapped_by("parent"))
}

fn order() -> Model {
    Model::root(ORDER, "Order").with_id_field("id", stmt::Type::I64)
}

fn line() -> Model {
    Model::root(LINE, "Line")
        .with_id_field("id", stmt::Type::I64)
        .with_field("order", ToOne::many_to_one(ORDER))
}

fn build(models: Vec<Model>) -> Schema {
    let app = app::Schema::from_models(models).unwrap();
    Schema::builder().build(app, &Capability::SQLITE).unwrap()
}

fn group(schema: &Schema, alias: &str, model: ModelId) -> TableGroup {
    TableGroup::new(TableReference::new(alias, schema.table_id_for(model)))
}

#[test]
fn self_reference_uses_two_table_references() {
    let schema = build(vec![category()]);
    let child = group(&schema, "c1", CATEGORY);
    let parent = group(&schema, "c2", CATEGORY);

    let foreign_key = schema.foreign_key_for(CATEGORY.field(1)).unwrap();
    assert!(foreign_key.is_self_referencing());

    let predicate = foreign_key
        .generate_join_predicate(&child, &parent, ForeignKeyDirection::Referring)
        .unwrap();
    assert_eq!(predicate.to_string(), "c1.parent_id = c2.id");

    // Driving from the target side swaps the roles of the two aliases
    let predicate = foreign_key
        .generate_join_predicate(&child, &parent, ForeignKeyDirection::Target)
        .unwrap();
    assert_eq!(predicate.to_string(), "c1.id = c2.parent_id");
}

#[test]
fn self_reference_rejects_a_single_alias() {
    let schema = build(vec![category()]);
    let same = group(&schema, "c", CATEGORY);

    let err = schema
        .foreign_key_for(CATEGORY.field(1))
        .unwrap()
        .generate_join_predicate(&same, &same, ForeignKeyDirection::Referring)
        .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err.to_string().contains("resolved both sides to `c`"));
}

#[test]
fn children_share_the_parent_key() {
    let schema = build(vec![category()]);
    let parent = schema.key_part_for(CATEGORY.field(1)).unwrap();
    let children = schema.key_part_for(CATEGORY.field(2)).unwrap();

    assert_eq!(parent.foreign_key(), children.foreign_key());
    assert_eq!(children.direction(), Some(ForeignKeyDirection::Target));

    let join = children
        .generate_join(
            &schema.mapping,
            &group(&schema, "c1", CATEGORY),
            &group(&schema, "c2", CATEGORY),
            JoinType::Left,
        )
        .unwrap();
    assert_eq!(join.table.alias, "c2");
    assert_eq!(join.constraint.to_string(), "c1.id = c2.parent_id");

    let join = parent
        .generate_join(
            &schema.mapping,
            &group(&schema, "c1", CATEGORY),
            &group(&schema, "c2", CATEGORY),
            JoinType::Inner,
        )
        .unwrap();
    assert_eq!(join.constraint.to_string(), "c1.parent_id = c2.id");
}

#[test]
fn basic_join_is_a_single_equality() {
    let schema = build(vec![order(), line()]);

    let join = schema
        .key_part_for(LINE.field(1))
        .unwrap()
        .generate_join(
            &schema.mapping,
            &group(&schema, "l", LINE),
            &group(&schema, "o", ORDER),
            JoinType::Inner,
        )
        .unwrap();

    assert_eq!(join.table.alias, "o");
    assert!(!join.join_type.is_outer());
    assert_eq!(join.constraint.conjuncts().len(), 1);
    assert_eq!(join.constraint.to_string(), "l.order_id = o.id");
}

#[test]
fn fetch_reuses_selected_columns() {
    let schema = build(vec![order(), line()]);
    let lines = group(&schema, "l", LINE);
    let key = schema.key_part_for(LINE.field(1)).unwrap();
    let mut selections = SqlSelections::new();

    let first = key
        .generate_fetch(&schema.mapping, &lines, &mut selections)
        .unwrap();
    let second = key
        .create_domain_result(&schema.mapping, &lines, &mut selections)
        .unwrap();

    assert_eq!(
        first,
        Fetch::Basic {
            name: "id".to_string(),
            position: 0,
            ty: db::Type::Integer(8),
        }
    );
    assert_eq!(second.fetch, first);
    assert_eq!(second.role.full_path(), "Line.order");
    assert_eq!(selections.len(), 1);
}

#[test]
fn missing_table_reference_fails() {
    let schema = build(vec![order(), line()]);
    let orders = group(&schema, "o", ORDER);
    let key = schema.key_part_for(LINE.field(1)).unwrap();

    let err = key
        .generate_fetch(&schema.mapping, &orders, &mut SqlSelections::new())
        .unwrap_err();
    assert!(err.is_mapping_model_creation());
    assert!(err
        .to_string()
        .contains("table `lines` is not part of the table group"));

    // Neither group holds the referring table
    let err = key
        .generate_join(&schema.mapping, &orders, &orders, JoinType::Inner)
        .unwrap_err();
    assert!(err.is_mapping_model_creation());
}
