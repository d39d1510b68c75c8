use pretty_assertions::assert_eq;
use relkey::driver::Capability;
use relkey::schema::app::{self, Cardinality, Model, ModelId, ToOne};
use relkey::schema::mapping::{ForeignKeyDirection, KeyPartKind};
use relkey::stmt::{Expr, Fetch, SqlSelections, TableGroup, TableReference};
use relkey::{stmt, Schema};

const PERSON: ModelId = ModelId(0);
const DETAILS: ModelId = ModelId(1);

fn person() -> Model {
    Model::root(PERSON, "Person")
        .with_table_name("person")
        .with_id_field("id", stmt::Type::I64)
        .with_field("details", ToOne::one_to_one(DETAILS))
}

fn person_details(person: ToOne) -> Model {
    Model::root(DETAILS, "PersonDetails")
        .with_table_name("person_details")
        .with_id_field("id", stmt::Type::I64)
        .with_field("person", person)
}

fn build(models: Vec<Model>) -> relkey::Result<Schema> {
    let app = app::Schema::from_models(models)?;
    Schema::builder().build(app, &Capability::SQLITE)
}

fn assert_shared_key(schema: &Schema) {
    let owning = schema.key_part_for(PERSON.field(1)).unwrap();
    let inverse = schema.key_part_for(DETAILS.field(1)).unwrap();

    assert_eq!(owning.kind, KeyPartKind::ToOneReferring);
    assert_eq!(inverse.kind, KeyPartKind::ToOneTarget);

    assert!(owning.foreign_key().is_some());
    assert_eq!(owning.foreign_key(), inverse.foreign_key());
    assert_eq!(owning.direction(), Some(ForeignKeyDirection::Referring));
    assert_eq!(inverse.direction(), Some(ForeignKeyDirection::Target));

    let foreign_key = schema.foreign_key_for(PERSON.field(1)).unwrap();
    assert_eq!(foreign_key.referring_side().table_name, "person");
    assert_eq!(
        foreign_key.referring_side().column_names().collect::<Vec<_>>(),
        ["details_id"]
    );
    assert_eq!(foreign_key.target_side().table_name, "person_details");
    assert_eq!(schema.mapping.foreign_keys.len(), 1);
}

#[test]
fn mapped_by_pair_shares_one_foreign_key() {
    let schema = build(vec![
        person(),
        person_details(ToOne::one_to_one(PERSON).mapped_by("details")),
    ])
    .unwrap();

    assert_shared_key(&schema);
}

#[test]
fn mapped_by_pair_in_reverse_order() {
    let schema = build(vec![
        person_details(ToOne::one_to_one(PERSON).mapped_by("details")),
        person(),
    ])
    .unwrap();

    assert_shared_key(&schema);
}

#[test]
fn inverse_side_reads_the_target_columns() {
    let schema = build(vec![
        person(),
        person_details(ToOne::one_to_one(PERSON).mapped_by("details")),
    ])
    .unwrap();

    let inverse = schema.key_part_for(DETAILS.field(1)).unwrap();
    let group = TableGroup::new(TableReference::new("pd", schema.table_id_for(DETAILS)));
    let mut selections = SqlSelections::new();

    let result = inverse
        .create_domain_result(&schema.mapping, &group, &mut selections)
        .unwrap();

    assert_eq!(result.role.full_path(), "PersonDetails.person");
    assert_eq!(
        result.fetch,
        Fetch::Basic {
            name: "id".to_string(),
            position: 0,
            ty: relkey::schema::db::Type::Integer(8),
        }
    );
    let selected = Expr::from(selections.get(0).unwrap().expr.clone());
    assert_eq!(selected.to_string(), "pd.id");
}

#[test]
fn many_to_one_cannot_be_mapped_by() {
    let err = build(vec![
        person(),
        person_details(ToOne::many_to_one(PERSON).mapped_by("details")),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("PersonDetails.person"));
}

#[test]
fn logical_one_to_one_target_is_unsupported() {
    let err = build(vec![
        person(),
        person_details(ToOne::new(PERSON, Cardinality::LogicalOneToOne).mapped_by("details")),
    ])
    .unwrap_err();

    assert!(err.is_unsupported_feature());
    assert!(!err.is_mapping_model_creation());
}

#[test]
fn missing_mapped_by_attribute() {
    let err = build(vec![
        person(),
        person_details(ToOne::one_to_one(PERSON).mapped_by("detailz")),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("PersonDetails.person"));
    assert!(err
        .to_string()
        .contains("mapped-by attribute `Person.detailz` does not exist"));
}

#[test]
fn mapped_by_attribute_must_be_a_to_one() {
    let err = build(vec![
        person(),
        person_details(ToOne::one_to_one(PERSON).mapped_by("id")),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err.to_string().contains("is not a to-one association"));
}

#[test]
fn mapped_by_attribute_cannot_itself_be_mapped_by() {
    let person = Model::root(PERSON, "Person")
        .with_table_name("person")
        .with_id_field("id", stmt::Type::I64)
        .with_field("details", ToOne::one_to_one(DETAILS).mapped_by("person"));

    let err = build(vec![
        person,
        person_details(ToOne::one_to_one(PERSON).mapped_by("details")),
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err
        .to_string()
        .contains("is itself mapped by another attribute"));
}

#[test]
fn mapped_by_attribute_must_refer_back() {
    const OTHER: ModelId = ModelId(2);

    let person = Model::root(PERSON, "Person")
        .with_table_name("person")
        .with_id_field("id", stmt::Type::I64)
        .with_field("details", ToOne::one_to_one(OTHER));
    let other = Model::root(OTHER, "Other").with_id_field("id", stmt::Type::I64);

    let err = build(vec![
        person,
        person_details(ToOne::one_to_one(PERSON).mapped_by("details")),
        other,
    ])
    .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err
        .to_string()
        .contains("mapped-by attribute `Person.details` does not refer to `PersonDetails`"));
}
