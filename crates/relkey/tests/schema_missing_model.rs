use relkey::schema::app::{self, Collection, Embedded, Model, ModelId, ToOne};
use relkey::stmt;

const ORDER: ModelId = ModelId(0);
const MISSING: ModelId = ModelId(99);

fn order() -> Model {
    Model::root(ORDER, "Order").with_id_field("id", stmt::Type::I64)
}

#[test]
fn to_one_target_must_be_registered() {
    let err = app::Schema::from_models([order().with_field("customer", ToOne::many_to_one(MISSING))])
        .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("Order.customer"));
    assert!(err.to_string().contains("not registered"));
}

#[test]
fn collection_element_must_be_registered() {
    let err = app::Schema::from_models([order().with_field("lines", Collection::one_to_many(MISSING))])
        .unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert_eq!(err.mapping_role(), Some("Order.lines"));
}

#[test]
fn embedded_field_must_reference_an_embedded_model() {
    let err = app::Schema::from_models([
        order().with_field("self_copy", Embedded { target: ORDER }),
    ])
    .unwrap_err();

    assert!(err.to_string().contains("must reference an embedded model"));
}

#[test]
fn model_ids_are_unique() {
    let err = app::Schema::from_models([order(), order()]).unwrap_err();

    assert!(err.is_mapping_model_creation());
    assert!(err.to_string().contains("registered twice"));
}

#[test]
fn root_models_need_an_identifier() {
    let err = app::Schema::from_models([Model::root(ORDER, "Order")]).unwrap_err();

    assert!(err.to_string().contains("has no identifier"));
}
