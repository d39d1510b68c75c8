use super::{Field, FieldId, FieldTy, Model, ModelId};

use crate::{schema::NavigableRole, Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    /// Registers `models`, in order, and checks that every model they refer to
    /// was registered too.
    ///
    /// Registration order is also the order the mapping model is built in; the
    /// result does not depend on it.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Result<Self> {
        let mut schema = Schema::default();

        for model in models {
            if schema.models.contains_key(&model.id) {
                return Err(Error::mapping_model_creation(
                    &NavigableRole::new(model.name.upper_camel_case()),
                    format!("model id {:?} registered twice", model.id),
                ));
            }
            schema.models.insert(model.id, model);
        }

        schema.verify_references()?;
        Ok(schema)
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models
            .values()
            .find(|model| model.name.upper_camel_case() == name)
    }

    /// The navigable role of a field, `Model.field`.
    pub fn field_role(&self, id: FieldId) -> NavigableRole {
        let model = self.model(id.model);
        NavigableRole::new(model.name.upper_camel_case()).append(&self.field(id).name.app_name)
    }

    fn verify_references(&self) -> Result<()> {
        for model in self.models() {
            let model_role = NavigableRole::new(model.name.upper_camel_case());

            if let Some(root) = model.as_root() {
                if root.primary_key.fields.is_empty() {
                    return Err(Error::mapping_model_creation(
                        &model_role,
                        "root model has no identifier",
                    ));
                }
            }

            for (index, field) in model.fields.iter().enumerate() {
                let role = model_role.append(&field.name.app_name);

                if field.id != model.id.field(index) {
                    return Err(Error::mapping_model_creation(
                        &role,
                        format!("field id {:?} does not match its position", field.id),
                    ));
                }

                match &field.ty {
                    FieldTy::Primitive(_) => {}
                    FieldTy::Embedded(embedded) => match self.models.get(&embedded.target) {
                        Some(target) if target.is_embedded() => {}
                        Some(_) => {
                            return Err(Error::mapping_model_creation(
                                &role,
                                "embedded field must reference an embedded model",
                            ))
                        }
                        None => return Err(not_registered(&role)),
                    },
                    FieldTy::ToOne(_) | FieldTy::Collection(_) => {
                        let Some(target) = field.association_target_id() else {
                            continue;
                        };

                        match self.models.get(&target) {
                            Some(target) if target.is_root() => {}
                            Some(_) => {
                                return Err(Error::mapping_model_creation(
                                    &role,
                                    "association must reference a root model",
                                ))
                            }
                            None => return Err(not_registered(&role)),
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn not_registered(role: &NavigableRole) -> Error {
    Error::mapping_model_creation(
        role,
        "references a model that was not registered with the schema",
    )
}
