use super::{Model, ModelId, Schema};

#[derive(Debug, Clone)]
pub struct Embedded {
    /// The embedded model being referenced
    pub target: ModelId,
}

impl Embedded {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}
