use super::FieldId;

#[derive(Debug, Clone)]
pub struct PrimaryKey {
    /// Fields composing the primary key, in declaration order. A field may be
    /// primitive, embedded (composite identifier) or a to-one (derived
    /// identifier).
    pub fields: Vec<FieldId>,
}
