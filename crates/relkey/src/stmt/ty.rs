/// Application-level type of a primitive field.
///
/// Storage types are chosen from these by
/// [`db::Type::from_app`](crate::schema::db::Type::from_app).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I16,
    I32,
    I64,
    String,
    Uuid,
}
