//! Application-level schema: the entities, their fields and the associations
//! between them, as declared by the user.

mod embedded;
pub use embedded::Embedded;

mod field;
pub use field::{Field, FieldId, FieldName, FieldPrimitive, FieldTy};

mod model;
pub use model::{Model, ModelId, ModelKind, ModelRoot};

mod pk;
pub use pk::PrimaryKey;

mod relation;
pub use relation::{Cardinality, Collection, CollectionElement, JoinTable, ToOne};

mod schema;
pub use schema::Schema;

use super::Name;
