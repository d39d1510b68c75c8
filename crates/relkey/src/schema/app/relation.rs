mod collection;
pub use collection::{Collection, CollectionElement, JoinTable};

mod to_one;
pub use to_one::{Cardinality, ToOne};

use super::*;
