mod capability;
pub use capability::{Capability, StorageTypes};
