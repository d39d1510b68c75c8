use super::Error;
use crate::schema::NavigableRole;

/// Error when the mapping metadata is structurally invalid.
///
/// This occurs when:
/// - A `mapped_by` attribute does not exist or is not a to-one
/// - A target-side to-one declares the wrong cardinality
/// - A composite key spans more than one table
/// - A basic key is offered more than one column
/// - A key never resolves before bootstrap completes
///
/// The error carries the navigable role of the offending association.
#[derive(Debug)]
pub(super) struct MappingModelCreation {
    role: Box<str>,
    message: Box<str>,
}

impl std::error::Error for MappingModelCreation {}

impl core::fmt::Display for MappingModelCreation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "could not create mapping model for `{}`: {}",
            self.role, self.message
        )
    }
}

impl Error {
    /// Creates a mapping model creation error for the given role.
    pub fn mapping_model_creation(role: &NavigableRole, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MappingModelCreation(
            MappingModelCreation {
                role: role.full_path().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a mapping model creation error.
    pub fn is_mapping_model_creation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MappingModelCreation(_))
    }

    /// The full path of the role the error was raised for, if this is a
    /// mapping model creation error.
    pub fn mapping_role(&self) -> Option<&str> {
        match self.kind() {
            super::ErrorKind::MappingModelCreation(err) => Some(&err.role),
            _ => None,
        }
    }
}
