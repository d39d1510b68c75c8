use super::Error;
use crate::schema::NavigableRole;

/// Error when the two sides of a composite foreign key disagree on the number
/// of columns.
///
/// This is never transient: the mapping metadata itself is inconsistent, for
/// example explicit join columns that do not line up with the referenced
/// composite identifier.
#[derive(Debug)]
pub(super) struct ColumnMismatch {
    referring_role: Box<str>,
    referring_count: usize,
    target_role: Box<str>,
    target_count: usize,
}

impl std::error::Error for ColumnMismatch {}

impl core::fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "column mismatch: `{}` has {} referring column(s) but `{}` has {} target column(s)",
            self.referring_role, self.referring_count, self.target_role, self.target_count
        )
    }
}

impl Error {
    /// Creates a column mismatch error for a composite foreign key.
    pub fn column_mismatch(
        referring_role: &NavigableRole,
        referring_count: usize,
        target_role: &NavigableRole,
        target_count: usize,
    ) -> Error {
        Error::from(super::ErrorKind::ColumnMismatch(ColumnMismatch {
            referring_role: referring_role.full_path().into(),
            referring_count,
            target_role: target_role.full_path().into(),
            target_count,
        }))
    }

    /// Returns `true` if this error is a column mismatch error.
    pub fn is_column_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ColumnMismatch(_))
    }
}
