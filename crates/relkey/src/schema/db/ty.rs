use crate::{driver, stmt, Error, Result};

/// Database-level storage types: how a column's values are stored in the
/// target database.
///
/// Each side of a foreign key carries the storage type of every one of its
/// columns; referring columns always copy the storage type of the column they
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// 128-bit universally unique identifier (UUID)
    Uuid,

    /// Unconstrained binary type
    Blob,

    /// Fixed-size binary type of `n` bytes
    Binary(u8),

    /// User-specified unrecognized type
    Custom(String),
}

impl Type {
    /// Maps an application-level type to a database-level storage type.
    pub fn from_app(
        ty: &stmt::Type,
        hint: Option<&Type>,
        db: &driver::StorageTypes,
    ) -> Result<Type> {
        let storage_ty = match hint {
            Some(ty) => ty.clone(),
            None => match ty {
                stmt::Type::Bool => Type::Boolean,
                stmt::Type::I16 => Type::Integer(2),
                stmt::Type::I32 => Type::Integer(4),
                stmt::Type::I64 => Type::Integer(8),
                stmt::Type::String => db.default_string_type.clone(),
                stmt::Type::Uuid => db.default_uuid_type.clone(),
            },
        };

        storage_ty.verify(db)?;
        Ok(storage_ty)
    }

    fn verify(&self, db: &driver::StorageTypes) -> Result<()> {
        if let Type::VarChar(size) = *self {
            match db.varchar {
                None => {
                    return Err(Error::unsupported_feature(
                        "VARCHAR type is not supported by this database",
                    ))
                }
                Some(max) if size > max => {
                    return Err(Error::unsupported_feature(format!(
                        "VARCHAR({size}) exceeds the database maximum of {max}"
                    )))
                }
                _ => {}
            }
        }

        Ok(())
    }
}
