use crate::schema::db;

/// Read-only description of the target database, shared by every step of the
/// mapping model build.
#[derive(Debug)]
pub struct Capability {
    /// Column storage types supported by the database
    pub storage_types: StorageTypes,

    /// Maximum length of a table or column identifier. Generated names longer
    /// than this are rejected.
    pub max_identifier_length: usize,
}

#[derive(Debug)]
pub struct StorageTypes {
    /// The default storage type for a string.
    pub default_string_type: db::Type,

    /// The default storage type for a UUID.
    pub default_uuid_type: db::Type,

    /// When `Some` the database supports varchar types with the specified upper
    /// limit.
    pub varchar: Option<u64>,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        storage_types: StorageTypes::SQLITE,
        // SQLite does not limit identifier length; use the same bound as
        // PostgreSQL so generated names stay portable.
        max_identifier_length: 63,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        storage_types: StorageTypes::POSTGRESQL,
        max_identifier_length: 63,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        storage_types: StorageTypes::MYSQL,
        max_identifier_length: 64,
    };
}

impl StorageTypes {
    /// SQLite storage types
    pub const SQLITE: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        default_uuid_type: db::Type::Blob,
        varchar: Some(1_000_000_000),
    };

    pub const POSTGRESQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,
        default_uuid_type: db::Type::Uuid,
        varchar: Some(10_485_760),
    };

    pub const MYSQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(191),
        default_uuid_type: db::Type::Binary(16),
        varchar: Some(65_535),
    };
}
