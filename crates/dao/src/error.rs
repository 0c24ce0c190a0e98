use thiserror::Error;

use crate::constants::INVALID_EMAIL_MESSAGE;

/// Error type for every DAO and controller operation.
///
/// Write-time failures are split in two families so callers can tell a badly
/// shaped document ([`DaoError::Write`]) apart from one that conflicts with data
/// already stored ([`DaoError::DuplicateKey`]).
#[derive(Error, Debug)]
pub enum DaoError {
    /// The document violates its collection's validator (missing required
    /// field, wrong value type, malformed reference identifier).
    #[error("Document failed validation for collection '{collection}': {reason}")]
    Write {
        collection: String,
        reason:     String,
    },

    /// A field under a uniqueness constraint collides with an existing document.
    #[error("Duplicate key in collection '{collection}': {field} = {value}")]
    DuplicateKey {
        collection: String,
        field:      String,
        value:      String,
    },

    /// The email passed to a user lookup is not syntactically an address.
    #[error("{}", INVALID_EMAIL_MESSAGE)]
    InvalidEmail,

    /// No user matched the requested email.
    #[error("No user found with mail {email}")]
    UserNotFound {
        email: String,
    },

    /// Document not found in collection
    #[error("Document '{id}' not found in collection '{collection}'")]
    DocumentNotFound {
        id:         String,
        collection: String,
    },

    /// The string is not a 24 character hexadecimal ObjectId.
    #[error("Invalid document ID: {id}")]
    InvalidObjectId {
        id: String,
    },

    /// A query was not a JSON object of field conditions.
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        reason: String,
    },

    /// Invalid collection name format
    #[error("Invalid collection name: {name}")]
    InvalidCollectionName {
        name: String,
    },

    /// No validator is registered for the collection.
    #[error("No schema registered for collection '{collection}'")]
    SchemaNotFound {
        collection: String,
    },

    /// A validator file could not be interpreted.
    #[error("Invalid schema for collection '{collection}': {reason}")]
    InvalidSchema {
        collection: String,
        reason:     String,
    },

    /// I/O operations failed (file system, network, etc.)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },
}

impl DaoError {
    /// Returns `true` for schema violations raised on write.
    pub const fn is_write_error(&self) -> bool { matches!(self, Self::Write { .. }) }

    /// Returns `true` for uniqueness violations raised on write.
    pub const fn is_duplicate_key(&self) -> bool { matches!(self, Self::DuplicateKey { .. }) }

    pub(crate) fn write<C, R>(collection: C, reason: R) -> Self
    where
        C: Into<String>,
        R: Into<String>,
    {
        Self::Write {
            collection: collection.into(),
            reason:     reason.into(),
        }
    }
}

/// Result type alias for DAO operations.
pub type Result<T> = std::result::Result<T, DaoError>;
