//! Names and literals shared across the DAO.
//!
//! Centralised here so the on-disk layout, the extended-JSON keys and the
//! operator-visible messages stay consistent between modules.

/// Directory name for storing collection data within a store.
pub const DATA_DIR: &str = "data";

/// File extension for document and validator files.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Field holding the store-assigned identifier of a document.
pub const ID_FIELD: &str = "_id";

/// Extended-JSON key wrapping an ObjectId's hex form.
pub const OID_KEY: &str = "$oid";

/// Extended-JSON key wrapping a date.
pub const DATE_KEY: &str = "$date";

/// Top-level key of a validator document.
pub const JSON_SCHEMA_KEY: &str = "$jsonSchema";

/// Collection holding user documents.
pub const USER_COLLECTION: &str = "user";

/// Field used to look users up.
pub const EMAIL_FIELD: &str = "email";

/// Message carried by [`crate::DaoError::InvalidEmail`].
pub const INVALID_EMAIL_MESSAGE: &str = "Error: invalid email address";

/// Prefix of the warning logged when an email matches several users.
pub const DUPLICATE_USER_WARNING: &str = "Error: more than one user found with mail";
