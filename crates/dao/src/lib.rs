//! Schema-validated data access for the Edutask backend.
//!
//! A [`DocumentStore`] wraps one collection and checks every write against the
//! collection's validator before handing the document to a
//! [`StorageBackend`]. The [`UserController`] resolves users by email on top of
//! it.

pub mod config;
pub mod constants;
pub mod controller;
pub mod dao;
pub mod document;
pub mod error;
pub mod filtering;
pub mod object_id;
pub mod schema;
pub mod storage;
pub mod store;
pub mod validation;

pub use bson::oid::ObjectId;
pub use config::{BackendKind, StoreConfig};
pub use controller::UserController;
pub use dao::{DocumentFinder, DocumentStore};
pub use document::{Document, Fields};
pub use error::{DaoError, Result};
pub use schema::{BsonType, CollectionSchema, PropertySchema, SchemaRegistry, TypeSpec};
pub use storage::{DocumentStream, FsBackend, MemoryBackend, StorageBackend};
pub use store::Store;

// Re-export for callers consuming `DocumentStream`s.
pub use futures;
