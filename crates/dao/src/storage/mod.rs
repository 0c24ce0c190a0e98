//! Storage backends the DAO delegates persistence to.
//!
//! A backend only stores and retrieves documents; validation happens in the
//! DAO before a document reaches it. Uniqueness is the exception: checking for
//! a collision and inserting must happen under the same write lock, so the
//! backend receives the list of unique fields with every write.

mod filesystem;
mod memory;

use std::{fmt, pin::Pin};

use async_trait::async_trait;
use tokio_stream::Stream;

pub use self::{filesystem::FsBackend, memory::MemoryBackend};
use crate::{DaoError, Document, Fields, Result};

/// Lazily evaluated, finite stream of documents.
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<Document>> + Send>>;

/// Capability set every storage engine provides to the DAO.
#[async_trait]
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Stores a new document.
    ///
    /// Fails with [`DaoError::DuplicateKey`] when one of `unique_fields` holds a
    /// value already present in another document of the collection.
    async fn insert(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<()>;

    /// Streams every document of `collection` matching `query`.
    ///
    /// Each call starts a fresh scan. A collection that does not exist yields
    /// an empty stream.
    fn find(&self, collection: &str, query: Fields) -> DocumentStream;

    /// Replaces the stored document with the same `_id`.
    ///
    /// Returns `false` when no such document exists. Uniqueness is checked
    /// against every other document.
    async fn replace(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<bool>;

    /// Removes every document matching `query` and returns how many were removed.
    async fn delete_many(&self, collection: &str, query: Fields) -> Result<u64>;

    /// Removes the collection and all its documents.
    async fn drop_collection(&self, collection: &str) -> Result<()>;
}

/// Finds the first unique field on which `candidate` collides with `existing`.
///
/// A document never collides with itself, and a field missing from the
/// candidate cannot collide.
pub(crate) fn unique_conflict(existing: &Document, candidate: &Document, unique_fields: &[String]) -> Option<DuplicateField> {
    if existing.id().is_some() && existing.id() == candidate.id() {
        return None;
    }
    unique_fields.iter().find_map(|field| {
        let value = candidate.get(field)?;
        (existing.get(field) == Some(value)).then(|| {
            DuplicateField {
                field: field.clone(),
                value: value.to_string(),
            }
        })
    })
}

/// The field and rendered value of a uniqueness collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DuplicateField {
    pub(crate) field: String,
    pub(crate) value: String,
}

impl DuplicateField {
    pub(crate) fn into_error(self, collection: &str) -> DaoError {
        DaoError::DuplicateKey {
            collection: collection.to_owned(),
            field:      self.field,
            value:      self.value,
        }
    }
}
