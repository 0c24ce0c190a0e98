//! The data-access object bound to one collection.


use std::sync::Arc;

use async_stream::stream;
use bson::oid::ObjectId;
use futures::TryStreamExt as _;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    constants::ID_FIELD,
    object_id,
    schema::CollectionSchema,
    storage::{DocumentStream, StorageBackend},
    validation::is_valid_collection_name,
    DaoError,
    Document,
    Fields,
    Result,
};

/// Read access needed by the controllers.
///
/// [`DocumentStore`] is the production implementation; tests substitute a
/// fake returning canned documents.
pub trait DocumentFinder: Send + Sync {
    /// Streams the documents whose fields equal every condition of `query`.
    fn find(&self, query: Value) -> DocumentStream;
}

/// Persists and retrieves the documents of exactly one collection.
///
/// Every write is checked against the collection's validator before it
/// reaches the backend:
/// - a missing required field, a value of the wrong type, or a reference field
///   holding anything but an ObjectId fails with [`DaoError::Write`];
/// - a value colliding on a unique field fails with [`DaoError::DuplicateKey`].
///
/// Reads are not validated.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use edutask_dao::{DocumentStore, MemoryBackend, SchemaRegistry};
/// use serde_json::json;
///
/// # async fn example() -> edutask_dao::Result<()> {
/// let schemas = SchemaRegistry::builtin()?;
/// let videos = DocumentStore::new("video", schemas.require("video")?, Arc::new(MemoryBackend::new()))?;
///
/// let video = videos.create(json!({"url": "testurl"})).await?;
/// assert!(video.id().is_some());
///
/// let found = videos.find_all(json!({"url": "testurl"})).await?;
/// assert_eq!(found, vec![video]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    /// Name of the bound collection.
    collection:    String,
    /// Validator applied on every write.
    schema:        Arc<CollectionSchema>,
    /// Fields the backend must keep unique, derived from the schema.
    unique_fields: Arc<[String]>,
    /// Where documents are persisted.
    backend:       Arc<dyn StorageBackend>,
}

impl DocumentStore {
    /// Binds a DAO to `collection`, validating writes with `schema`.
    pub fn new(collection: &str, schema: Arc<CollectionSchema>, backend: Arc<dyn StorageBackend>) -> Result<Self> {
        if !is_valid_collection_name(collection) {
            warn!("Refusing to bind DAO to invalid collection name '{}'", collection);
            return Err(DaoError::InvalidCollectionName {
                name: collection.to_owned(),
            });
        }
        let unique_fields = schema.unique_fields().into();
        Ok(Self {
            collection: collection.to_owned(),
            schema,
            unique_fields,
            backend,
        })
    }

    /// Returns the name of the bound collection.
    pub fn collection(&self) -> &str { &self.collection }

    /// Returns the validator applied on writes.
    pub fn schema(&self) -> &CollectionSchema { &self.schema }

    /// Validates and stores a new document.
    ///
    /// Returns the stored document, including its newly assigned `_id`. On any
    /// failure nothing is persisted.
    pub async fn create(&self, data: Value) -> Result<Document> {
        trace!("Creating document in collection '{}'", self.collection);
        let fields = self.document_fields(data)?;
        if fields.contains_key(ID_FIELD) {
            return Err(DaoError::write(
                &self.collection,
                "_id is assigned by the store",
            ));
        }
        self.schema
            .validate(&self.collection, &fields)
            .inspect_err(|e| warn!("Rejected write to '{}': {}", self.collection, e))?;

        let document = Document::with_id(&ObjectId::new(), fields);
        self.backend
            .insert(&self.collection, document.clone(), &self.unique_fields)
            .await
            .inspect_err(|e| warn!("Insert into '{}' failed: {}", self.collection, e))?;

        debug!(
            "Created document {:?} in collection '{}'",
            document.id(),
            self.collection
        );
        Ok(document)
    }

    /// Streams every document whose fields equal the conditions of `query`.
    ///
    /// `null` or `{}` match every document. Anything other than an object or
    /// `null` yields a single [`DaoError::InvalidQuery`]. The stream is lazy and
    /// a new call starts over.
    pub fn find(&self, query: Value) -> DocumentStream {
        trace!("Finding documents in collection '{}'", self.collection);
        match query {
            Value::Null => self.backend.find(&self.collection, Fields::new()),
            Value::Object(fields) => self.backend.find(&self.collection, fields),
            other => {
                Box::pin(stream! {
                    yield Err(DaoError::InvalidQuery {
                        reason: format!("expected an object of field conditions, got {}", other),
                    });
                })
            },
        }
    }

    /// Collects [`DocumentStore::find`] into a vector.
    pub async fn find_all(&self, query: Value) -> Result<Vec<Document>> { self.find(query).try_collect().await }

    /// Returns the document with the given hex identifier, if it exists.
    pub async fn find_one(&self, id: &str) -> Result<Option<Document>> {
        let oid = object_id::parse(id)?;
        self.find_by_oid(&oid).await
    }

    /// Applies `$set`-style `changes` to a stored document.
    ///
    /// The merged document is validated like a new one, and uniqueness is
    /// checked against every other document of the collection.
    pub async fn update(&self, id: &str, changes: Value) -> Result<Document> {
        let oid = object_id::parse(id)?;
        let changes = self.document_fields(changes)?;
        if changes.contains_key(ID_FIELD) {
            return Err(DaoError::write(&self.collection, "_id cannot be changed"));
        }

        let mut fields = self
            .find_by_oid(&oid)
            .await?
            .ok_or_else(|| self.not_found(id))?
            .into_fields();
        fields.extend(changes);
        self.schema
            .validate(&self.collection, &fields)
            .inspect_err(|e| warn!("Rejected update of {} in '{}': {}", id, self.collection, e))?;

        let document = Document::from(fields);
        if !self
            .backend
            .replace(&self.collection, document.clone(), &self.unique_fields)
            .await?
        {
            return Err(self.not_found(id));
        }
        debug!("Updated document {} in collection '{}'", id, self.collection);
        Ok(document)
    }

    /// Removes the document with the given hex identifier.
    ///
    /// Returns whether a document was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let oid = object_id::parse(id)?;
        let removed = self.backend.delete_many(&self.collection, id_query(&oid)).await?;
        Ok(removed > 0)
    }

    /// Removes every document matching `query`.
    pub async fn delete_many(&self, query: Value) -> Result<u64> {
        let query = match query {
            Value::Null => Fields::new(),
            other => self.document_fields(other)?,
        };
        self.backend.delete_many(&self.collection, query).await
    }

    /// Removes the whole collection.
    pub async fn drop(&self) -> Result<()> {
        debug!("Dropping collection '{}'", self.collection);
        self.backend.drop_collection(&self.collection).await
    }

    async fn find_by_oid(&self, oid: &ObjectId) -> Result<Option<Document>> {
        let mut matches = self.backend.find(&self.collection, id_query(oid));
        matches.try_next().await
    }

    fn document_fields(&self, data: Value) -> Result<Fields> {
        match data {
            Value::Object(fields) => Ok(fields),
            other => {
                Err(DaoError::write(
                    &self.collection,
                    format!("document must be an object, got {}", other),
                ))
            },
        }
    }

    fn not_found(&self, id: &str) -> DaoError {
        DaoError::DocumentNotFound {
            id:         id.to_owned(),
            collection: self.collection.clone(),
        }
    }
}

impl DocumentFinder for DocumentStore {
    fn find(&self, query: Value) -> DocumentStream { Self::find(self, query) }
}

fn id_query(oid: &ObjectId) -> Fields {
    let mut query = Fields::new();
    query.insert(ID_FIELD.to_owned(), object_id::to_value(oid));
    query
}
