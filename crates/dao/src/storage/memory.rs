use std::{collections::HashMap, sync::Arc};

use async_stream::stream;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::{unique_conflict, DocumentStream, StorageBackend};
use crate::{filtering::matches_query, DaoError, Document, Fields, Result};

/// In-process storage backend.
///
/// Documents live in a map of collection name to insertion-ordered documents.
/// Nothing survives the process; intended for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self { Self::default() }

    /// Returns the number of documents held in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn insert(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<()> {
        trace!("Inserting document into in-memory collection '{}'", collection);
        if document.id().is_none() {
            return Err(DaoError::write(collection, "document has no _id"));
        }

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_owned()).or_default();
        if let Some(conflict) = documents
            .iter()
            .find_map(|existing| unique_conflict(existing, &document, unique_fields))
        {
            debug!(
                "Rejecting insert into '{}': duplicate {}",
                collection, conflict.field
            );
            return Err(conflict.into_error(collection));
        }
        documents.push(document);
        Ok(())
    }

    fn find(&self, collection: &str, query: Fields) -> DocumentStream {
        let collections = Arc::clone(&self.collections);
        let collection = collection.to_owned();
        Box::pin(stream! {
            let matches: Vec<Document> = collections
                .read()
                .await
                .get(&collection)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|doc| matches_query(doc, &query))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            for doc in matches {
                yield Ok(doc);
            }
        })
    }

    async fn replace(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection)
        else {
            return Ok(false);
        };

        if let Some(conflict) = documents
            .iter()
            .find_map(|existing| unique_conflict(existing, &document, unique_fields))
        {
            return Err(conflict.into_error(collection));
        }

        let id = document.id();
        match documents.iter_mut().find(|doc| doc.id().is_some() && doc.id() == id) {
            Some(slot) => {
                *slot = document;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, query: Fields) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection)
        else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|doc| !matches_query(doc, &query));
        let removed = before.saturating_sub(documents.len());
        debug!("Deleted {} documents from '{}'", removed, collection);
        Ok(removed as u64)
    }

    async fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collections.write().await.remove(collection);
        debug!("Dropped in-memory collection '{}'", collection);
        Ok(())
    }
}
