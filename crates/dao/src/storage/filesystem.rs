use std::path::{Path, PathBuf};

use async_stream::stream;
use async_trait::async_trait;
use futures::{StreamExt as _, TryStreamExt as _};
use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::{debug, error, trace, warn};

use super::{unique_conflict, DocumentStream, DuplicateField, StorageBackend};
use crate::{
    constants::{DATA_DIR, DOCUMENT_EXTENSION},
    filtering::matches_query,
    validation::is_valid_collection_name,
    DaoError,
    Document,
    Fields,
    Result,
};

/// Filesystem-backed storage.
///
/// The layout mirrors a document DBMS on disk:
/// - `{root}/data/` holds one directory per collection
/// - `{root}/data/{collection}/{id}.json` holds one pretty-printed document
///
/// Writes are serialised through a single mutex so the uniqueness scan and the
/// file write of one insert cannot interleave with another writer.
#[derive(Debug)]
pub struct FsBackend {
    /// Root directory of the store.
    root_path:  PathBuf,
    /// Held for the duration of every mutating operation.
    write_lock: Mutex<()>,
}

impl FsBackend {
    /// Opens (creating if needed) a backend rooted at `root_path`.
    pub async fn new<P>(root_path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let root_path = root_path.as_ref().to_path_buf();
        trace!("Opening filesystem backend at {:?}", root_path);
        tokio_fs::create_dir_all(root_path.join(DATA_DIR))
            .await
            .map_err(|e| {
                error!(
                    "Failed to create data directory under {:?}: {}",
                    root_path, e
                );
                e
            })?;
        Ok(Self {
            root_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the root directory of the backend.
    pub fn root_path(&self) -> &Path { &self.root_path }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        if !is_valid_collection_name(collection) {
            return Err(DaoError::InvalidCollectionName {
                name: collection.to_owned(),
            });
        }
        Ok(self.root_path.join(DATA_DIR).join(collection))
    }

    fn document_path(&self, collection: &str, document: &Document) -> Result<PathBuf> {
        let id = document
            .id()
            .ok_or_else(|| DaoError::write(collection, "document has no _id"))?;
        Ok(self
            .collection_path(collection)?
            .join(format!("{}.{}", id.to_hex(), DOCUMENT_EXTENSION)))
    }

    async fn write_document(path: &Path, document: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        tokio_fs::write(path, content).await.map_err(|e| {
            error!("Failed to write document file {:?}: {}", path, e);
            e
        })?;
        Ok(())
    }

    /// Scans the collection for a document colliding with `candidate`.
    async fn find_conflict(
        &self,
        collection: &str,
        candidate: &Document,
        unique_fields: &[String],
    ) -> Result<Option<DuplicateField>> {
        if unique_fields.is_empty() {
            return Ok(None);
        }
        let mut existing = self.find(collection, Fields::new());
        while let Some(doc) = existing.next().await {
            if let Some(conflict) = unique_conflict(&doc?, candidate, unique_fields) {
                return Ok(Some(conflict));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn insert(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<()> {
        let path = self.document_path(collection, &document)?;
        let _guard = self.write_lock.lock().await;

        if let Some(conflict) = self
            .find_conflict(collection, &document, unique_fields)
            .await?
        {
            debug!(
                "Rejecting insert into '{}': duplicate {}",
                collection, conflict.field
            );
            return Err(conflict.into_error(collection));
        }

        if let Some(parent) = path.parent() {
            tokio_fs::create_dir_all(parent).await?;
        }
        Self::write_document(&path, &document).await?;
        debug!("Document written to {:?}", path);
        Ok(())
    }

    fn find(&self, collection: &str, query: Fields) -> DocumentStream {
        let collection_path = self.collection_path(collection);
        Box::pin(stream! {
            let collection_path = match collection_path {
                Ok(path) => path,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut entries = match tokio_fs::read_dir(&collection_path).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                };

                let path = entry.path();
                let is_document = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.'))
                    && path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXTENSION);
                if !is_document {
                    continue;
                }

                let content = match tokio_fs::read_to_string(&path).await {
                    Ok(content) => content,
                    // Removed between listing and reading.
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => {
                        yield Err(e.into());
                        continue;
                    }
                };
                match serde_json::from_str::<Document>(&content) {
                    Ok(doc) if matches_query(&doc, &query) => {
                        yield Ok(doc);
                    },
                    Ok(_) => {},
                    Err(e) => {
                        warn!("Skipping unreadable document file {:?}: {}", path, e);
                    }
                }
            }
        })
    }

    async fn replace(&self, collection: &str, document: Document, unique_fields: &[String]) -> Result<bool> {
        let path = self.document_path(collection, &document)?;
        let _guard = self.write_lock.lock().await;

        if !tokio_fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }
        if let Some(conflict) = self
            .find_conflict(collection, &document, unique_fields)
            .await?
        {
            return Err(conflict.into_error(collection));
        }
        Self::write_document(&path, &document).await?;
        Ok(true)
    }

    async fn delete_many(&self, collection: &str, query: Fields) -> Result<u64> {
        let collection_path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        let matching: Vec<Document> = self.find(collection, query).try_collect().await?;
        let mut removed = 0_u64;
        for id in matching.iter().filter_map(Document::id) {
            let path = collection_path.join(format!("{}.{}", id.to_hex(), DOCUMENT_EXTENSION));
            tokio_fs::remove_file(&path).await?;
            removed = removed.saturating_add(1);
        }
        debug!("Deleted {} documents from '{}'", removed, collection);
        Ok(removed)
    }

    async fn drop_collection(&self, collection: &str) -> Result<()> {
        let collection_path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;

        match tokio_fs::remove_dir_all(&collection_path).await {
            Ok(()) => {
                debug!("Dropped collection directory {:?}", collection_path);
                Ok(())
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(
                    "Failed to drop collection directory {:?}: {}",
                    collection_path, e
                );
                Err(e.into())
            },
        }
    }
}
