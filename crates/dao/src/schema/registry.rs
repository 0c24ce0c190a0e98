use std::{collections::HashMap, path::Path, sync::Arc};

use tokio::fs as tokio_fs;
use tracing::{debug, error, trace, warn};

use super::CollectionSchema;
use crate::{constants::DOCUMENT_EXTENSION, DaoError, Result};

/// Validators bundled with the crate, one per Edutask collection.
const BUILTIN_VALIDATORS: &[(&str, &str)] = &[
    ("user", include_str!("../../validators/user.json")),
    ("task", include_str!("../../validators/task.json")),
    ("todo", include_str!("../../validators/todo.json")),
    ("video", include_str!("../../validators/video.json")),
];

/// Lookup table from collection name to its validator.
///
/// Schemas are shared behind `Arc` so every DAO bound to a collection sees the
/// same declaration without copying it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<CollectionSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Creates a registry holding the bundled `user`, `task`, `todo` and `video`
    /// validators.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for &(collection, content) in BUILTIN_VALIDATORS {
            let schema = CollectionSchema::from_validator_str(collection, content)?;
            registry.register(collection, schema);
        }
        Ok(registry)
    }

    /// Registers (or replaces) the validator of a collection.
    pub fn register(&mut self, collection: &str, schema: CollectionSchema) {
        trace!("Registering schema for collection '{}'", collection);
        self.schemas
            .insert(collection.to_owned(), Arc::new(schema));
    }

    /// Returns the validator of a collection, if any.
    pub fn get(&self, collection: &str) -> Option<Arc<CollectionSchema>> { self.schemas.get(collection).cloned() }

    /// Returns the validator of a collection or a `SchemaNotFound` error.
    pub fn require(&self, collection: &str) -> Result<Arc<CollectionSchema>> {
        self.get(collection).ok_or_else(|| {
            warn!("No schema registered for collection '{}'", collection);
            DaoError::SchemaNotFound {
                collection: collection.to_owned(),
            }
        })
    }

    /// Returns the registered collection names, sorted.
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Loads every `<collection>.json` validator found in `dir`.
    ///
    /// Files override validators already registered under the same name.
    /// Returns the number of validators loaded.
    pub async fn load_dir<P>(&mut self, dir: P) -> Result<usize>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        debug!("Loading validators from {:?}", dir);
        let mut entries = tokio_fs::read_dir(dir).await.map_err(|e| {
            error!("Failed to read validators directory {:?}: {}", dir, e);
            e
        })?;

        let mut loaded = 0_usize;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|stem| stem.to_str())
            else {
                warn!("Skipping validator with non UTF-8 name: {:?}", path);
                continue;
            };

            let content = tokio_fs::read_to_string(&path).await?;
            let schema = CollectionSchema::from_validator_str(collection, &content)?;
            self.register(collection, schema);
            loaded = loaded.saturating_add(1);
        }

        debug!("Loaded {} validators from {:?}", loaded, dir);
        Ok(loaded)
    }
}
