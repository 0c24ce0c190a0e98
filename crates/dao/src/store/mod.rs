#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::{
    config::{BackendKind, StoreConfig},
    constants::USER_COLLECTION,
    controller::UserController,
    schema::SchemaRegistry,
    storage::{FsBackend, MemoryBackend, StorageBackend},
    DocumentStore,
    Result,
};

/// The entry point tying a storage backend to the collection validators.
///
/// `Store` owns one backend and one [`SchemaRegistry`] and hands out
/// [`DocumentStore`]s bound to a collection. DAOs obtained from the same store
/// share the backend, so uniqueness holds across them.
///
/// # Examples
///
/// ```no_run
/// use edutask_dao::{Store, StoreConfig};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::open(&StoreConfig::filesystem("/var/lib/edutask")).await?;
///
/// let users = store.collection("user")?;
/// users
///     .create(json!({"firstName": "Jane", "lastName": "Doe", "email": "jane.doe@example.com"}))
///     .await?;
///
/// let jane = store.user_controller()?.get_user_by_email("jane.doe@example.com").await?;
/// assert_eq!(jane["firstName"], "Jane");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    /// Backend shared by every DAO of this store.
    backend: Arc<dyn StorageBackend>,
    /// Validators by collection name.
    schemas: SchemaRegistry,
}

impl Store {
    /// Opens a store as described by `config`.
    ///
    /// The registry starts from the built-in validators; when
    /// `validators_dir` is set, the files found there are loaded on top.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        trace!("Opening store with {:?}", config);
        let backend: Arc<dyn StorageBackend> = match config.backend {
            BackendKind::Filesystem => Arc::new(FsBackend::new(&config.root_path).await?),
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
        };

        let mut schemas = SchemaRegistry::builtin()?;
        if let Some(ref dir) = config.validators_dir {
            schemas.load_dir(dir).await?;
        }

        info!(
            "Store opened with {:?} backend and {} validators",
            config.backend,
            schemas.collections().len()
        );
        Ok(Self::with_backend(backend, schemas))
    }

    /// Builds a store from an existing backend and registry.
    pub fn with_backend(backend: Arc<dyn StorageBackend>, schemas: SchemaRegistry) -> Self {
        Self {
            backend,
            schemas,
        }
    }

    /// Returns the validators known to the store.
    pub const fn schemas(&self) -> &SchemaRegistry { &self.schemas }

    /// Returns the shared backend.
    pub fn backend(&self) -> Arc<dyn StorageBackend> { Arc::clone(&self.backend) }

    /// Returns a DAO for `name`, validated with the schema registered under the
    /// same name.
    pub fn collection(&self, name: &str) -> Result<DocumentStore> { self.collection_with_schema(name, name) }

    /// Returns a DAO for `name`, validated with the schema registered under
    /// `schema_of`.
    ///
    /// Used to run a scratch collection (say `test_user`) under the rules of a
    /// real one.
    pub fn collection_with_schema(&self, name: &str, schema_of: &str) -> Result<DocumentStore> {
        debug!(
            "Binding collection '{}' with the '{}' validator",
            name, schema_of
        );
        let schema = self.schemas.require(schema_of)?;
        DocumentStore::new(name, schema, self.backend())
    }

    /// Returns a user controller reading the `user` collection.
    pub fn user_controller(&self) -> Result<UserController<DocumentStore>> {
        Ok(UserController::new(self.collection(USER_COLLECTION)?))
    }
}
