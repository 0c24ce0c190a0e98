use clap::Args;
use edutask_dao::Store;
use tracing::{info, warn};

/// Arguments for the drop command.
#[derive(Args, Clone, Default)]
pub struct DropArgs {
    /// Collection to remove
    pub collection: String,
}

/// Remove `args.collection` and all of its documents.
///
/// Dropping a collection that holds no documents succeeds.
pub async fn run(store: &Store, args: DropArgs) -> edutask_dao::Result<()> {
    warn!("Dropping collection '{}'", args.collection);
    store.backend().drop_collection(&args.collection).await?;
    info!("Collection '{}' dropped", args.collection);
    Ok(())
}
