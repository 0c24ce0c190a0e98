use clap::Args;
use edutask_dao::Store;
use tracing::{error, info};

use super::{parse_json_arg, print_json};

/// Arguments for the create command.
#[derive(Args, Clone, Default)]
pub struct CreateArgs {
    /// Collection to write to
    pub collection: String,
    /// Document as a JSON object
    pub data:       String,
    /// Validate with another collection's validator (e.g. `user` for `test_user`)
    #[arg(long)]
    pub schema:     Option<String>,
}

/// Validate `args.data` and store it in `args.collection`.
///
/// The stored document, including its generated `_id`, is printed to stdout.
pub async fn run(store: &Store, args: CreateArgs) -> edutask_dao::Result<()> {
    let schema_of = args.schema.as_deref().unwrap_or(&args.collection);
    info!(
        "Creating document in collection '{}' (validator '{}')",
        args.collection, schema_of
    );

    let data = parse_json_arg("document", &args.data)?;
    let dao = store.collection_with_schema(&args.collection, schema_of)?;

    let document = dao.create(data).await.inspect_err(|e| {
        error!(
            "Failed to create document in collection '{}': {}",
            args.collection, e
        );
    })?;
    if let Some(id) = document.id() {
        info!("Document {} created", id.to_hex());
    }
    print_json(&document.to_value())
}
