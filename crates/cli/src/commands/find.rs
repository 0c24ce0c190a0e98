use clap::Args;
use edutask_dao::{
    futures::{StreamExt as _, TryStreamExt as _},
    Store,
};
use serde_json::Value;
use tracing::info;

use super::{parse_json_arg, print_json};

/// Arguments for the find command.
#[derive(Args, Clone, Default)]
pub struct FindArgs {
    /// Collection to read
    pub collection: String,
    /// Filter as a JSON object; every document matches when omitted
    pub query:      Option<String>,
    /// Validator binding for collections without their own (e.g. `user` for `test_user`)
    #[arg(long)]
    pub schema:     Option<String>,
    /// Stop after this many documents
    #[arg(short, long)]
    pub limit:      Option<usize>,
}

/// Print the documents of `args.collection` matching `args.query`.
///
/// Documents are streamed from the store and printed as they arrive.
pub async fn run(store: &Store, args: FindArgs) -> edutask_dao::Result<()> {
    let query = match args.query {
        Some(ref raw) => parse_json_arg("query", raw)?,
        None => Value::Null,
    };
    let schema_of = args.schema.as_deref().unwrap_or(&args.collection);
    let dao = store.collection_with_schema(&args.collection, schema_of)?;

    info!(
        "Finding documents in collection '{}' matching {}",
        args.collection, query
    );
    let mut documents = dao.find(query).take(args.limit.unwrap_or(usize::MAX));
    let mut printed = 0_usize;
    while let Some(document) = documents.try_next().await? {
        print_json(&document.to_value())?;
        printed = printed.saturating_add(1);
    }
    info!("Found {} documents", printed);
    Ok(())
}
