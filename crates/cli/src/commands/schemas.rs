use clap::Args;
use edutask_dao::Store;
use serde_json::{json, Value};

use super::print_json;

/// Arguments for the schemas command.
#[derive(Args, Clone, Default)]
pub struct SchemasArgs {
    /// Print the validator of this collection instead of the list
    pub collection: Option<String>,
}

/// List the validators known to the store, or print one as `$jsonSchema`.
pub fn run(store: &Store, args: SchemasArgs) -> edutask_dao::Result<()> {
    let output = match args.collection {
        Some(ref collection) => {
            let schema = serde_json::to_value(&*store.schemas().require(collection)?)?;
            json!({ "$jsonSchema": schema })
        },
        None => {
            Value::Array(
                store
                    .schemas()
                    .collections()
                    .into_iter()
                    .map(Value::from)
                    .collect(),
            )
        },
    };
    print_json(&output)
}
