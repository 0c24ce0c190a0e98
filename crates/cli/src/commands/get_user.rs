use clap::Args;
use edutask_dao::Store;
use tracing::{error, info};

use super::print_json;

/// Arguments for the get-user command.
#[derive(Args, Clone, Default)]
pub struct GetUserArgs {
    /// Email address of the user
    pub email: String,
}

/// Resolve a user by email and print it.
///
/// Fails on a malformed address or when no user matches. When several users
/// share the address, the first is printed and a warning is logged.
pub async fn run(store: &Store, args: GetUserArgs) -> edutask_dao::Result<()> {
    info!("Looking up user with email '{}'", args.email);
    let user = store
        .user_controller()?
        .get_user_by_email(&args.email)
        .await
        .inspect_err(|e| error!("User lookup failed: {}", e))?;
    print_json(&user.to_value())
}
