use tracing::error;

/// Argument parsing and dispatch.
mod cli;
/// Subcommand implementations.
mod commands;
/// Tracing setup.
mod logging;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
