use clap::Parser as _;

use crate::{
    commands::{run_command, Cli},
    logging::init_tracing,
};

/// Run the Edutask CLI.
///
/// Parses the command line, installs the tracing subscriber and executes the
/// requested command against the configured store.
pub async fn run() -> edutask_dao::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json, cli.verbose);

    run_command(cli).await
}
