use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use edutask_dao::{DaoError, Store, StoreConfig};
use serde_json::Value;
use tracing::debug;

/// Create command module.
pub mod create;
/// Drop command module.
pub mod drop;
/// Find command module.
pub mod find;
/// Get-user command module.
pub mod get_user;
/// Schemas command module.
pub mod schemas;

/// The Edutask data-access CLI.
///
/// Every command opens the store described by `--config`, with `--data-dir`
/// and `--validators` overriding the file, then runs against it.
///
/// # Examples
///
/// ```bash
/// edutask --data-dir ./data create user '{"firstName": "Jane", "lastName": "Doe", "email": "jane@example.com"}'
/// edutask --data-dir ./data get-user jane@example.com
/// ```
#[derive(Parser)]
#[command(name = "edutask")]
#[command(about = "Schema-validated document store for Edutask")]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Store root directory
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory of `<collection>.json` validators overriding the built-in ones
    #[arg(long, value_name = "DIR", global = true)]
    pub validators: Option<PathBuf>,

    /// JSON store configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (can be used multiple times: -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Enumeration of all available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a JSON object and store it as a new document.
    Create(create::CreateArgs),
    /// Print the documents of a collection matching a filter.
    Find(find::FindArgs),
    /// Look up a user by email address.
    GetUser(get_user::GetUserArgs),
    /// Remove a collection and every document in it.
    Drop(drop::DropArgs),
    /// List the known validators, or print one of them.
    Schemas(schemas::SchemasArgs),
}

impl Cli {
    /// Resolves the store configuration from the config file and flags.
    pub async fn store_config(&self) -> edutask_dao::Result<StoreConfig> {
        let mut config = match self.config {
            Some(ref path) => StoreConfig::load(path).await?,
            None => StoreConfig::default(),
        };
        if let Some(ref dir) = self.data_dir {
            config.root_path = dir.clone();
        }
        if let Some(ref dir) = self.validators {
            config.validators_dir = Some(dir.clone());
        }
        debug!("Resolved store configuration: {:?}", config);
        Ok(config)
    }
}

/// Parses a JSON argument, reporting failures as configuration errors.
pub fn parse_json_arg(name: &str, raw: &str) -> edutask_dao::Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        DaoError::Config {
            message: format!("invalid JSON for {}: {}", name, e),
        }
    })
}

/// Writes a value to stdout as pretty JSON.
pub fn print_json(value: &Value) -> edutask_dao::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}

/// Execute the parsed CLI command.
///
/// Opens the store once and hands it to the command handler.
pub async fn run_command(cli: Cli) -> edutask_dao::Result<()> {
    let config = cli.store_config().await?;
    let store = Store::open(&config).await?;

    match cli.command {
        Commands::Create(args) => create::run(&store, args).await,
        Commands::Find(args) => find::run(&store, args).await,
        Commands::GetUser(args) => get_user::run(&store, args).await,
        Commands::Drop(args) => drop::run(&store, args).await,
        Commands::Schemas(args) => schemas::run(&store, args),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "edutask",
            "--data-dir",
            "/tmp/edutask",
            "create",
            "user",
            r#"{"email": "a@b.c"}"#,
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/edutask")));
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.collection, "user");
                assert_eq!(args.data, r#"{"email": "a@b.c"}"#);
                assert!(args.schema.is_none());
            },
            _ => panic!("Expected Create command"),
        }

        let cli = Cli::try_parse_from(["edutask", "get-user", "mobn23@student.bth.se"]).unwrap();
        match cli.command {
            Commands::GetUser(args) => assert_eq!(args.email, "mobn23@student.bth.se"),
            _ => panic!("Expected GetUser command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["edutask", "schemas", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn test_invalid_command() {
        assert!(
            Cli::try_parse_from(["edutask", "migrate"]).is_err(),
            "unknown commands should be rejected"
        );
        assert!(
            Cli::try_parse_from(["edutask", "create", "user"]).is_err(),
            "create requires a document"
        );
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edutask.json");
        tokio::fs::write(&path, r#"{"root_path": "/from/file", "backend": "memory"}"#)
            .await
            .unwrap();

        let cli = Cli::try_parse_from([
            "edutask",
            "--config",
            path.to_str().unwrap(),
            "--data-dir",
            "/from/flag",
            "schemas",
        ])
        .unwrap();
        let config = cli.store_config().await.unwrap();
        assert_eq!(config.root_path, PathBuf::from("/from/flag"));
        assert_eq!(config.backend, edutask_dao::BackendKind::Memory);
    }

    #[test]
    fn test_parse_json_arg_reports_config_error() {
        let err = parse_json_arg("data", "{not json").unwrap_err();
        assert!(matches!(err, DaoError::Config { .. }));
        assert_eq!(parse_json_arg("data", "{}").unwrap(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_run_command_create_then_find() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let create = Cli::try_parse_from([
            "edutask",
            "--data-dir",
            data_dir,
            "create",
            "video",
            r#"{"url": "testurl"}"#,
        ])
        .unwrap();
        run_command(create).await.unwrap();

        let find = Cli::try_parse_from(["edutask", "--data-dir", data_dir, "find", "video"]).unwrap();
        run_command(find).await.unwrap();

        let wrong_type = Cli::try_parse_from([
            "edutask",
            "--data-dir",
            data_dir,
            "create",
            "video",
            r#"{"url": 5}"#,
        ])
        .unwrap();
        assert!(run_command(wrong_type).await.unwrap_err().is_write_error());
    }
}
