//! fernctl
//!
//! Syncs a YAML configuration file into AWS Systems Manager Parameter Store
//! and provides get/delete helpers for the synced parameters.

// fernctl/src/main.rs
mod config;
mod delete;
mod document;
mod errors;
mod get;
mod ssm;
mod sync;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use ssm::{AwsParameterStore, ParameterTarget};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use sync::{SyncOptions, SyncReport, SyncRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fernctl", version, about = "Sync YAML configuration into AWS SSM Parameter Store", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file (defaults to ./fernctl.json when present)
    #[arg(long, short = 'c', env = "FERNCTL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// AWS region (overrides the configuration file)
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS shared-config profile (overrides the configuration file)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parameter Store operations
    #[command(subcommand)]
    Ssm(SsmCommand),
}

#[derive(Subcommand, Debug)]
enum SsmCommand {
    /// Print a parameter, or every parameter under `path:<path>`
    Get { key: String },

    /// Delete a parameter, or every parameter under `path:<path>`
    Delete { key: String },

    /// Upsert the flattened YAML file under PREFIX and prune stale parameters
    Sync {
        prefix: String,
        file: PathBuf,

        /// Only print what would be upserted and pruned
        #[arg(long)]
        dry_run: bool,
    },
}

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point. Commands run one at a time on a single thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    setup_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Handler failures are reported on stdout and do not change the exit code.
    if let Err(e) = run_app(cli).await {
        println!("error: {:#}", e);
    }
    ExitCode::SUCCESS
}

async fn run_app(cli: Cli) -> Result<()> {
    let app_config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load fernctl configuration")?
        .with_overrides(cli.region, cli.profile);

    let Command::Ssm(command) = cli.command;
    let store = AwsParameterStore::connect(&app_config.aws).await;

    match command {
        SsmCommand::Get { key } => {
            let target = ParameterTarget::parse(&key)?;
            let mut out = std::io::stdout().lock();
            get::run_get(&store, &target, &mut out).await?;
        }
        SsmCommand::Delete { key } => {
            let target = ParameterTarget::parse(&key)?;
            let report = delete::run_delete(&store, &target, app_config.delete_batch_size).await?;
            let mut out = std::io::stdout().lock();
            report
                .print(&mut out)
                .context("Failed to write delete report")?;
        }
        SsmCommand::Sync {
            prefix,
            file,
            dry_run,
        } => {
            let request = SyncRequest {
                prefix,
                file,
                dry_run,
            };
            let options = SyncOptions {
                prune_untagged: app_config.prune_untagged,
            };
            let report = sync::run_sync_flow(&store, &request, options).await?;
            print_sync_summary(&mut std::io::stdout().lock(), &report)
                .context("Failed to write sync summary")?;
        }
    }
    Ok(())
}

fn print_sync_summary(out: &mut dyn Write, report: &SyncReport) -> std::io::Result<()> {
    if report.dry_run {
        writeln!(
            out,
            "Dry run at {}: would upsert {} and prune {} parameters",
            report.timestamp,
            report.upserted.len(),
            report.pruned.len()
        )
    } else {
        writeln!(
            out,
            "Synced at {}: upserted {}, pruned {} parameters",
            report.timestamp,
            report.upserted.len(),
            report.pruned.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_command() {
        let cli = Cli::try_parse_from(["fernctl", "ssm", "sync", "app", "values.yaml", "--dry-run"]).unwrap();
        match cli.command {
            Command::Ssm(SsmCommand::Sync { prefix, file, dry_run }) => {
                assert_eq!(prefix, "app");
                assert_eq!(file, PathBuf::from("values.yaml"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_get_with_path_selector() {
        let cli = Cli::try_parse_from(["fernctl", "--region", "eu-west-1", "ssm", "get", "path:/app"]).unwrap();
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert!(matches!(cli.command, Command::Ssm(SsmCommand::Get { ref key }) if key == "path:/app"));
    }

    #[test]
    fn test_missing_sync_arguments_rejected() {
        let err = Cli::try_parse_from(["fernctl", "ssm", "sync", "/app"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_sync_summary() {
        let report = SyncReport {
            timestamp: "2026-10-18T12:00:00Z".to_string(),
            upserted: vec!["/app/a".to_string(), "/app/b".to_string()],
            pruned: vec!["/app/c".to_string()],
            dry_run: false,
        };
        let mut out = Vec::new();
        print_sync_summary(&mut out, &report).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Synced at 2026-10-18T12:00:00Z: upserted 2, pruned 1 parameters\n"
        );
    }
}
