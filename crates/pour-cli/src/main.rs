//! pour - verified installs of prebuilt release binaries

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pour_cli::cmd;
use pour_cli::ui::ConsoleReporter;
use pour_cli::{Cli, Commands};
use pour_core::InstallError;
use pour_schema::{FailureReason, SchemaError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ConsoleReporter::new(false).failure(failure_tag(&e), &format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default `warn` level.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The `FailureReason` for an install or schema failure, `error` otherwise.
fn failure_tag(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<InstallError>() {
        e.reason().as_str()
    } else if err.downcast_ref::<SchemaError>().is_some() {
        FailureReason::InvalidField.as_str()
    } else {
        "error"
    }
}

async fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Check { path, strict } => cmd::check::check(global, &path, strict),
        Commands::Url { path } => cmd::url::url(global, &path),
        Commands::Install {
            path,
            allow_unverified,
            dry_run,
        } => cmd::install::install(global, &path, allow_unverified, dry_run).await,
        Commands::History { path } => cmd::history::history(global, &path),
        Commands::List => cmd::list::list(global),
        Commands::Import { formula, output } => {
            cmd::import::import(global, &formula, output.as_deref())
        }
        Commands::New { name, output_dir } => cmd::new::new(global, &name, &output_dir).map(|_| ()),
        Commands::Hash { files } => cmd::hash::hash(&files),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
