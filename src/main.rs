use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sync_auth::bootstrap::{self, Options};
use sync_auth::cli::Cli;
use sync_auth::config;
use sync_auth::error::BootstrapError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{:#}", err).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Checked before config or network so a bare invocation has no side effects.
    let Some(credentials_path) = cli.credentials.as_deref() else {
        return Err(BootstrapError::MissingArgument.into());
    };
    let config = config::load(cli.config.as_deref())?
        .with_overrides(cli.output.as_deref(), &cli.scopes)?;
    tracing::debug!(storage_file = %config.storage_file.display(), "resolved config");

    let options = Options {
        open_browser: cli.open,
        listen: cli.listen,
    };
    let stdin = io::stdin();
    bootstrap::run(
        Some(credentials_path),
        &config,
        options,
        stdin.lock(),
        io::stdout().lock(),
    )?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sync_auth=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
