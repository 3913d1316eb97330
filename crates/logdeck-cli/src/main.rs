//! CLI entry point - the composition root.
//!
//! Initializes logging, bootstraps the CLI context and dispatches to the
//! command handlers. Diagnostics go to stderr; stdout carries log lines and
//! command output only.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use logdeck_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::with_log_dir(cli.log_dir))?;

    match command {
        Commands::Watch(args) => handlers::watch::execute(&ctx, args).await?,
        Commands::Sweep {
            max_age_days,
            dry_run,
        } => handlers::sweep::execute(&ctx, max_age_days, dry_run)?,
        Commands::Processes { json } => handlers::processes::execute(&ctx, json)?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from the working directory
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
