//! probmodelseed - command-line client for the ProbModelSEED service
//!
#![doc = "Main entry point for the probmodelseed binary."]

use anyhow::Result;
use colored::Colorize;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use probmodelseed::cli::{Cli, Commands};
use probmodelseed::commands;
use probmodelseed::config::{Config, DEFAULT_CONFIG_PATH};
use probmodelseed::ProbModelSeedError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    if let Err(e) = run(cli).await {
        report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Call {
            method,
            input,
            input_file,
        } => {
            commands::call::run_call(&config, &method, input, input_file).await?;
            Ok(())
        }
        Commands::ListModels { json } => {
            commands::models::list_models(&config, json).await?;
            Ok(())
        }
        Commands::Methods => {
            commands::methods::list_methods();
            Ok(())
        }
        Commands::Auth { command } => {
            commands::auth::handle_auth(&config, command)?;
            Ok(())
        }
    }
}

fn report_error(error: &anyhow::Error) {
    eprintln!("{}", format!("Error: {:#}", error).red());

    // Rejections also carry a structured payload worth showing verbatim.
    if let Some(ProbModelSeedError::Rpc(rpc)) = error.downcast_ref::<ProbModelSeedError>() {
        if let Ok(rendered) = serde_json::to_string_pretty(&rpc.to_value()) {
            eprintln!("{}", rendered);
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json_logs: bool) {
    let default_directive = if verbose {
        "probmodelseed=debug"
    } else {
        "probmodelseed=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
