mod commands;
mod config;
mod logging;
mod registry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use probe_logging::probe_error;

use logging::LogDestination;

#[derive(Parser)]
#[command(name = "dapp_probe", about = "Check dapp URLs before adding them to the wallet")]
struct Cli {
    /// RON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Registry file, overrides the config file.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,
    /// Probe timeout in milliseconds; 0 or less disables it.
    #[arg(long, global = true, allow_negative_numbers = true)]
    timeout_ms: Option<i64>,
    #[arg(long, global = true, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe one or more URLs without registering them.
    Detect {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Probe a URL and register it when it is a reachable HTTPS dapp.
    Add { url: String },
    /// Show registered dapps.
    List,
    /// Unregister a dapp by origin or by any URL on that origin.
    Remove { target: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    logging::initialize(cli.log, level);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            probe_error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(registry) = cli.registry {
        config.registry = registry;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    match cli.command {
        Commands::Detect { urls, json } => commands::detect(&config, &urls, json),
        Commands::Add { url } => commands::add(&config, &url),
        Commands::List => commands::list(&config.registry),
        Commands::Remove { target } => commands::remove(&config.registry, &target),
    }
}
