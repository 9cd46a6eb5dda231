use anyhow::Result;
use bizdash_core::{AppConfig, ConfigLoader};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{DailySalesArgs, MarketingArgs};

#[derive(Parser)]
#[command(name = "bizdash")]
#[command(about = "Daily sales and marketing analytics over CSV extracts", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "config/Config.toml")]
    config: PathBuf,

    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a transaction log into a daily revenue table
    DailySales(DailySalesArgs),
    /// Print marketing dashboard aggregates
    Marketing(MarketingArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_from(&cli.config)?;

    init_logging(&config, cli.log_file.as_deref())?;
    tracing::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Commands::DailySales(args) => commands::run_daily_sales(args, &config)?,
        Commands::Marketing(args) => commands::run_marketing(args, &config)?,
    }

    Ok(())
}

fn init_logging(config: &AppConfig, log_file: Option<&std::path::Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            // Reports go to stdout, logs to stderr
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
