//! # Delay Monitor Configuration Validator
//!
//! Command-line tool for checking run configuration before it reaches the
//! scheduler. Prints the validated configuration on success and exits non-zero
//! on the first problem found.

use anyhow::Context;
use clap::Parser;
use delay_monitor::config::ConfigLoader;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate delay monitor run configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (default: $DELAY_MONITOR_CONFIG_PATH or config/delay_monitor.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore DELAY_MONITOR_* environment overrides
    #[arg(long)]
    no_env: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() {
    delay_monitor::logging::init_structured_logging();
    let cli = Cli::parse();

    if let Err(e) = validate(&cli) {
        error!(error = %format!("{e:#}"), "Configuration validation failed");
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

fn validate(cli: &Cli) -> anyhow::Result<()> {
    let raw = match &cli.config {
        Some(path) => {
            let mut loader = ConfigLoader::new().with_file(path);
            if cli.no_env {
                loader = loader.without_environment();
            }
            loader
                .build()
                .with_context(|| format!("loading {}", path.display()))?
        }
        None if cli.no_env => ConfigLoader::new()
            .with_optional_file(delay_monitor::constants::config_keys::DEFAULT_CONFIG_FILE)
            .without_environment()
            .build()?,
        None => ConfigLoader::load()?,
    };

    let config = raw.validate().context("validating run configuration")?;
    info!(destination_id = %config.destination_id, "Configuration is valid");

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => {
            println!("✅ Configuration is valid");
            println!("  destination_id:         {}", config.destination_id);
            println!("  batch_size:             {}", config.batch_size);
            println!("  max_concurrent_batches: {}", config.max_concurrent_batches);
            println!("  target_range:           {}", config.target_range);
            println!("  expected_modules:       {}", config.expected_modules.join(", "));
        }
    }

    Ok(())
}
