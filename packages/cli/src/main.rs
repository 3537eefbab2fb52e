#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the book pipeline.
//!
//! Each stage is its own subcommand. Without one, an interactive menu
//! picks the stage.

mod interactive;
mod stages;

use std::path::{Path, PathBuf};

use book_pipeline::inspect::DEFAULT_SAMPLE_SIZE;
use book_pipeline::{ConfigError, PipelineConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "book_pipeline", about = "Scrape, normalize and inspect book listings")]
struct Cli {
    /// Read configuration from a TOML file instead of environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the catalog page into the document store
    Extract,
    /// Normalize every stored listing into the key-value store
    Transform,
    /// Print a sample of the raw listings in the document store
    Inspect {
        /// Maximum number of listings to print (at least 1)
        #[arg(
            long,
            default_value_t = DEFAULT_SAMPLE_SIZE,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        limit: u32,
    },
    /// Extract, then transform
    Run,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            PipelineConfig::from_toml_file(path)
        }
        None => PipelineConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = book_pipeline_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&config, &multi).await;
    };

    match command {
        Commands::Extract => stages::extract(&config, &multi).await?,
        Commands::Transform => stages::transform(&config, &multi).await?,
        Commands::Inspect { limit } => stages::inspect(&config, limit).await?,
        Commands::Run => stages::run_all(&config, &multi).await?,
    }

    Ok(())
}
