//! Plantwatch CLI - check plant photos against the report pipeline stages.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use commands::Output;
use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (invalid argument value)
  65  Data error (not an image, not a plant, unreadable verdict)
  66  Input file cannot be read
  69  Remote service unavailable
  74  Output file cannot be written
  78  Configuration error (missing API key)";

#[derive(Parser)]
#[command(name = "plantwatch")]
#[command(author, version, about = "Invasive plant photo tools", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print the bare result
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an image and convert it to an accepted upload encoding
    Normalize {
        /// Path to the image
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (defaults to <STEM>.normalized.<EXT>)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Identify the species in a photo via Pl@ntNet (needs PLANTNET_API_KEY)
    Identify {
        /// Path to the photo
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Ask whether a species is invasive at a location (needs OPENAI_API_KEY)
    Classify {
        /// Species name, e.g. "Pueraria montana"
        #[arg(value_name = "SPECIES")]
        species: String,

        /// Latitude as sent to the model
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude as sent to the model
        #[arg(long, allow_hyphen_values = true)]
        lng: String,

        /// Print the unparsed model reply
        #[arg(long)]
        raw: bool,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "plantwatch_core={default_level},plantwatch={default_level}"
            ))
        }))
        .with_writer(std::io::stderr)
        .init();

    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    let exit = match run(cli.command, out).await {
        Ok(()) => ExitCode::success(),
        Err(err) => ExitCode::from_anyhow(&err),
    };

    if let Some(message) = &exit.message {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
    std::process::exit(exit.code);
}

async fn run(command: Commands, out: Output) -> Result<()> {
    match command {
        Commands::Normalize { file, output } => commands::normalize::execute(file, output, out),
        Commands::Identify { file, timeout } => {
            let timeout = utils::timeout_from_secs(timeout)?;
            commands::identify::execute(file, timeout, out).await
        }
        Commands::Classify {
            species,
            lat,
            lng,
            raw,
            timeout,
        } => {
            let timeout = utils::timeout_from_secs(timeout)?;
            commands::classify::execute(species, lat, lng, timeout, raw, out).await
        }
    }
}
