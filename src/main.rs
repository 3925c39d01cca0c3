//! Binary entry point for ephemeral.
//!
//! This binary runs one retention sweep per invocation and is meant to be
//! triggered by an external scheduler.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use ephemeral::EphemeralConfig;
use ephemeral::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for configuration errors, distinct from a sweep that had failures.
const EXIT_CONFIG_ERROR: u8 = 2;

/// Ephemeral - deletes tweets older than a configured age.
#[derive(Parser)]
#[command(name = "ephemeral")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "EPHEMERAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Delete old tweets from the timeline.
    Run {
        /// Show what would be deleted without deleting anything.
        #[arg(long)]
        dry_run: bool,

        /// Print the invocation response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration (credentials redacted).
    Config,
}

fn main() -> ExitCode {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match EphemeralConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Run { dry_run, json } => commands::cmd_run(&config, dry_run, json),
        Commands::Config => commands::cmd_config(&config),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
