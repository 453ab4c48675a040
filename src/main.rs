//! Binary entry point for backoffice-export.
//!
//! Command-line front end to the export engine: build report files, list
//! categories, seed a demo database and inspect configuration.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use backoffice_export::cli::{self, CategoriesOutputFormat, ExportArgs};
use backoffice_export::config::ExportConfig;
use backoffice_export::io::ExportService;
use backoffice_export::observability;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Multi-format report exports for the back-office bot.
#[derive(Parser)]
#[command(name = "backoffice-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "BACKOFFICE_EXPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build an export file.
    Export {
        /// Data category (inventory, issued_items, orders, statistics, users,
        /// feedback, workflow, calls).
        #[arg(long)]
        category: String,

        /// Output format: csv, xlsx, docx or pdf.
        #[arg(short, long)]
        format: String,

        /// Role of the requesting user.
        #[arg(short, long)]
        role: String,

        /// Directory to save the file in.
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// List the categories a role may export.
    Categories {
        /// Role of the requesting user.
        #[arg(short, long)]
        role: String,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Fill a SQLite database with the demo records.
    Seed {
        /// Database file to create or overwrite.
        #[arg(short, long)]
        database: PathBuf,
    },

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &ExportConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Export {
            category,
            format,
            role,
            out: out_dir,
        } => {
            let service = ExportService::from_config(config)?;
            let args = ExportArgs {
                category,
                format,
                role,
                out_dir,
            };
            cli::cmd_export(&mut out, &service, &args)?;
            Ok(())
        },

        Commands::Categories { role, format } => {
            let service = ExportService::from_config(config)?;
            let format = format.parse::<CategoriesOutputFormat>()?;
            cli::cmd_categories(&mut out, &service, &role, format, cli.verbose)
        },

        Commands::Seed { database } => {
            cli::cmd_seed(&mut out, &database)?;
            Ok(())
        },

        Commands::Config => cli::cmd_config(&mut out, config),
    }
}

/// Loads configuration from the given file or the default location, then
/// applies environment overrides.
fn load_config(path: Option<&Path>) -> backoffice_export::Result<ExportConfig> {
    let mut config = match path {
        Some(path) => ExportConfig::load_from_file(path)?,
        None => ExportConfig::load_default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}
