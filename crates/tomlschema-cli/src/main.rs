//! tomlschema CLI
//!
//! Checks TOML files for syntax and validates them against declarative or
//! built-in schemas.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod manifest_schema;
mod report;

use report::OutputFormat;

/// tomlschema - schema validation for TOML configuration files
#[derive(Parser)]
#[command(name = "tomlschema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file is well-formed TOML
    Check {
        /// TOML file to parse
        file: PathBuf,
    },

    /// Validate a TOML file against a declarative schema
    Validate {
        /// TOML file to validate
        file: PathBuf,

        /// Schema file written in the `$`-prefixed meta-schema format
        #[arg(short, long, env = "TOMLSCHEMA_SCHEMA")]
        schema: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a package manifest against the built-in manifest schema
    Manifest {
        /// Manifest file to validate
        file: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check { file } => {
            commands::check::run(&file)?;
        }
        Commands::Validate {
            file,
            schema,
            format,
        } => {
            commands::validate::run(&file, &schema, format)?;
        }
        Commands::Manifest { file, format } => {
            commands::manifest::run(&file, format)?;
        }
    }

    Ok(())
}
