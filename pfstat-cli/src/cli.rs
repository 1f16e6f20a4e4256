//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// pfstat -- packet filter status decoder.
///
/// Use `pfstat <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "pfstat", version, about, long_about = None)]
pub struct Cli {
    /// Path to the pfstat.toml configuration file.
    #[arg(short, long, default_value = "pfstat.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a status dump and print the report.
    Status(StatusArgs),

    /// Show counter growth between two dumps.
    Diff(DiffArgs),

    /// Print the field table of a record layout.
    Layout(LayoutArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- status ----

/// Decode a status dump and print the report.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Status dump to decode (default: `status.input` from the config).
    pub path: Option<PathBuf>,

    /// Record layout name (default: `status.layout` from the config).
    #[arg(long)]
    pub layout: Option<String>,
}

// ---- diff ----

/// Show counter growth between two dumps of the same enable period.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Earlier status dump.
    pub earlier: PathBuf,

    /// Later status dump.
    pub later: PathBuf,

    /// Seconds between the two dumps; enables per-second rates.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Record layout name (default: `status.layout` from the config).
    #[arg(long)]
    pub layout: Option<String>,
}

// ---- layout ----

/// Print the field table of a record layout.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Layout name (default: `status.layout` from the config).
    #[arg(long)]
    pub layout: Option<String>,
}

// ---- config ----

/// Manage pfstat configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, status).
        #[arg(long)]
        section: Option<String>,
    },
}
