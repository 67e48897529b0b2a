// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `qdexport`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "qdexport",
    version,
    about = "Export Quarkdown documents to PDF via the external compiler.",
    long_about = None
)]
pub struct CliArgs {
    /// Source document to export.
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Output directory for the produced PDF.
    ///
    /// Overrides `[export].output_dir` from the config file.
    #[arg(long, value_name = "DIR")]
    pub out: Option<String>,

    /// Path or name of the Quarkdown executable.
    ///
    /// Overrides `[compiler].path` from the config file.
    #[arg(long, value_name = "PATH")]
    pub compiler: Option<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Qdexport.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Print the composed command line without executing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `QDEXPORT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
