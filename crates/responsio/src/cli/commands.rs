//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Story-driven dialogue engine.
#[derive(Debug, Parser)]
#[command(name = "responsio", version, about)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chat with an assistant on stdin, one `intent key=value ...` per line
    Chat {
        /// Assistant TOML file
        file: PathBuf,

        /// User identifier for the session
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Session file to resume from and save to
        #[arg(short, long)]
        session: Option<PathBuf>,
    },

    /// Validate an assistant file or a directory of them
    Validate {
        /// Assistant TOML file or directory
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ValidationOutputFormat::Human)]
        format: ValidationOutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors, not warnings
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationOutputFormat {
    /// Human-readable text
    Human,
    /// JSON document per file
    Json,
}
