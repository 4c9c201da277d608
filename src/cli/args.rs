//! CLI argument definitions using clap
//!
//! Commands:
//! - versionguard keygen
//! - versionguard render --config <path> [--marker <value>]
//! - versionguard verify --config <path> --token <token>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// versionguard - signed version tokens for optimistic concurrency control
#[derive(Parser, Debug)]
#[command(name = "versionguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a random signing secret
    Keygen,

    /// Render the hidden and display values for a marker
    Render {
        /// Path to configuration file
        #[arg(long, default_value = "./versionguard.json")]
        config: PathBuf,

        /// Current marker (counter or RFC 3339 time); omit for a new record
        #[arg(long)]
        marker: Option<String>,
    },

    /// Verify a submitted token and print the marker it carries
    Verify {
        /// Path to configuration file
        #[arg(long, default_value = "./versionguard.json")]
        config: PathBuf,

        /// Hidden field value as submitted
        #[arg(long)]
        token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
