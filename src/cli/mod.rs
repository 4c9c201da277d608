//! CLI module for versionguard
//!
//! Provides command-line access to:
//! - keygen: Generate a signing secret
//! - render: Produce a version token for a marker
//! - verify: Check a submitted token

mod args;
mod commands;
mod errors;
mod io;

use std::io::stdout;

pub use args::{Cli, Command};
pub use commands::{keygen, render, run_command, verify};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command, &mut stdout().lock())
}
