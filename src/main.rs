//! # Release Simulator CLI
//!
//! This is the binary entry point for the `release-sim` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing the few command-line options using `clap`.
//! - Setting up logging.
//! - Running the release loop and turning any error into a non-zero exit.
//!
//! The release logic lives in the `lib.rs` library crate; the binary is a
//! thin wrapper around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
