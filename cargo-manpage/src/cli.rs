//! Command-line interface definitions for `cargo-manpage`.

use clap::{ArgAction, Parser, Subcommand};

/// Parsed CLI arguments for `cargo-manpage`.
#[derive(Debug, Parser)]
#[command(name = "cargo-manpage")]
#[command(about = "Generate manual pages from command-line parser definitions")]
#[command(version)]
pub struct Args {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Operation,
    /// Cargo package whose manual pages are processed.
    #[arg(long, global = true)]
    pub package: Option<String>,
    /// Increase output detail (repeat for more).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// The two lifecycle operations.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Operation {
    /// Generate the configured manual pages.
    Build,
    /// Remove generated manual pages and now-empty directories.
    Clean,
}
