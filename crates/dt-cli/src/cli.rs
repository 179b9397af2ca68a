//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::check::CheckArgs;
use crate::commands::layout::LayoutArgs;

/// Day timeline layout.
///
/// Reads sleep, activity, appointment and point records as JSON lines and
/// places them on a 24-hour track, side by side where they overlap.
#[derive(Debug, Parser)]
#[command(name = "dt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lay out one or more days and print the positioned entries.
    Layout(LayoutArgs),

    /// Show how each record lands on a day, and why some are skipped.
    Check(CheckArgs),
}
