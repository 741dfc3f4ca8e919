//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Calendar time grid layout.
///
/// Lays out timed events on day columns, stacking overlaps and splitting
/// events that cross midnight.
#[derive(Debug, Parser)]
#[command(name = "tg", version, about, long_about = None)]
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
    /// Lay out events over a range of dates.
    Layout {
        /// JSON file holding an array of events, or `-` for stdin.
        #[arg(long)]
        events: PathBuf,

        /// First date shown (defaults to today).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Number of date columns.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Bucket events by date once instead of scanning per column.
        #[arg(long)]
        by_date: bool,

        /// Events are already sorted by start.
        #[arg(long)]
        sorted: bool,

        /// Instant for the now indicator (defaults to the system clock).
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the hour gutter labels.
    Slots {
        /// Minutes per row (defaults to the configured step).
        #[arg(long)]
        step: Option<u32>,

        /// Use 12-hour labels.
        #[arg(long)]
        ampm: bool,
    },

    /// Print the now indicator position.
    Now {
        /// Instant to report instead of the system clock.
        #[arg(long)]
        at: Option<String>,

        /// Keep printing for this many refreshes.
        #[arg(long, default_value_t = 0)]
        ticks: u32,

        /// Milliseconds between refreshes.
        #[arg(long, default_value_t = 60_000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },
}
