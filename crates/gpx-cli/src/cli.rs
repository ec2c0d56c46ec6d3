//! CLI argument definitions for the GPX reader.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gpx-reader",
    version,
    about = "Inspect GPX 1.1 track logs",
    long_about = "Read GPX 1.1 documents, validate every value that is read, \
                  and print a summary or a JSON dump of waypoints, routes and tracks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q to silence).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print version, metadata and collection counts.
    Summary(SummaryArgs),

    /// Print the typed records as JSON.
    Dump(DumpArgs),
}

/// Options forwarded to the reader.
#[derive(Args)]
pub struct ReaderArgs {
    /// Reparse on every traversal instead of memoizing parsed items.
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    /// Log and skip top-level items that fail validation instead of aborting.
    #[arg(long = "skip-invalid", global = true)]
    pub skip_invalid: bool,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// GPX file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct DumpArgs {
    /// GPX file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Which part of the document to dump.
    #[arg(long = "collection", value_enum, default_value = "all")]
    pub collection: CollectionArg,

    /// Single-line JSON instead of pretty-printed.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CollectionArg {
    All,
    Waypoints,
    Routes,
    Tracks,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
