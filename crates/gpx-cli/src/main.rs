//! GPX reader CLI.

use clap::{ColorChoice, Parser};
use gpx_cli::commands::{run_dump, run_summary};
use gpx_cli::logging::{LogConfig, LogFormat, init_logging};
use gpx_cli::summary::print_summary;
use gpx_reader::{Collection, InvalidItemPolicy, ReaderOptions};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, CollectionArg, Command, LogFormatArg, LogLevelArg, ReaderArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let options = reader_options(&cli.reader);
    let exit_code = match cli.command {
        Command::Summary(args) => match run_summary(&args.file, options) {
            Ok(summary) => {
                print_summary(&args.file, &summary);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Dump(args) => {
            let collection = collection_from_arg(args.collection);
            match run_dump(&args.file, options, collection, args.compact) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
}

fn reader_options(args: &ReaderArgs) -> ReaderOptions {
    let policy = if args.skip_invalid {
        InvalidItemPolicy::Skip
    } else {
        InvalidItemPolicy::Fail
    };
    ReaderOptions::default()
        .with_cache(!args.no_cache)
        .with_invalid_policy(policy)
}

fn collection_from_arg(arg: CollectionArg) -> Option<Collection> {
    match arg {
        CollectionArg::All => None,
        CollectionArg::Waypoints => Some(Collection::Waypoints),
        CollectionArg::Routes => Some(Collection::Routes),
        CollectionArg::Tracks => Some(Collection::Tracks),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
