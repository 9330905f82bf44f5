//! CLI argument definitions for the ODS organisation finder.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ods-finder",
    version,
    about = "Export active NHS organisations near Brighton by postcode and role",
    long_about = "Search the NHS ODS organisation directory one postcode prefix at a time,\n\
                  keep active organisations matching a role, and export them to CSV.\n\n\
                  Without --role, --all or --legacy the role filter is asked for interactively."
)]
pub struct Cli {
    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// CSV file to write (replaced if it exists).
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "brighton_sub_icb_orgs.csv"
    )]
    pub output: PathBuf,

    /// Keep only organisations with a role containing this text.
    ///
    /// "SUB ICB LOCATION" also matches organisations whose role is exactly "ICB".
    #[arg(long = "role", value_name = "ROLE", conflicts_with_all = ["all", "legacy"])]
    pub role: Option<String>,

    /// Keep every active organisation without asking for a role.
    #[arg(long = "all", conflicts_with = "legacy")]
    pub all: bool,

    /// Original report: SUB ICB LOCATION and ICB organisations, four columns.
    #[arg(long = "legacy")]
    pub legacy: bool,

    /// Postcode prefix to search (repeatable, replaces the built-in list).
    #[arg(long = "postcode", value_name = "PREFIX")]
    pub postcodes: Vec<String>,

    /// Search endpoint URL.
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Pause after each request, in milliseconds.
    #[arg(long = "delay-ms", value_name = "MS", default_value_t = 200)]
    pub delay_ms: u64,

    /// Print the postcode prefixes that would be searched and exit.
    #[arg(long = "list-postcodes")]
    pub list_postcodes: bool,
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
