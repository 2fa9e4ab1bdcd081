//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use hearthcal_core::{CalendarView, TracingConfig, TracingOutputFormat};

/// hearthcal - expand household calendar events into occurrences
#[derive(Debug, Parser)]
#[command(name = "hearthcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "HEARTHCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Prefix log lines with a timestamp
    #[arg(long)]
    pub log_timestamps: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns the tracing setup requested by the logging flags.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::cli()
        };
        config
            .with_format(self.log_format.into())
            .with_timestamp(self.log_timestamps)
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => TracingOutputFormat::Pretty,
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand events into occurrences within a date range
    Expand {
        /// JSON array of stored events, or `-` for stdin
        file: PathBuf,

        /// Range start (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        from: String,

        /// Range end (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        to: String,

        /// Only show occurrences in this category
        #[arg(long)]
        category: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Per-event cap on walked instances (overrides config)
        #[arg(long)]
        max_occurrences: Option<usize>,
    },

    /// Show the occurrences a calendar page would fetch, grouped by day
    View {
        /// JSON array of stored events, or `-` for stdin
        file: PathBuf,

        /// Calendar view
        #[arg(long, value_enum, default_value_t = ViewKind::Month)]
        view: ViewKind,

        /// Selected date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Only show occurrences in this category
        #[arg(long)]
        category: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Recurrence rule commands
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Calendar page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    Month,
    Week,
    Day,
}

impl From<ViewKind> for CalendarView {
    fn from(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Month => CalendarView::Month,
            ViewKind::Week => CalendarView::Week,
            ViewKind::Day => CalendarView::Day,
        }
    }
}

/// Rule actions.
#[derive(Debug, Subcommand)]
pub enum RuleAction {
    /// Print a human-readable summary of a rule
    Describe {
        /// Rule text, e.g. "FREQ=WEEKLY;INTERVAL=2"
        rule: String,
    },

    /// Validate a rule strictly and print its canonical form
    Check {
        /// Rule text, e.g. "FREQ=WEEKLY;INTERVAL=2"
        rule: String,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
