use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Practice-plan recurrence: normalize, encode, decode and preview rules
#[derive(Parser, Debug)]
#[command(name = "cadence", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to a configuration file (defaults to ./cadence.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Normalize a rule string or a JSON recurrence blob
    Normalize(NormalizeCommand),
    /// Build a rule string from human-friendly options
    Encode(EncodeCommand),
    /// Decode and describe a rule string
    Decode(DecodeCommand),
    /// List the occurrences a rule produces from a start date
    Preview(PreviewCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct NormalizeCommand {
    /// A rule string (FREQ=...) or a JSON document
    pub input: String,
    /// Print the canonical object form as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EncodeCommand {
    /// Human-friendly frequency
    #[arg(long, value_enum)]
    pub every: RecurrenceShortcut,
    /// Repeat every N periods
    #[arg(long, default_value_t = 1)]
    pub interval: u32,
    /// Days of week for weekly rules (mon,wed,fri | weekdays | weekends)
    #[arg(long)]
    pub on: Option<String>,
    /// Total number of occurrences
    #[arg(long, conflicts_with = "until")]
    pub count: Option<u32>,
    /// Last date an occurrence may fall on (e.g., '2025-12-31', 'next friday')
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DecodeCommand {
    /// The rule string to decode
    pub rule: String,
    /// Print the canonical object form as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    /// The rule string to expand
    pub rule: String,
    /// Anchor date or datetime (e.g., '2025-01-06', '2025-01-06T09:00', 'next monday 9am')
    #[arg(long)]
    pub start: String,
    /// Maximum number of occurrences (defaults to the configured value)
    #[arg(long)]
    pub max: Option<usize>,
    /// Days past the start to search (defaults to the configured value)
    #[arg(long)]
    pub horizon: Option<u32>,
    /// Print occurrences as JSON
    #[arg(long)]
    pub json: bool,
}

/// Human-friendly recurrence patterns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceShortcut {
    /// Every day
    Daily,
    /// Every week (start day unless --on is given)
    Weekly,
    /// Every month (same date)
    Monthly,
    /// Monday to Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
}

impl std::fmt::Display for RecurrenceShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceShortcut::Daily => write!(f, "daily"),
            RecurrenceShortcut::Weekly => write!(f, "weekly"),
            RecurrenceShortcut::Monthly => write!(f, "monthly"),
            RecurrenceShortcut::Weekdays => write!(f, "weekdays"),
            RecurrenceShortcut::Weekends => write!(f, "weekends"),
        }
    }
}

impl RecurrenceShortcut {
    /// The frequency spelling understood by the normalizer.
    pub fn frequency(&self) -> &'static str {
        match self {
            RecurrenceShortcut::Daily => "daily",
            RecurrenceShortcut::Monthly => "monthly",
            RecurrenceShortcut::Weekly
            | RecurrenceShortcut::Weekdays
            | RecurrenceShortcut::Weekends => "weekly",
        }
    }

    /// Weekdays implied by the shortcut itself.
    pub fn implied_days(&self) -> Option<&'static str> {
        match self {
            RecurrenceShortcut::Weekdays => Some("weekdays"),
            RecurrenceShortcut::Weekends => Some("weekends"),
            _ => None,
        }
    }
}
