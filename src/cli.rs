//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Validate F-Droid repository references and render shareable links.
///
/// Each reference is normalized, checked and classified as official,
/// verified mirror or third party, then shown as a repository deep link,
/// a web address and a universal share link.
#[derive(Parser, Debug)]
#[command(name = "fdroid-link")]
#[command(author, version, about)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Repository references (e.g. https://f-droid.org/repo?fingerprint=...); reads stdin lines when omitted
    pub references: Vec<String>,

    /// Treat inputs as full page locations and use the text after '#'
    #[arg(long)]
    pub page_url: bool,

    /// Read the deprecated '#repo=<url>&fingerprint=...' fragment layout
    #[arg(long, global = true)]
    pub legacy_query: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective link policy and where it came from
    Show,
}

/// Presenter selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl Cli {
    /// Default log filter from verbosity flags; `RUST_LOG` takes priority.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
