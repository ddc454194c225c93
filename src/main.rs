//! CLI entry point for fdroid-link.

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fdroid_link_core::config::{load_config_at, load_default_file_config};
use fdroid_link_core::render::{HtmlPresenter, JsonPresenter, TextPresenter};
use fdroid_link_core::{
    InputConvention, LinkOutcome, LinkPolicy, LoadedConfig, Presenter, RenderResult,
    parse_location, parse_reference,
};
use tracing::{debug, info};

mod cli;

use cli::{Cli, Command, ConfigAction, OutputFormat};

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    /// Every reference was usable (or there was nothing to check)
    Success,
    /// Operational failure: bad config, I/O
    Failure,
    /// At least one reference had fatal validation errors
    Rejected,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Rejected => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?cli, "CLI arguments parsed");

    match run(&cli) {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ProcessExit::Failure.into()
        }
    }
}

fn run(cli: &Cli) -> Result<ProcessExit> {
    let loaded = load_config(cli)?;
    let mut policy = loaded.policy();
    if cli.legacy_query {
        policy = policy.with_convention(InputConvention::LegacyQuery);
    }

    if let Some(Command::Config {
        action: ConfigAction::Show,
    }) = cli.command
    {
        print_config(&loaded, &policy)?;
        return Ok(ProcessExit::Success);
    }

    let stdout = io::stdout();
    let mut presenter = presenter_for(cli.format, stdout.lock());

    let mut processed = 0usize;
    let mut rejected = 0usize;
    let mut handle = |location: &str| -> Result<()> {
        let outcome = if cli.page_url {
            parse_location(location, &policy)
        } else {
            parse_reference(location, &policy)
        };
        processed += 1;
        if outcome.has_errors() {
            rejected += 1;
        }
        presenter.present(&RenderResult::from(&outcome))
    };

    if !cli.references.is_empty() {
        for reference in &cli.references {
            handle(reference)?;
        }
    } else if !io::stdin().is_terminal() {
        // Every line is a new location value; each one re-runs the full pipeline.
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read location from stdin")?;
            handle(&line)?;
        }
    }

    if processed == 0 {
        presenter.present(&RenderResult::from(&LinkOutcome::NoInput))?;
    }

    info!(processed, rejected, "Done");
    Ok(if rejected == 0 {
        ProcessExit::Success
    } else {
        ProcessExit::Rejected
    })
}

fn load_config(cli: &Cli) -> Result<LoadedConfig> {
    match &cli.config {
        Some(path) => load_config_at(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display())),
        None => load_default_file_config().context("Failed to load default config file"),
    }
}

fn presenter_for<'a, W: Write + 'a>(format: OutputFormat, out: W) -> Box<dyn Presenter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextPresenter::new(out)),
        OutputFormat::Json => Box::new(JsonPresenter::new(out)),
        OutputFormat::Html => Box::new(HtmlPresenter::new(out)),
    }
}

fn print_config(loaded: &LoadedConfig, policy: &LinkPolicy) -> Result<()> {
    let mut out = io::stdout().lock();
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    writeln!(out, "config_path = {resolved_path}")?;
    writeln!(
        out,
        "config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    )?;
    writeln!(out, "convention = {}", policy.convention)?;
    writeln!(out, "share_host = {}", policy.share_host)?;
    writeln!(out, "secure_scheme = {}", policy.secure_scheme)?;
    writeln!(out, "insecure_scheme = {}", policy.insecure_scheme)?;
    writeln!(out, "official_fingerprint = {}", policy.official_fingerprint)?;
    writeln!(
        out,
        "official_locations = {}",
        policy.official_locations.join(", ")
    )?;
    writeln!(
        out,
        "repo_path_suffixes = {}",
        policy.repo_path_suffixes.join(", ")
    )?;
    Ok(())
}
