//! dupes - duplicate file finder
//!
//! Finds files with identical content under a directory. Every file is
//! fingerprinted with a fast 64-bit hash; only files whose fast hash collides
//! with an earlier file are re-read and confirmed with a keyed 256-bit hash,
//! so duplicates are never reported on the strength of a single
//! non-cryptographic digest.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{write_scan_notes, ConsoleReport, JsonOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;
use crate::signal::ShutdownHandler;

/// Run a scan for the parsed command line and print the report.
///
/// The console report goes to stdout; progress, skipped-entry notes and
/// logs go to stderr.
///
/// # Errors
///
/// Returns an error wrapping [`duplicates::FinderError`] if the root cannot
/// be traversed, or [`output::JsonOutputError`] / [`std::io::Error`] if the
/// report cannot be written. [`ExitCode::from_error`] maps them to exit
/// codes.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let shutdown = signal::install_handler().unwrap_or_else(|e| {
        log::warn!("{}; Ctrl+C will terminate without a report", e);
        ShutdownHandler::new()
    });

    run_app_with_shutdown(cli, &shutdown)
}

/// Like [`run_app`], with the caller supplying the shutdown handler.
///
/// Logging is not initialized here. A scan stopped through `shutdown`
/// still prints its partial report and returns [`ExitCode::Interrupted`].
///
/// # Errors
///
/// Same as [`run_app`].
pub fn run_app_with_shutdown(cli: Cli, shutdown: &ShutdownHandler) -> Result<ExitCode> {
    let config = Config::load();
    let stdout_color = !cli.no_color && io::stdout().is_terminal();
    let stderr_color = !cli.no_color && io::stderr().is_terminal();

    let mut ignore_patterns = config.ignore_patterns.clone();
    ignore_patterns.extend(cli.ignore_patterns.iter().cloned());
    let walker_config = WalkerConfig::new(
        cli.follow_symlinks || config.follow_symlinks,
        cli.skip_hidden || config.skip_hidden,
        ignore_patterns,
    );

    let mut finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_shutdown_flag(shutdown.get_flag());

    if !cli.quiet && !cli.no_progress {
        let interval = cli
            .progress_interval
            .map_or_else(|| config.progress_interval(), Duration::from_secs);
        let progress = Progress::new(interval, false).with_bar(io::stderr().is_terminal());
        finder_config = finder_config.with_progress_callback(Arc::new(progress));
    }

    let (groups, summary) = DuplicateFinder::new(finder_config)
        .find_duplicates(&cli.directory)
        .with_context(|| format!("Failed to scan {}", cli.directory.display()))?;

    let mut stdout = io::stdout().lock();
    ConsoleReport::new(&groups)
        .with_color(stdout_color)
        .write_to(&mut stdout)
        .context("Failed to write report")?;

    write_scan_notes(&mut io::stderr().lock(), &summary, stderr_color)
        .context("Failed to write scan notes")?;

    if let Some(ref path) = cli.json {
        JsonOutput::new(&groups)
            .write_to_file(path)
            .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
        log::info!("JSON report written to {}", path.display());
    }

    if summary.interrupted {
        return Ok(ExitCode::Interrupted);
    }
    Ok(ExitCode::Success)
}
