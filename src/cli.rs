//! Command-line interface definitions for dupes.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under ~/Pictures
//! dupes ~/Pictures
//!
//! # Also write the groups to a JSON file
//! dupes --json dupes.json ~/Pictures
//!
//! # Skip build output and hidden files
//! dupes -i target/ -i '*.o' --skip-hidden ~/src
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find duplicate files by content.
///
/// Every file under DIRECTORY is fingerprinted with a fast hash; files whose
/// fast hash collides are confirmed with a keyed cryptographic hash before
/// they are reported as duplicates.
#[derive(Debug, Parser)]
#[command(name = "dupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory that will be recursively searched for duplicate files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Also write the results as JSON to this file
    #[arg(short, long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Ignore files matching a gitignore-style pattern (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during traversal
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Seconds between "Files processed" progress lines
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_interval: Option<u64>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and informational logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Disable the progress spinner and "Files processed" lines
    #[arg(long)]
    pub no_progress: bool,
}
