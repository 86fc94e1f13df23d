//! Scan orchestration: walk a directory tree and feed every file to the index.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs a single pass over the tree. Each regular file is
//! handed to a [`DuplicateIndex`] as soon as the walker yields it, so primary
//! digests are computed in traversal order and secondary digests only where
//! collisions appear. Per-file failures are collected in the
//! [`ScanSummary`]; only problems with the root itself abort the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupes::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("{} groups, {} duplicate files", groups.len(), summary.duplicate_files);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::DuplicateGroup;
use super::index::{Classification, DuplicateIndex};
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, Fingerprint, Hasher, ScanError, Walker, WalkerConfig};

/// Name of the single scan phase reported to progress callbacks.
pub const SCAN_PHASE: &str = "scan";

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Regular files discovered by the walker
    pub total_files: usize,
    /// Combined size of discovered files in bytes
    pub total_size: u64,
    /// Files successfully fingerprinted and indexed
    pub hashed_files: usize,
    /// Files left out because they could not be read
    pub skipped_files: usize,
    /// Reportable duplicate groups
    pub duplicate_groups: usize,
    /// Files beyond the first in each group
    pub duplicate_files: usize,
    /// Primary digest computations
    pub primary_hashes: usize,
    /// Secondary digest computations
    pub secondary_hashes: usize,
    /// Primary collisions that turned out to differ in content
    pub false_positives: usize,
    /// Primary collisions whose earlier file could not be re-read
    pub unverified_candidates: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was stopped by a shutdown request
    pub interrupted: bool,
    /// Recoverable errors encountered during the scan, in order
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Human-readable total size.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize(self.total_size).to_string()
    }

    /// Paths of entries that produced an error, in the order they occurred.
    pub fn skipped_paths(&self) -> impl Iterator<Item = &Path> {
        self.errors.iter().map(ScanError::path)
    }
}

/// Errors that abort a scan before any file is examined.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root directory exists but cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    RootUnreadable {
        /// The root directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FinderError {
    /// The root path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(path) | Self::NotADirectory(path) => path,
            Self::RootUnreadable { path, .. } => path,
        }
    }
}

/// Walks a directory tree and groups files by confirmed identical content.
///
/// # Example
///
/// ```no_run
/// use dupes::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((groups, summary)) => {
///         println!("Found {} duplicate groups", groups.len());
///         println!("Skipped {} files", summary.skipped_files);
///     }
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `path`.
    ///
    /// Groups are returned in the order they were first confirmed, and
    /// paths within a group in discovery order. If a shutdown is requested
    /// mid-scan, the groups confirmed so far are returned and
    /// [`ScanSummary::interrupted`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root does not exist, is not a
    /// directory, or cannot be listed. Failures on individual entries below
    /// the root never abort the scan; they are collected in
    /// [`ScanSummary::errors`].
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        validate_root(path)?;
        log::info!("Starting duplicate scan of {}", path.display());

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        Ok(self.run(walker.walk(), Hasher::new()))
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Files are observed in the given order.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        self.run(files.into_iter().map(Ok), Hasher::new())
    }

    /// Like [`Self::find_duplicates_from_files`] with a custom fingerprinter.
    #[must_use]
    pub fn find_duplicates_with<F: Fingerprint>(
        &self,
        files: Vec<FileEntry>,
        fingerprinter: F,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        self.run(files.into_iter().map(Ok), fingerprinter)
    }

    fn run<F, I>(&self, entries: I, fingerprinter: F) -> (Vec<DuplicateGroup>, ScanSummary)
    where
        F: Fingerprint,
        I: IntoIterator<Item = Result<FileEntry, ScanError>>,
    {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let mut index = DuplicateIndex::with_fingerprinter(fingerprinter);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(SCAN_PHASE, 0);
        }

        for entry in entries {
            if self.config.is_shutdown_requested() {
                summary.interrupted = true;
                break;
            }

            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    summary.errors.push(e);
                    continue;
                }
            };

            summary.total_files += 1;
            summary.total_size += file.size;

            match index.observe(&file.path) {
                Ok(Classification::AlreadyObserved) => {
                    log::debug!("Already indexed: {}", file.path.display());
                }
                Ok(_) => summary.hashed_files += 1,
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    summary.skipped_files += 1;
                    summary.errors.push(ScanError::from(e));
                }
            }

            for failure in index.take_partner_failures() {
                summary.errors.push(ScanError::from(failure));
            }

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(summary.total_files, &file.path.to_string_lossy());
                callback.on_item_completed(file.size);
            }
        }

        // The walker stops silently on shutdown, so check once more
        if self.config.is_shutdown_requested() {
            summary.interrupted = true;
        }
        if summary.interrupted {
            log::info!("Scan interrupted, reporting partial results");
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(SCAN_PHASE);
        }

        let stats = index.stats();
        summary.primary_hashes = stats.primary_hashes;
        summary.secondary_hashes = stats.secondary_hashes;
        summary.false_positives = stats.false_positives;
        summary.unverified_candidates = stats.unverified_candidates;

        let groups = index.into_groups();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files ({}), {} duplicate groups, {} duplicate files, {} skipped",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.errors.len()
        );
        log::debug!(
            "Digests: {} primary, {} secondary, {} false positives, took {:?}",
            summary.primary_hashes,
            summary.secondary_hashes,
            summary.false_positives,
            summary.scan_duration
        );

        (groups, summary)
    }
}

/// Check that `path` is an existing, listable directory.
fn validate_root(path: &Path) -> Result<(), FinderError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FinderError::PathNotFound(path.to_path_buf()),
        _ => FinderError::RootUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    fs::read_dir(path).map_err(|e| FinderError::RootUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
