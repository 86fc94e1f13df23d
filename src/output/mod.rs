//! Output formatters for duplicate scan results.
//!
//! - [`console`]: colored, human-readable report
//! - [`json`]: machine-readable export
//!
//! # Example
//!
//! ```no_run
//! use dupes::duplicates::DuplicateFinder;
//! use dupes::output::{ConsoleReport, JsonOutput};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! print!("{}", ConsoleReport::new(&groups).render());
//! println!("{}", JsonOutput::new(&groups).to_json_pretty().unwrap());
//! ```

pub mod console;
pub mod json;

// Re-export main types
pub use console::{write_scan_notes, ConsoleReport, NO_DUPLICATES_MESSAGE};
pub use json::{JsonDuplicateGroup, JsonOutput, JsonOutputError};
