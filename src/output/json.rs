//! JSON export of duplicate groups.
//!
//! # Output Schema
//!
//! ```json
//! [
//!   {
//!     "hash": "<80 hex characters>",
//!     "files": ["dir/a.txt", "dir/sub/b.txt"]
//!   }
//! ]
//! ```
//!
//! Only groups with two or more files are written, in the same order and
//! with the same path strings as the console report. An empty result is
//! written as `[]`.
//!
//! # Example
//!
//! ```no_run
//! use dupes::duplicates::DuplicateFinder;
//! use dupes::output::JsonOutput;
//! use std::path::Path;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! JsonOutput::new(&groups).write_to_file(Path::new("dupes.json")).unwrap();
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::duplicates::{CompositeKey, DuplicateGroup, ParseKeyError};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDuplicateGroup {
    /// Composite key as lowercase hex (80 characters)
    pub hash: String,
    /// Member paths in discovery order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Convert a duplicate group, keeping paths exactly as discovered.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// Decode the `hash` field back into a composite key.
    ///
    /// # Errors
    ///
    /// Returns [`ParseKeyError`] if the field is not 80 hex characters.
    pub fn key(&self) -> Result<CompositeKey, ParseKeyError> {
        self.hash.parse()
    }
}

/// Complete JSON report: a bare array of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonOutput {
    /// Reportable duplicate groups
    pub groups: Vec<JsonDuplicateGroup>,
}

impl JsonOutput {
    /// Build the report from duplicate groups. Groups with fewer than two
    /// members are left out.
    ///
    /// # Example
    ///
    /// ```
    /// use dupes::duplicates::{CompositeKey, DuplicateGroup};
    /// use dupes::output::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let mut group = DuplicateGroup::new(CompositeKey::new([0; 8], [0; 32]), PathBuf::from("a"));
    /// group.push(PathBuf::from("b"));
    ///
    /// let output = JsonOutput::new(&[group]);
    /// assert_eq!(output.groups[0].files, vec!["a", "b"]);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup]) -> Self {
        Self {
            groups: groups
                .iter()
                .filter(|g| g.is_duplicate())
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a previously written report.
    ///
    /// # Errors
    ///
    /// Returns [`JsonOutputError::Serialization`] if `json` is not a valid
    /// report, or [`JsonOutputError::InvalidKey`] if a group's hash is not a
    /// composite key.
    pub fn parse(json: &str) -> Result<Self, JsonOutputError> {
        let output: Self = serde_json::from_str(json)?;
        for group in &output.groups {
            group.key()?;
        }
        Ok(output)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the report to it.
    ///
    /// # Errors
    ///
    /// Returns [`JsonOutputError::Io`] if the file cannot be created or
    /// written.
    pub fn write_to_file(&self, path: &Path) -> Result<(), JsonOutputError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        log::debug!(
            "Wrote {} duplicate groups to {}",
            self.groups.len(),
            path.display()
        );
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("Error writing JSON file, please check permissions and that the directory exists: {0}")]
    Io(#[from] std::io::Error),

    /// A group's hash could not be decoded
    #[error(transparent)]
    InvalidKey(#[from] ParseKeyError),
}
