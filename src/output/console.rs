//! Human-readable console report.
//!
//! ```text
//! 3 Files with duplicates found:
//! Hash: 1f0c...e2
//!     1 photos/a.jpg
//!     2 backup/a.jpg
//!
//! Hash: 77ab...09
//!     1 notes.txt
//!     2 old/notes.txt
//!     3 old/notes (copy).txt
//!
//! ```
//!
//! The count in the header is the number of files beyond the first in each
//! group. Paths are indented with a tab and numbered from 1.

use std::io::{self, Write};

use yansi::{Condition, Paint};

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Line printed when a scan finds nothing.
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicate files exist in the specified directory.";

/// Console renderer for duplicate groups.
#[derive(Debug, Clone)]
pub struct ConsoleReport<'a> {
    groups: Vec<&'a DuplicateGroup>,
    color: bool,
}

impl<'a> ConsoleReport<'a> {
    /// Build a report over the reportable groups in `groups`.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self {
            groups: groups.iter().filter(|g| g.is_duplicate()).collect(),
            color: false,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Files beyond the first in every group.
    #[must_use]
    pub fn duplicate_file_count(&self) -> usize {
        self.groups.iter().map(|g| g.duplicate_count()).sum()
    }

    fn condition(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let when = self.condition();

        if self.groups.is_empty() {
            writeln!(writer, "{}", NO_DUPLICATES_MESSAGE.green().whenever(when))?;
            return writer.flush();
        }

        let header = format!(
            "{} Files with duplicates found:",
            self.duplicate_file_count()
        );
        writeln!(writer, "{}", header.red().whenever(when))?;

        for group in &self.groups {
            let hash = format!("Hash: {}", group.hash_hex());
            writeln!(writer, "{}", hash.blue().whenever(when))?;
            for (i, path) in group.paths.iter().enumerate() {
                writeln!(
                    writer,
                    "\t{} {}",
                    (i + 1).red().whenever(when),
                    path.display().yellow().whenever(when)
                )?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Write notes about skipped entries and interruption.
///
/// Writes nothing for a clean, complete scan.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_scan_notes<W: Write>(
    writer: &mut W,
    summary: &ScanSummary,
    color: bool,
) -> io::Result<()> {
    let when = if color {
        Condition::ALWAYS
    } else {
        Condition::NEVER
    };

    if !summary.errors.is_empty() {
        let line = format!(
            "Skipped {} entries that could not be read:",
            summary.errors.len()
        );
        writeln!(writer, "{}", line.yellow().whenever(when))?;
        for error in &summary.errors {
            writeln!(writer, "\t{}", error)?;
        }
    }

    if summary.interrupted {
        writeln!(
            writer,
            "{}",
            "Scan interrupted; results above are partial."
                .red()
                .whenever(when)
        )?;
    }
    writer.flush()
}
