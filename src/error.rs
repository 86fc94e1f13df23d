//! Exit codes and their mapping from application errors.

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::output::JsonOutputError;

/// Process exit codes.
///
/// - 0: Scan completed and the report was printed (duplicates or not)
/// - 1: Invalid command line or other unclassified failure
/// - 3: The root directory could not be traversed
/// - 4: The report could not be written
/// - 130: Interrupted by Ctrl+C (partial report printed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and the report was printed.
    Success = 0,
    /// Invalid arguments or unclassified failure.
    UsageError = 1,
    /// The root directory is missing, not a directory, or unreadable.
    TraversalError = 3,
    /// Writing the JSON report failed.
    OutputError = 4,
    /// Interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DP000",
            Self::UsageError => "DP001",
            Self::TraversalError => "DP003",
            Self::OutputError => "DP004",
            Self::Interrupted => "DP130",
        }
    }

    /// Classify an error returned from [`crate::run_app`].
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<FinderError>().is_some() {
            Self::TraversalError
        } else if err.downcast_ref::<JsonOutputError>().is_some()
            || err.downcast_ref::<std::io::Error>().is_some()
        {
            Self::OutputError
        } else {
            Self::UsageError
        }
    }
}
