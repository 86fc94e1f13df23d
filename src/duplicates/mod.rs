//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Composite keys and duplicate groups ([`groups`])
//! - The two-stage duplicate index ([`index`])
//! - Scan orchestration over a directory tree ([`finder`])

pub mod finder;
pub mod groups;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{CompositeKey, DuplicateGroup, ParseKeyError, COMPOSITE_KEY_LEN};
pub use index::{Classification, DuplicateIndex, IndexStats};
