//! Composite keys and confirmed duplicate groups.
//!
//! # Overview
//!
//! A [`CompositeKey`] is the primary digest followed by the secondary
//! digest. Two files are considered to share content only when both digests
//! agree, so the composite key is the identity of a [`DuplicateGroup`].
//!
//! # Example
//!
//! ```
//! use dupes::duplicates::{CompositeKey, DuplicateGroup};
//! use std::path::PathBuf;
//!
//! let key = CompositeKey::new([1u8; 8], [2u8; 32]);
//! let mut group = DuplicateGroup::new(key, PathBuf::from("/a.txt"));
//! assert!(!group.is_duplicate());
//!
//! group.push(PathBuf::from("/b.txt"));
//! assert!(group.is_duplicate());
//! assert_eq!(group.duplicate_count(), 1);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::scanner::hasher::hex_to_bytes;
use crate::scanner::{
    hash_to_hex, PrimaryDigest, SecondaryDigest, PRIMARY_DIGEST_LEN, SECONDARY_DIGEST_LEN,
};

/// Length of a composite key in bytes.
pub const COMPOSITE_KEY_LEN: usize = PRIMARY_DIGEST_LEN + SECONDARY_DIGEST_LEN;

/// Primary digest concatenated with secondary digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    primary: PrimaryDigest,
    secondary: SecondaryDigest,
}

impl CompositeKey {
    /// Combine the two digests of one file.
    #[must_use]
    pub fn new(primary: PrimaryDigest, secondary: SecondaryDigest) -> Self {
        Self { primary, secondary }
    }

    /// The primary digest half.
    #[must_use]
    pub fn primary(&self) -> &PrimaryDigest {
        &self.primary
    }

    /// The secondary digest half.
    #[must_use]
    pub fn secondary(&self) -> &SecondaryDigest {
        &self.secondary
    }

    /// Key bytes: primary digest followed by secondary digest.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; COMPOSITE_KEY_LEN] {
        let mut out = [0u8; COMPOSITE_KEY_LEN];
        out[..PRIMARY_DIGEST_LEN].copy_from_slice(&self.primary);
        out[PRIMARY_DIGEST_LEN..].copy_from_slice(&self.secondary);
        out
    }

    /// Lowercase hex of [`Self::to_bytes`] (80 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.to_bytes())
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error parsing a [`CompositeKey`] from hex.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid composite key '{0}': expected {len} hex characters", len = COMPOSITE_KEY_LEN * 2)]
pub struct ParseKeyError(pub String);

impl FromStr for CompositeKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex_to_bytes(s)
            .filter(|b| b.len() == COMPOSITE_KEY_LEN)
            .ok_or_else(|| ParseKeyError(s.to_string()))?;

        let mut primary = [0u8; PRIMARY_DIGEST_LEN];
        let mut secondary = [0u8; SECONDARY_DIGEST_LEN];
        primary.copy_from_slice(&bytes[..PRIMARY_DIGEST_LEN]);
        secondary.copy_from_slice(&bytes[PRIMARY_DIGEST_LEN..]);
        Ok(Self::new(primary, secondary))
    }
}

/// Files sharing one composite key, in discovery order.
///
/// A group with a single member is only a seed: it becomes a duplicate
/// group once a second file with the same composite key arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Composite key shared by every member
    pub key: CompositeKey,
    /// Member paths, first discovered first
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a group seeded with its first member.
    #[must_use]
    pub fn new(key: CompositeKey, first: PathBuf) -> Self {
        Self {
            key,
            paths: vec![first],
        }
    }

    /// Append a member.
    ///
    /// Callers are responsible for not adding a path twice; the index
    /// tracks observed paths for that.
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether the group is reportable (2+ members).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.paths.len() > 1
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Composite key as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.key.to_hex()
    }
}
