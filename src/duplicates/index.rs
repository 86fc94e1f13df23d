//! Two-stage duplicate index.
//!
//! # Overview
//!
//! [`DuplicateIndex`] classifies files one at a time as they are discovered.
//! Every file gets a primary digest. Files whose primary digest is unique are
//! never read again. When a file's primary digest matches an earlier file
//! (a *collision candidate*), the secondary digest is computed for both the
//! earlier file and the new one, and the new file joins the group keyed by
//! its composite key.
//!
//! # Bucket states
//!
//! Each primary digest owns a bucket that records the first file seen with
//! that digest and where its confirmation stands:
//!
//! ```text
//! Unconfirmed ──(first collision, re-read ok)──▶ Confirmed(secondary)
//!      │
//!      └──(first collision, re-read failed)───▶ Unreadable
//! ```
//!
//! The first file's secondary digest is computed once and cached in the
//! bucket, so later collisions against the same primary digest only hash
//! the newly arrived file.
//!
//! Each digest is a separate pass over the file. A collision candidate is
//! therefore read twice, once per digest, while a file with a unique
//! primary digest is read exactly once and never buffered.
//!
//! # Example
//!
//! ```no_run
//! use dupes::duplicates::{Classification, DuplicateIndex};
//! use std::path::Path;
//!
//! let mut index = DuplicateIndex::new();
//! index.observe(Path::new("a.txt")).unwrap();
//! match index.observe(Path::new("b.txt")).unwrap() {
//!     Classification::Confirmed { key, members } => println!("{key}: {members} copies"),
//!     other => println!("{other:?}"),
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::groups::{CompositeKey, DuplicateGroup};
use crate::scanner::{Fingerprint, HashError, Hasher, PrimaryDigest, SecondaryDigest};

/// Outcome of observing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No earlier file shares this primary digest.
    FirstOccurrence,
    /// Primary digest collided and the composite key matched an earlier
    /// file; the group now has `members` files.
    Confirmed {
        /// Composite key of the group the file joined
        key: CompositeKey,
        /// Group size after the file was added
        members: usize,
    },
    /// Primary digest collided but no earlier file shares the composite
    /// key, so the file is not (yet) a duplicate.
    Unconfirmed {
        /// Composite key of the file
        key: CompositeKey,
    },
    /// The path was already indexed; nothing changed.
    AlreadyObserved,
}

/// Confirmation state of a primary digest bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketState {
    /// Only the primary digest of the first file is known.
    Unconfirmed,
    /// The first file's secondary digest has been computed.
    Confirmed(SecondaryDigest),
    /// The first file could not be re-read; it stays ungrouped.
    Unreadable,
}

#[derive(Debug)]
struct Bucket {
    first: PathBuf,
    state: BucketState,
}

/// Composite key → group, preserving group discovery order.
#[derive(Debug, Default)]
struct GroupTable {
    groups: Vec<DuplicateGroup>,
    slots: HashMap<CompositeKey, usize>,
}

impl GroupTable {
    /// Create a group seeded with `path` unless one already exists for `key`.
    fn seed(&mut self, key: CompositeKey, path: PathBuf) {
        if !self.slots.contains_key(&key) {
            self.slots.insert(key, self.groups.len());
            self.groups.push(DuplicateGroup::new(key, path));
        }
    }

    /// Add `path` to the group for `key`, creating it if needed.
    ///
    /// Returns the group size afterwards.
    fn append(&mut self, key: CompositeKey, path: PathBuf) -> usize {
        match self.slots.get(&key) {
            Some(&slot) => {
                let group = &mut self.groups[slot];
                group.push(path);
                group.len()
            }
            None => {
                self.seed(key, path);
                1
            }
        }
    }
}

/// Counters describing the work done by a [`DuplicateIndex`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Files successfully added to the index
    pub files_observed: usize,
    /// Primary digest computations
    pub primary_hashes: usize,
    /// Secondary digest computations (new files and re-read first files)
    pub secondary_hashes: usize,
    /// Files whose primary digest matched an earlier file
    pub collision_candidates: usize,
    /// Collision candidates whose composite key matched no earlier file
    pub false_positives: usize,
    /// Collision candidates left ungrouped because the earlier file could
    /// not be re-read, so their content was never compared
    pub unverified_candidates: usize,
    /// Collision candidates that joined a group with another file
    pub confirmed_duplicates: usize,
    /// Earlier files that could not be re-read for confirmation
    pub partner_failures: usize,
}

/// Stateful two-stage duplicate index.
///
/// Owns the primary digest buckets and the composite key groups for the
/// duration of one scan.
#[derive(Debug)]
pub struct DuplicateIndex<F: Fingerprint = Hasher> {
    fingerprinter: F,
    buckets: HashMap<PrimaryDigest, Bucket>,
    observed: HashSet<PathBuf>,
    table: GroupTable,
    partner_failures: Vec<HashError>,
    stats: IndexStats,
}

impl DuplicateIndex<Hasher> {
    /// Create an empty index using the default [`Hasher`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_fingerprinter(Hasher::new())
    }
}

impl Default for DuplicateIndex<Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fingerprint> DuplicateIndex<F> {
    /// Create an empty index driven by `fingerprinter`.
    #[must_use]
    pub fn with_fingerprinter(fingerprinter: F) -> Self {
        Self {
            fingerprinter,
            buckets: HashMap::new(),
            observed: HashSet::new(),
            table: GroupTable::default(),
            partner_failures: Vec::new(),
            stats: IndexStats::default(),
        }
    }

    /// The fingerprinter driving this index.
    #[must_use]
    pub fn fingerprinter(&self) -> &F {
        &self.fingerprinter
    }

    /// Classify one file and record it in the index.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file itself cannot be read. The file is
    /// then left out of the index entirely and the index stays usable.
    ///
    /// A failure to re-read the *earlier* file of a collision is not an
    /// error for this call: it is logged, kept for
    /// [`Self::take_partner_failures`], and the earlier file stays ungrouped.
    ///
    /// A path that was already indexed is answered with
    /// [`Classification::AlreadyObserved`] without reading it again.
    pub fn observe(&mut self, path: &Path) -> Result<Classification, HashError> {
        if self.observed.contains(path) {
            return Ok(Classification::AlreadyObserved);
        }

        self.stats.primary_hashes += 1;
        let primary = self.fingerprinter.primary(path)?;

        let Some(bucket) = self.buckets.get_mut(&primary) else {
            self.buckets.insert(
                primary,
                Bucket {
                    first: path.to_path_buf(),
                    state: BucketState::Unconfirmed,
                },
            );
            self.observed.insert(path.to_path_buf());
            self.stats.files_observed += 1;
            return Ok(Classification::FirstOccurrence);
        };

        if bucket.state == BucketState::Unconfirmed {
            self.stats.secondary_hashes += 1;
            bucket.state = match self.fingerprinter.secondary(&bucket.first) {
                Ok(secondary) => {
                    self.table.seed(
                        CompositeKey::new(primary, secondary),
                        bucket.first.clone(),
                    );
                    BucketState::Confirmed(secondary)
                }
                Err(e) => {
                    log::warn!(
                        "Could not re-read {} to confirm collision with {}: {}",
                        bucket.first.display(),
                        path.display(),
                        e
                    );
                    self.stats.partner_failures += 1;
                    self.partner_failures.push(e);
                    BucketState::Unreadable
                }
            };
        }

        self.stats.secondary_hashes += 1;
        let secondary = self.fingerprinter.secondary(path)?;
        self.stats.collision_candidates += 1;

        let partner_unreadable = bucket.state == BucketState::Unreadable;
        let key = CompositeKey::new(primary, secondary);
        let members = self.table.append(key, path.to_path_buf());
        self.observed.insert(path.to_path_buf());
        self.stats.files_observed += 1;

        if members > 1 {
            self.stats.confirmed_duplicates += 1;
            log::debug!("Confirmed duplicate ({} copies): {}", members, path.display());
            Ok(Classification::Confirmed { key, members })
        } else if partner_unreadable {
            self.stats.unverified_candidates += 1;
            log::debug!(
                "Primary digest collision with an unreadable earlier file: {}",
                path.display()
            );
            Ok(Classification::Unconfirmed { key })
        } else {
            self.stats.false_positives += 1;
            log::debug!(
                "Primary digest collision without content match: {}",
                path.display()
            );
            Ok(Classification::Unconfirmed { key })
        }
    }

    /// Reportable groups (2+ members) in discovery order.
    pub fn groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.table.groups.iter().filter(|g| g.is_duplicate())
    }

    /// Number of reportable groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    /// Files beyond the first one in every reportable group.
    #[must_use]
    pub fn duplicate_file_count(&self) -> usize {
        self.groups().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Work counters so far.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Drain the read failures recorded for earlier collision partners.
    pub fn take_partner_failures(&mut self) -> Vec<HashError> {
        std::mem::take(&mut self.partner_failures)
    }

    /// Consume the index, returning reportable groups in discovery order.
    #[must_use]
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.table
            .groups
            .into_iter()
            .filter(DuplicateGroup::is_duplicate)
            .collect()
    }
}
