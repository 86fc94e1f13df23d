//! Streaming content fingerprinters.
//!
//! # Overview
//!
//! Two independent digests are computed over a file's complete byte stream:
//!
//! - **Primary**: XXH3-64, cheap and non-cryptographic. Used to bucket files
//!   and find collision candidates.
//! - **Secondary**: BLAKE3 in keyed mode with a fixed key compiled into the
//!   binary. Only computed for files whose primary digest collides with an
//!   earlier file, and used to confirm that the candidates really share
//!   content.
//!
//! Both digests are deterministic for identical bytes, so results are
//! comparable across runs and machines.
//!
//! # Example
//!
//! ```no_run
//! use dupes::scanner::{hash_to_hex, Fingerprint, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let primary = hasher.primary(Path::new("some_file.txt")).unwrap();
//! println!("{}", hash_to_hex(&primary));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use xxhash_rust::xxh3::Xxh3;

use super::HashError;

/// Width of the primary digest in bytes (64 bits).
pub const PRIMARY_DIGEST_LEN: usize = 8;

/// Width of the secondary digest in bytes (256 bits).
pub const SECONDARY_DIGEST_LEN: usize = 32;

/// Primary (fast, non-cryptographic) content digest.
pub type PrimaryDigest = [u8; PRIMARY_DIGEST_LEN];

/// Secondary (keyed, cryptographic) content digest.
pub type SecondaryDigest = [u8; SECONDARY_DIGEST_LEN];

/// Key for the secondary digest. Fixed so digests stay comparable between runs.
const SECONDARY_KEY: [u8; 32] = [
    0xE9, 0xEC, 0xA1, 0x53, 0x13, 0x93, 0xD1, 0x74, 0xDF, 0xEA, 0x70, 0xCC, 0x5B, 0xAA, 0x4F, 0xCE,
    0x5F, 0xC5, 0x99, 0xD0, 0x8E, 0xCB, 0x36, 0xB9, 0x96, 0x14, 0x89, 0x98, 0x5A, 0x64, 0xD3, 0xAE,
];

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Source of the two content digests used by the duplicate index.
///
/// [`Hasher`] is the production implementation. The index is generic over
/// this trait so it can be driven by fingerprinters with controlled output.
pub trait Fingerprint {
    /// Compute the primary digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read.
    fn primary(&self, path: &Path) -> Result<PrimaryDigest, HashError>;

    /// Compute the secondary digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read.
    fn secondary(&self, path: &Path) -> Result<SecondaryDigest, HashError>;
}

/// Streaming file hasher producing primary and secondary digests.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size. Values below 1 KiB are raised to 1 KiB.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1024);
        self
    }

    /// Read buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Primary digest (XXH3-64, big-endian) of everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Propagates any read error; a partially read stream yields no digest.
    pub fn primary_reader<R: Read>(&self, reader: R) -> io::Result<PrimaryDigest> {
        let mut state = Xxh3::new();
        self.stream(reader, |chunk| state.update(chunk))?;
        Ok(state.digest().to_be_bytes())
    }

    /// Secondary digest (keyed BLAKE3) of everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Propagates any read error; a partially read stream yields no digest.
    pub fn secondary_reader<R: Read>(&self, reader: R) -> io::Result<SecondaryDigest> {
        let mut state = blake3::Hasher::new_keyed(&SECONDARY_KEY);
        self.stream(reader, |chunk| {
            state.update(chunk);
        })?;
        Ok(*state.finalize().as_bytes())
    }

    fn stream<R: Read>(&self, mut reader: R, mut sink: impl FnMut(&[u8])) -> io::Result<()> {
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => return Ok(()),
                Ok(n) => sink(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn open(path: &Path) -> Result<File, HashError> {
        File::open(path).map_err(|e| HashError::from_io(path, e))
    }
}

impl Fingerprint for Hasher {
    fn primary(&self, path: &Path) -> Result<PrimaryDigest, HashError> {
        let file = Self::open(path)?;
        let digest = self
            .primary_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;
        log::trace!("Primary digest {} for {}", hash_to_hex(&digest), path.display());
        Ok(digest)
    }

    fn secondary(&self, path: &Path) -> Result<SecondaryDigest, HashError> {
        let file = Self::open(path)?;
        let digest = self
            .secondary_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;
        log::trace!("Secondary digest computed for {}", path.display());
        Ok(digest)
    }
}

/// Lowercase hexadecimal representation of a digest.
///
/// # Example
///
/// ```
/// use dupes::scanner::hash_to_hex;
///
/// assert_eq!(hash_to_hex(&[0x00, 0xab, 0xff]), "00abff");
/// ```
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(DIGITS[(byte >> 4) as usize] as char);
        out.push(DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Parse a hexadecimal string into bytes.
///
/// Returns `None` on odd length or non-hex characters.
#[must_use]
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}
