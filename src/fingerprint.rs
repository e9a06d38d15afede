//! Content fingerprints for cache-busting filenames.
//!
//! A fingerprint is the first [`FINGERPRINT_LEN`] hex characters of the
//! SHA-256 digest of a file's bytes. It depends on content only: the same
//! bytes produce the same fingerprint regardless of filename or location,
//! and any byte change produces a new one.
//!
//! ## Collisions
//!
//! Twelve hex characters is 48 bits. Two different files sharing a
//! fingerprint would still publish to different paths (the logical key is
//! part of the published name), so a collision can only defeat cache-busting
//! for a single file whose new content happens to match its old fingerprint.
//! No fallback such as lengthening the hash is attempted.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io;
use std::path::Path;

/// Number of hex characters kept from the digest (48 bits).
pub const FINGERPRINT_LEN: usize = 12;

/// Truncated, lower-case hex SHA-256 of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint an in-memory byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = format!("{:x}", Sha256::digest(bytes));
        Self(digest[..FINGERPRINT_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read a file and fingerprint its contents.
///
/// Returns the bytes alongside the fingerprint so the publisher can copy
/// exactly what was hashed without a second read.
pub fn fingerprint_file(path: &Path) -> io::Result<(Fingerprint, Vec<u8>)> {
    let bytes = std::fs::read(path)?;
    Ok((Fingerprint::of_bytes(&bytes), bytes))
}
