//! Logical keys and fingerprinted filenames.
//!
//! Every source file is identified by its **logical key**: the path relative
//! to the images root, with components joined by `/` on every platform. The
//! published name inserts the fingerprint before the extension of the last
//! path segment:
//!
//! - `hero.jpg` → `hero.3f91ac02db4e.jpg`
//! - `team/alice.png` → `team/alice.3f91ac02db4e.png`
//! - `archive.tar.gz` → `archive.tar.3f91ac02db4e.gz` (last extension only)
//! - `LICENSE` → `LICENSE.3f91ac02db4e` (no extension)
//! - `.keep` → `.keep.3f91ac02db4e` (a leading dot is not an extension)

use crate::fingerprint::Fingerprint;
use std::path::{Component, Path};

/// A basename split around its extension.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitName<'a> {
    /// Everything before the extension.
    pub stem: &'a str,
    /// Extension including its leading dot, or empty.
    pub ext: &'a str,
}

/// Split a basename into stem and extension.
///
/// The extension starts at the last `.`, unless that dot is the first
/// character of the name.
pub fn split_extension(basename: &str) -> SplitName<'_> {
    match basename.rfind('.') {
        Some(pos) if pos > 0 => SplitName {
            stem: &basename[..pos],
            ext: &basename[pos..],
        },
        _ => SplitName {
            stem: basename,
            ext: "",
        },
    }
}

/// Build the logical key for a path relative to the source root.
///
/// Returns `None` if any component is not valid UTF-8 or the path escapes
/// the root (`..`, absolute prefixes).
pub fn posix_key(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Insert `.<fingerprint>` before the extension of the key's last segment.
pub fn fingerprinted_name(key: &str, fingerprint: &Fingerprint) -> String {
    let (dir, basename) = match key.rfind('/') {
        Some(pos) => key.split_at(pos + 1),
        None => ("", key),
    };
    let SplitName { stem, ext } = split_extension(basename);
    format!("{dir}{stem}.{fingerprint}{ext}")
}
