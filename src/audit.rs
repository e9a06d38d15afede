//! Consistency checks between a manifest and the published tree.
//!
//! After a successful sync every file under the destination root has exactly
//! one manifest entry and every entry points at a file that exists.
//! [`audit_published`] reports any violation of that, which catches hand
//! edits to either side and interrupted runs.

use crate::manifest::AssetManifest;
use crate::naming::posix_key;
use crate::walk::{WalkError, walk_files};
use std::collections::BTreeSet;
use std::path::Path;

/// Result of comparing a manifest with the destination tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// Manifest keys whose URL does not map to an existing published file.
    pub dangling: Vec<String>,
    /// Published paths (relative to the destination root) with no entry.
    pub orphans: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.orphans.is_empty()
    }
}

/// Compare `manifest` against the files under `assets_root`.
///
/// `url_prefix` is the root-relative prefix the manifest URLs were built
/// with (`/assets` by default). Entries with other URLs, such as absolute
/// external links, count as dangling. A missing `assets_root` is treated as
/// an empty tree.
pub fn audit_published(
    manifest: &AssetManifest,
    assets_root: &Path,
    url_prefix: &str,
) -> Result<AuditReport, WalkError> {
    let mut on_disk = BTreeSet::new();
    match walk_files(assets_root) {
        Ok(files) => {
            for file in files {
                let file = file?;
                if let Some(key) = file.strip_prefix(assets_root).ok().and_then(posix_key) {
                    on_disk.insert(key);
                }
            }
        }
        Err(WalkError::MissingRoot(_)) => {}
        Err(e) => return Err(e),
    }

    let prefix = format!("{}/", url_prefix.trim_end_matches('/'));
    let mut report = AuditReport::default();
    let mut referenced = BTreeSet::new();

    for (key, url) in manifest.iter() {
        match url.strip_prefix(&prefix) {
            Some(published) if on_disk.contains(published) => {
                referenced.insert(published.to_string());
            }
            _ => report.dangling.push(key.to_string()),
        }
    }

    report.orphans = on_disk.difference(&referenced).cloned().collect();
    Ok(report)
}
