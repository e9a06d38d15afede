//! Shared test utilities for building throwaway sites.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = site_with_images(&[("hero.jpg", "pixels"), ("team/a.png", "more")]);
//! sync_site(site.path(), None).unwrap();
//! assert_eq!(published_files(site.path()).len(), 2);
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Manifest location in the default layout, relative to the site.
pub const MANIFEST: &str = "src/data/asset-manifest.json";

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a site whose `images/` holds the given `(relative path, content)`
/// files. `images/` exists even when `files` is empty.
pub fn site_with_images(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("images")).unwrap();
    for (rel, content) in files {
        write_image(tmp.path(), rel, content.as_bytes());
    }
    tmp
}

/// Write (or overwrite) one source image.
pub fn write_image(site: &Path, rel: &str, content: &[u8]) {
    let path = site.join("images").join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Tree inspection
// =========================================================================

/// Every file under `public/assets/`, as `/`-joined relative paths.
pub fn published_files(site: &Path) -> BTreeSet<String> {
    let root = site.join("public/assets");
    WalkDir::new(&root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(&root).unwrap();
            rel.components()
                .map(|c| c.as_os_str().to_str().unwrap())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}
