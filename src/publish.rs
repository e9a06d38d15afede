//! Copying source files to fingerprinted destinations.
//!
//! For each file under the source root the publisher:
//!
//! 1. derives the logical key (POSIX path relative to the root),
//! 2. fingerprints the content,
//! 3. writes the bytes verbatim to `<dest>/<dir>/<stem>.<fingerprint><ext>`,
//!    creating intermediate directories.
//!
//! The destination root is wiped by [`reset_destination`] before anything is
//! published, so it never holds files from a previous run. If the process
//! dies halfway, the tree is partially repopulated and the fix is to rerun.
//!
//! ## Parallel Publishing
//!
//! Files are independent, so [`publish_all`] spreads them across the rayon
//! pool straight off the lazy walker. Each finished file is handed to a
//! caller-supplied sink, which is the only place shared state is touched.

use crate::fingerprint::{Fingerprint, fingerprint_file};
use crate::naming::{fingerprinted_name, posix_key};
use crate::walk::{SourceFiles, WalkError};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to reset destination {path}: {source}")]
    Reset { path: PathBuf, source: io::Error },
    #[error("Path is not under the source root or not valid UTF-8: {0}")]
    UnsupportedPath(PathBuf),
    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// One file copied into the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAsset {
    /// Logical key, e.g. `team/alice.png`.
    pub key: String,
    /// Path under the destination root, e.g. `team/alice.0c4f1e9a77b2.png`.
    pub published_path: String,
    pub fingerprint: Fingerprint,
    pub size: u64,
}

/// Delete the destination root (if present) and recreate it empty.
pub fn reset_destination(dest_root: &Path) -> Result<(), PublishError> {
    let reset_err = |source| PublishError::Reset {
        path: dest_root.to_path_buf(),
        source,
    };
    match fs::remove_dir_all(dest_root) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(reset_err(e)),
    }
    fs::create_dir_all(dest_root).map_err(reset_err)
}

/// Publish a single source file.
pub fn publish_file(
    source_root: &Path,
    dest_root: &Path,
    source: &Path,
) -> Result<PublishedAsset, PublishError> {
    let key = source
        .strip_prefix(source_root)
        .ok()
        .and_then(posix_key)
        .ok_or_else(|| PublishError::UnsupportedPath(source.to_path_buf()))?;

    let (fingerprint, bytes) = fingerprint_file(source).map_err(|e| PublishError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let published_path = fingerprinted_name(&key, &fingerprint);
    let destination = dest_root.join(&published_path);
    let write_err = |e| PublishError::Write {
        path: destination.clone(),
        source: e,
    };
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(&destination, &bytes).map_err(write_err)?;

    Ok(PublishedAsset {
        key,
        published_path,
        fingerprint,
        size: bytes.len() as u64,
    })
}

/// Publish every file from `files` in parallel.
///
/// `on_published` is called once per file from worker threads, in no
/// particular order. The first error (from walking, publishing, or the sink)
/// stops the run. Returns the number of files published.
pub fn publish_all<E, F>(
    source_root: &Path,
    dest_root: &Path,
    files: SourceFiles,
    on_published: F,
) -> Result<usize, E>
where
    E: From<PublishError> + Send,
    F: Fn(PublishedAsset) -> Result<(), E> + Sync + Send,
{
    let published = AtomicUsize::new(0);

    files.par_bridge().try_for_each(|entry| {
        let source = entry.map_err(PublishError::from)?;
        let asset = publish_file(source_root, dest_root, &source)?;
        on_published(asset)?;
        published.fetch_add(1, Ordering::Relaxed);
        Ok::<(), E>(())
    })?;

    Ok(published.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestBuilder, asset_url};
    use crate::walk::walk_files;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn layout(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let src = tmp.path().join("images");
        let dest = tmp.path().join("public/assets");
        fs::create_dir_all(&src).unwrap();
        (src, dest)
    }

    // =========================================================================
    // reset_destination
    // =========================================================================

    #[test]
    fn reset_creates_missing_destination() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("public/assets");
        reset_destination(&dest).unwrap();
        assert!(dest.is_dir());
    }

    #[test]
    fn reset_removes_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("assets");
        fs::create_dir_all(dest.join("old")).unwrap();
        fs::write(dest.join("old/stale.abc.jpg"), b"x").unwrap();
        fs::write(dest.join("stale.def.png"), b"y").unwrap();

        reset_destination(&dest).unwrap();
        assert!(dest.is_dir());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    // =========================================================================
    // publish_file
    // =========================================================================

    #[test]
    fn publishes_with_fingerprint_before_extension() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        fs::write(src.join("hero.jpg"), b"hello world").unwrap();

        let asset = publish_file(&src, &dest, &src.join("hero.jpg")).unwrap();
        assert_eq!(asset.key, "hero.jpg");
        assert_eq!(asset.published_path, "hero.b94d27b9934d.jpg");
        assert_eq!(asset.size, 11);
        assert_eq!(
            fs::read(dest.join("hero.b94d27b9934d.jpg")).unwrap(),
            b"hello world"
        );
    }

    #[test]
    fn preserves_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        fs::create_dir_all(src.join("team/leads")).unwrap();
        fs::write(src.join("team/leads/bob.webp"), b"hello world").unwrap();

        let asset = publish_file(&src, &dest, &src.join("team/leads/bob.webp")).unwrap();
        assert_eq!(asset.key, "team/leads/bob.webp");
        assert_eq!(asset.published_path, "team/leads/bob.b94d27b9934d.webp");
        assert!(dest.join("team/leads/bob.b94d27b9934d.webp").is_file());
    }

    #[test]
    fn extensionless_file_gets_fingerprint_suffix() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        fs::write(src.join("favicon"), b"hello world").unwrap();

        let asset = publish_file(&src, &dest, &src.join("favicon")).unwrap();
        assert_eq!(asset.published_path, "favicon.b94d27b9934d");
    }

    #[test]
    fn path_outside_root_rejected() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        let outside = tmp.path().join("outside.jpg");
        fs::write(&outside, b"x").unwrap();

        let err = publish_file(&src, &dest, &outside).unwrap_err();
        assert!(matches!(err, PublishError::UnsupportedPath(_)));
    }

    #[test]
    fn unreadable_source_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        let err = publish_file(&src, &dest, &src.join("gone.jpg")).unwrap_err();
        assert!(matches!(err, PublishError::Read { .. }));
    }

    // =========================================================================
    // publish_all
    // =========================================================================

    #[test]
    fn publish_all_hands_every_file_to_sink() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        fs::create_dir_all(src.join("a/b")).unwrap();
        for (i, name) in ["one.jpg", "a/two.png", "a/b/three.gif"].iter().enumerate() {
            fs::write(src.join(name), format!("content {i}")).unwrap();
        }
        reset_destination(&dest).unwrap();

        let seen = Mutex::new(Vec::new());
        let count = publish_all::<PublishError, _>(
            &src,
            &dest,
            walk_files(&src).unwrap(),
            |asset| {
                seen.lock().unwrap().push(asset.key);
                Ok(())
            },
        )
        .unwrap();

        let mut keys = seen.into_inner().unwrap();
        keys.sort();
        assert_eq!(count, 3);
        assert_eq!(keys, vec!["a/b/three.gif", "a/two.png", "one.jpg"]);
    }

    #[test]
    fn publish_all_many_files_across_nested_dirs() {
        const FILES: usize = 300;
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        for i in 0..FILES {
            let rel = format!("d{}/e{}/f{i}.png", i % 7, i % 3);
            let path = src.join(&rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!("pixels {i}")).unwrap();
        }
        reset_destination(&dest).unwrap();

        let builder = Mutex::new(ManifestBuilder::new());
        let count = publish_all::<PublishError, _>(
            &src,
            &dest,
            walk_files(&src).unwrap(),
            |asset| {
                let url = asset_url("/assets", &asset.published_path);
                builder.lock().unwrap().insert(asset.key, url).unwrap();
                Ok(())
            },
        )
        .unwrap();

        let manifest = builder.into_inner().unwrap().finish();
        let on_disk = walk_files(&dest).unwrap().count();
        assert_eq!(count, FILES);
        assert_eq!(manifest.len(), FILES);
        assert_eq!(on_disk, FILES);
        assert!(manifest.contains_key("d6/e2/f209.png"));
    }

    #[test]
    fn publish_all_stops_on_sink_error() {
        let tmp = TempDir::new().unwrap();
        let (src, dest) = layout(&tmp);
        fs::write(src.join("one.jpg"), b"1").unwrap();
        reset_destination(&dest).unwrap();

        let result = publish_all(&src, &dest, walk_files(&src).unwrap(), |asset| {
            Err(PublishError::UnsupportedPath(PathBuf::from(asset.key)))
        });
        assert!(matches!(result, Err(PublishError::UnsupportedPath(_))));
    }
}
