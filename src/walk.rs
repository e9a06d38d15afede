//! Recursive enumeration of source files.
//!
//! [`walk_files`] yields every regular file nested under a root, lazily and
//! in no particular order. Directories, symlinks, and other non-regular
//! entries are skipped. A root that does not exist is reported as
//! [`WalkError::MissingRoot`] so callers can tell "nothing to publish" apart
//! from a real I/O failure.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Source directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Lazy iterator over the regular files under a source root.
pub struct SourceFiles {
    inner: walkdir::IntoIter,
}

impl Iterator for SourceFiles {
    type Item = Result<PathBuf, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_file() => {
                    return Some(Ok(entry.into_path()));
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Start walking `root`.
///
/// The root itself is checked eagerly; everything below it is read on
/// demand as the iterator advances.
pub fn walk_files(root: &Path) -> Result<SourceFiles, WalkError> {
    let meta = match std::fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WalkError::MissingRoot(root.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if !meta.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()));
    }

    Ok(SourceFiles {
        inner: WalkDir::new(root).follow_links(false).into_iter(),
    })
}
