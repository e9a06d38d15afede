//! One full sync run: walk → publish → manifest.
//!
//! ```text
//! images/**  ──walk──▶  publish (rayon workers)  ──▶  ManifestBuilder (Mutex)
//!                              │                              │
//!                              ▼                              ▼ barrier, sort
//!                       public/assets/**          src/data/asset-manifest.json
//! ```
//!
//! The destination is reset before the first file is published. The
//! manifest is only sorted and written once every worker has returned, so
//! it always describes the complete destination tree.
//!
//! When the images directory does not exist the run still succeeds: the
//! destination is reset to empty, `{}` is written as the manifest, and a
//! warning is logged. Sites without managed images build unchanged.

use crate::config::{ConfigError, SiteLayout, load_config};
use crate::manifest::{AssetManifest, ManifestBuilder, ManifestError, asset_url};
use crate::publish::{PublishError, publish_all, reset_destination};
use crate::walk::{WalkError, walk_files};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("{0} and {1} overlap")]
    OverlappingPaths(PathBuf, PathBuf),
}

/// Progress notifications, sent in completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// No images directory; the empty-manifest fallback was taken.
    MissingImages { images_dir: PathBuf },
    AssetPublished {
        key: String,
        url: String,
        size: u64,
    },
    ManifestWritten { path: PathBuf, entries: usize },
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Published,
    MissingImages,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub manifest: AssetManifest,
    pub manifest_path: PathBuf,
}

impl SyncReport {
    pub fn asset_count(&self) -> usize {
        self.manifest.len()
    }
}

/// Load `site-assets.toml` (if any) and sync the site.
pub fn sync_site(site: &Path, events: Option<Sender<SyncEvent>>) -> Result<SyncReport, SyncError> {
    let config = load_config(site)?;
    let layout = SiteLayout::new(site, &config);
    sync_layout(&layout, events)
}

/// Sync using explicit paths.
pub fn sync_layout(
    layout: &SiteLayout,
    events: Option<Sender<SyncEvent>>,
) -> Result<SyncReport, SyncError> {
    check_no_overlap(layout)?;

    let emit = |event: SyncEvent| {
        if let Some(tx) = &events {
            // Receiver gone just means nobody is printing
            let _ = tx.send(event);
        }
    };

    let files = match walk_files(&layout.images_dir) {
        Ok(files) => files,
        Err(WalkError::MissingRoot(images_dir)) => {
            reset_destination(&layout.assets_dir)?;
            let manifest = AssetManifest::empty();
            manifest.save(&layout.manifest_path)?;
            warn!(
                site = %layout.site.display(),
                "no images directory found; wrote empty manifest"
            );
            emit(SyncEvent::MissingImages { images_dir });
            emit(SyncEvent::ManifestWritten {
                path: layout.manifest_path.clone(),
                entries: 0,
            });
            return Ok(SyncReport {
                outcome: SyncOutcome::MissingImages,
                manifest,
                manifest_path: layout.manifest_path.clone(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    reset_destination(&layout.assets_dir)?;

    let builder = Mutex::new(ManifestBuilder::new());
    let published = publish_all(
        &layout.images_dir,
        &layout.assets_dir,
        files,
        |asset| -> Result<(), SyncError> {
            let url = asset_url(&layout.url_prefix, &asset.published_path);
            debug!(key = %asset.key, %url, size = asset.size, "published");
            builder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(asset.key.clone(), url.clone())?;
            emit(SyncEvent::AssetPublished {
                key: asset.key,
                url,
                size: asset.size,
            });
            Ok(())
        },
    )?;

    // Every worker has joined; safe to sort and persist
    let manifest = builder
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .finish();
    manifest.save(&layout.manifest_path)?;
    info!(
        assets = published,
        manifest = %layout.manifest_path.display(),
        "asset sync complete"
    );
    emit(SyncEvent::ManifestWritten {
        path: layout.manifest_path.clone(),
        entries: manifest.len(),
    });

    Ok(SyncReport {
        outcome: SyncOutcome::Published,
        manifest,
        manifest_path: layout.manifest_path.clone(),
    })
}

/// The destination must not contain, or sit inside, the sources or manifest,
/// and the manifest must not land inside the sources.
fn check_no_overlap(layout: &SiteLayout) -> Result<(), SyncError> {
    let assets = &layout.assets_dir;
    for other in [&layout.images_dir, &layout.manifest_path] {
        if other.starts_with(assets) || assets.starts_with(other) {
            return Err(SyncError::OverlappingPaths(assets.clone(), other.clone()));
        }
    }
    if layout.manifest_path.starts_with(&layout.images_dir) {
        return Err(SyncError::OverlappingPaths(
            layout.images_dir.clone(),
            layout.manifest_path.clone(),
        ));
    }
    Ok(())
}
