//! The asset manifest: logical key → public URL.
//!
//! [`ManifestBuilder`] collects entries while files are being published, in
//! whatever order the workers finish. [`ManifestBuilder::finish`] turns it
//! into an [`AssetManifest`], whose entries live in a `BTreeMap` and are
//! therefore always in byte-wise lexicographic key order.
//!
//! ## On-disk format
//!
//! ```json
//! {
//!   "hero.jpg": "/assets/hero.3f91ac02db4e.jpg",
//!   "team/alice.png": "/assets/team/alice.0c4f1e9a77b2.png"
//! }
//! ```
//!
//! Two-space indentation and a trailing newline. The format is compared
//! byte-for-byte by version control and by anything that diffs builds, so
//! it must not drift. An empty manifest is written as `{}` plus newline.
//!
//! URLs are root-relative (`/assets/...`). Rewriting onto another origin is
//! the resolver's job, which keeps the file portable across deployments.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate manifest key: {0}")]
    DuplicateKey(String),
}

/// Public URL of a published file: `<url_prefix>/<published-relative-path>`.
pub fn asset_url(url_prefix: &str, published_path: &str) -> String {
    format!("{}/{}", url_prefix.trim_end_matches('/'), published_path)
}

/// Accumulates manifest entries in arbitrary order.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    entries: HashMap<String, String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one published asset. Keys must be unique.
    pub fn insert(&mut self, key: String, url: String) -> Result<(), ManifestError> {
        if self.entries.contains_key(&key) {
            return Err(ManifestError::DuplicateKey(key));
        }
        self.entries.insert(key, url);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into a sorted manifest.
    pub fn finish(self) -> AssetManifest {
        AssetManifest {
            entries: self.entries.into_iter().collect(),
        }
    }
}

/// Sorted, persisted mapping from logical key to public URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize in the on-disk format (2-space indent, trailing newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the manifest, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

impl FromIterator<(String, String)> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
