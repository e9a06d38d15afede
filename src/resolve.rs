//! Render-time lookup of published asset URLs.
//!
//! An [`AssetResolver`] is built once, from a loaded manifest and a
//! [`ResolverConfig`], and then only read. Rendering code receives it by
//! reference; there is no global instance and no reload.
//!
//! ```no_run
//! use site_assets::config::ResolverConfig;
//! use site_assets::resolve::AssetResolver;
//! use std::path::Path;
//!
//! let resolver = AssetResolver::load(
//!     Path::new("src/data/asset-manifest.json"),
//!     &ResolverConfig::from_env(),
//! )?;
//! let hero = resolver.asset_url("hero.jpg")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Base URL
//!
//! With no base URL (unset, empty, or `/`) the manifest's root-relative path
//! is returned as is. Otherwise exactly one trailing slash is trimmed from
//! the base and the path gets exactly one leading slash:
//!
//! | base | manifest value | result |
//! |------|----------------|--------|
//! | *(none)* | `/assets/hero.3f91ac02db4e.jpg` | `/assets/hero.3f91ac02db4e.jpg` |
//! | `https://cdn.example.com/` | `/assets/hero.3f91ac02db4e.jpg` | `https://cdn.example.com/assets/hero.3f91ac02db4e.jpg` |
//! | `https://cdn.example.com/site` | `assets/x.jpg` | `https://cdn.example.com/site/assets/x.jpg` |
//!
//! Keys and manifest values that are already absolute `http://` or
//! `https://` URLs pass through untouched, so externally hosted images can
//! share the same accessor.

use crate::config::ResolverConfig;
use crate::manifest::{AssetManifest, ManifestError};
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Unknown asset '{0}'. Add it to images/ and rerun the asset sync.")]
    UnknownAsset(String),
    #[error("Failed to load asset manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Case-insensitive check for an `http://` or `https://` prefix.
pub fn is_absolute_http_url(value: &str) -> bool {
    let has_prefix = |prefix: &str| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    has_prefix("http://") || has_prefix("https://")
}

/// Normalize a configured base URL; `None` means "no rewriting".
fn normalize_base(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() || raw == "/" {
        return None;
    }
    Some(raw.strip_suffix('/').unwrap_or(raw).to_string())
}

/// Immutable manifest lookup with optional base-URL rewriting.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    manifest: AssetManifest,
    base_url: Option<String>,
}

impl AssetResolver {
    pub fn new(manifest: AssetManifest, config: &ResolverConfig) -> Self {
        Self {
            manifest,
            base_url: normalize_base(config.base_url.as_deref()),
        }
    }

    /// Read the manifest file once and build a resolver from it.
    pub fn load(manifest_path: &Path, config: &ResolverConfig) -> Result<Self, ResolveError> {
        let manifest = AssetManifest::load(manifest_path)?;
        Ok(Self::new(manifest, config))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Public URL for a logical key.
    ///
    /// An absolute `http(s)` key is returned unchanged. Any other key missing
    /// from the manifest is [`ResolveError::UnknownAsset`].
    pub fn asset_url<'a>(&'a self, key: &'a str) -> Result<Cow<'a, str>, ResolveError> {
        if is_absolute_http_url(key) {
            return Ok(Cow::Borrowed(key));
        }
        let resolved = self
            .manifest
            .get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ResolveError::UnknownAsset(key.to_string()))?;
        Ok(self.rebase(resolved))
    }

    fn rebase<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if is_absolute_http_url(path) {
            return Cow::Borrowed(path);
        }
        match &self.base_url {
            None => Cow::Borrowed(path),
            Some(base) => {
                let path = path.strip_prefix('/').unwrap_or(path);
                Cow::Owned(format!("{base}/{path}"))
            }
        }
    }

    /// Every managed key, in lexicographic order.
    pub fn managed_assets(&self) -> Vec<&str> {
        self.manifest.keys().collect()
    }

    /// Keys from `referenced` that the manifest does not know about.
    ///
    /// Absolute `http(s)` URLs are never reported. Each missing key appears
    /// once, in first-seen order.
    pub fn missing_keys<'k, I>(&self, referenced: I) -> Vec<&'k str>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let mut missing: Vec<&str> = Vec::new();
        for key in referenced {
            if is_absolute_http_url(key) || self.manifest.contains_key(key) {
                continue;
            }
            if !missing.contains(&key) {
                missing.push(key);
            }
        }
        missing
    }
}
