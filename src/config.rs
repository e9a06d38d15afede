//! Site layout and configuration.
//!
//! The sync tool works on a **site directory** with a fixed default layout:
//!
//! ```text
//! site/
//! ├── site-assets.toml             # Optional overrides (see below)
//! ├── images/                      # Source root (read)
//! │   ├── hero.jpg
//! │   └── team/alice.png
//! ├── public/assets/               # Destination root (deleted and rebuilt)
//! │   ├── hero.3f91ac02db4e.jpg
//! │   └── team/alice.0c4f1e9a77b2.png
//! └── src/data/asset-manifest.json # Manifest (rewritten)
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! images_dir = "images"                         # Source root, relative to the site
//! public_dir = "public"                         # Web root, relative to the site
//! assets_dir = "assets"                         # Published tree, relative to public_dir
//! manifest_path = "src/data/asset-manifest.json"
//!
//! [processing]
//! max_threads = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Published URLs are `/<assets_dir>/...`, so they stay valid when
//! `public_dir` is served as the web root. Unknown keys are rejected.
//!
//! ## Resolver Environment
//!
//! [`ResolverConfig::from_env`] reads [`ASSET_BASE_ENV`], falling back to
//! [`ASSET_BASE_URL_ENV`] when the first is unset. It is only
//! consulted by render-time code, never by the sync tool.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Optional config file inside the site directory.
pub const CONFIG_FILENAME: &str = "site-assets.toml";

/// Environment variable holding the asset base-URL override.
pub const ASSET_BASE_ENV: &str = "NEXT_PUBLIC_ASSET_BASE";

/// Fallback name for the base-URL override.
pub const ASSET_BASE_URL_ENV: &str = "ASSET_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from `site-assets.toml`.
///
/// Every field has a default; a config file need only name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub images_dir: String,
    pub public_dir: String,
    pub assets_dir: String,
    pub manifest_path: String,
    pub processing: ProcessingConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".into(),
            public_dir: "public".into(),
            assets_dir: "assets".into(),
            manifest_path: "src/data/asset-manifest.json".into(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Every path must stay inside the site directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("images_dir", &self.images_dir),
            ("public_dir", &self.public_dir),
            ("assets_dir", &self.assets_dir),
            ("manifest_path", &self.manifest_path),
        ] {
            if !is_contained_relative(value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-empty relative path inside the site, got {value:?}"
                )));
            }
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn is_contained_relative(value: &str) -> bool {
    let path = Path::new(value);
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Parallel publishing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel publish workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load `site-assets.toml` from the site directory, or defaults if absent.
pub fn load_config(site: &Path) -> Result<SyncConfig, ConfigError> {
    let path = site.join(CONFIG_FILENAME);
    let config = match fs::read_to_string(&path) {
        Ok(content) => toml::from_str::<SyncConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => SyncConfig::default(),
        Err(e) => return Err(e.into()),
    };
    config.validate()?;
    Ok(config)
}

/// Concrete filesystem locations for one site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLayout {
    pub site: PathBuf,
    /// Source root read by the walker.
    pub images_dir: PathBuf,
    /// Destination root owned by the publisher.
    pub assets_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Root-relative URL prefix of the destination root, e.g. `/assets`.
    pub url_prefix: String,
}

impl SiteLayout {
    pub fn new(site: &Path, config: &SyncConfig) -> Self {
        let assets_key = Path::new(&config.assets_dir)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self {
            site: site.to_path_buf(),
            images_dir: site.join(&config.images_dir),
            assets_dir: site.join(&config.public_dir).join(&config.assets_dir),
            manifest_path: site.join(&config.manifest_path),
            url_prefix: if assets_key.is_empty() {
                String::new()
            } else {
                format!("/{assets_key}")
            },
        }
    }

    /// Default layout, ignoring any config file.
    pub fn with_defaults(site: &Path) -> Self {
        Self::new(site, &SyncConfig::default())
    }
}

/// Render-time resolver settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverConfig {
    /// Raw base URL as configured; normalized by the resolver.
    pub base_url: Option<String>,
}

impl ResolverConfig {
    /// Read the base URL from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the base URL through `lookup`: [`ASSET_BASE_ENV`] first,
    /// then [`ASSET_BASE_URL_ENV`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(ASSET_BASE_ENV).or_else(|| lookup(ASSET_BASE_URL_ENV)),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }
}
