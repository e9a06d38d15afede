//! # Site Assets
//!
//! Content-addressed publishing for a static site's images. The sync tool
//! copies every source image to a cache-busting name and records where it
//! went; the site's renderer reads that record to turn logical names into
//! URLs.
//!
//! # Pipeline
//!
//! ```text
//! images/hero.jpg ──▶ sha256[..12] ──▶ public/assets/hero.3f91ac02db4e.jpg
//!                                  └─▶ asset-manifest.json
//!                                      { "hero.jpg": "/assets/hero.3f91ac02db4e.jpg" }
//!
//! render time:  AssetResolver::asset_url("hero.jpg")
//!                 ──▶ "/assets/hero.3f91ac02db4e.jpg"
//!                 ──▶ "https://cdn.example.com/assets/hero.3f91ac02db4e.jpg" (with NEXT_PUBLIC_ASSET_BASE)
//! ```
//!
//! Identical bytes always publish to the same name, so reruns over unchanged
//! images produce a byte-identical manifest. Changing one image changes only
//! its own entry.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fingerprint`] | Truncated SHA-256 content fingerprints |
//! | [`walk`] | Lazy recursive enumeration of source files |
//! | [`naming`] | Logical keys and fingerprinted filenames |
//! | [`publish`] | Destination reset and parallel fingerprinted copies |
//! | [`manifest`] | Manifest builder and the sorted, persisted manifest |
//! | [`sync`] | One full run, including the missing-images fallback |
//! | [`resolve`] | Render-time key → URL lookup with base-URL rewriting |
//! | [`audit`] | Manifest vs. published tree consistency checks |
//! | [`config`] | Site layout, `site-assets.toml`, resolver environment |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Full Rebuild, Not Incremental
//!
//! The destination tree is deleted and rebuilt on every run. Copying images
//! is cheap next to the rest of a site build, and a full rebuild means the
//! destination never holds a file the manifest doesn't know about.
//!
//! ## Root-Relative URLs in the Manifest
//!
//! The manifest stores `/assets/...` paths. Serving from a CDN or a path
//! prefix is a render-time concern handled by [`resolve::AssetResolver`], so
//! one manifest works for every deployment origin.
//!
//! ## Unknown Keys Fail Loudly
//!
//! Looking up a key that was never published is an error, not a placeholder
//! image. It means content references an image that doesn't exist, and that
//! should stop the build.

pub mod audit;
pub mod config;
pub mod fingerprint;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod publish;
pub mod resolve;
pub mod sync;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
