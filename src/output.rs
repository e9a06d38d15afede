//! CLI output formatting for sync runs.
//!
//! # Output Format
//!
//! ```text
//! hero.jpg → /assets/hero.3f91ac02db4e.jpg (182.4 KB)
//! team/alice.png → /assets/team/alice.0c4f1e9a77b2.png (40.1 KB)
//! Manifest: site/src/data/asset-manifest.json (2 entries)
//! [sync-site-assets] Generated 2 assets for site
//! ```
//!
//! Per-asset lines arrive in completion order, which varies between runs;
//! the manifest itself is always sorted.
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or `String`) and does no
//! I/O, so it can be tested directly. The `print_*` wrappers write to stdout.

use crate::sync::{SyncEvent, SyncOutcome, SyncReport};
use std::path::Path;

/// Prefix on summary lines, matching the binary name.
pub const TAG: &str = "[sync-site-assets]";

/// Human-readable byte size: `512 B`, `40.1 KB`, `3.2 MB`.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Lines for a single progress event.
pub fn format_event(event: &SyncEvent) -> Vec<String> {
    match event {
        SyncEvent::AssetPublished { key, url, size } => {
            vec![format!("{} → {} ({})", key, url, format_size(*size))]
        }
        SyncEvent::ManifestWritten { path, entries } => {
            vec![format!(
                "Manifest: {} ({})",
                path.display(),
                count(*entries, "entry", "entries")
            )]
        }
        // Reported once in the summary instead
        SyncEvent::MissingImages { .. } => Vec::new(),
    }
}

/// Final line for a completed run.
pub fn format_summary(report: &SyncReport, site: &Path) -> String {
    match report.outcome {
        SyncOutcome::Published => format!(
            "{} Generated {} for {}",
            TAG,
            count(report.asset_count(), "asset", "assets"),
            site.display()
        ),
        SyncOutcome::MissingImages => format!(
            "{} No images directory found for {}; wrote empty manifest.",
            TAG,
            site.display()
        ),
    }
}

/// Diagnostic line for a failed run.
pub fn format_failure(error: &dyn std::error::Error) -> String {
    format!("{} Failed to sync assets: {}", TAG, error)
}

pub fn print_event(event: &SyncEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(report: &SyncReport, site: &Path) {
    println!("{}", format_summary(report, site));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::AssetManifest;
    use std::path::PathBuf;

    fn report(outcome: SyncOutcome, keys: &[&str]) -> SyncReport {
        SyncReport {
            outcome,
            manifest: keys
                .iter()
                .map(|k| (k.to_string(), format!("/assets/{k}")))
                .collect(),
            manifest_path: PathBuf::from("site/src/data/asset-manifest.json"),
        }
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn published_event_line() {
        let event = SyncEvent::AssetPublished {
            key: "hero.jpg".into(),
            url: "/assets/hero.3f91ac02db4e.jpg".into(),
            size: 2048,
        };
        assert_eq!(
            format_event(&event),
            vec!["hero.jpg → /assets/hero.3f91ac02db4e.jpg (2.0 KB)"]
        );
    }

    #[test]
    fn manifest_event_line() {
        let event = SyncEvent::ManifestWritten {
            path: PathBuf::from("site/src/data/asset-manifest.json"),
            entries: 1,
        };
        assert_eq!(
            format_event(&event),
            vec!["Manifest: site/src/data/asset-manifest.json (1 entry)"]
        );
        let event = SyncEvent::ManifestWritten {
            path: PathBuf::from("m.json"),
            entries: 3,
        };
        assert_eq!(format_event(&event), vec!["Manifest: m.json (3 entries)"]);
    }

    #[test]
    fn missing_images_event_is_silent() {
        let event = SyncEvent::MissingImages {
            images_dir: PathBuf::from("site/images"),
        };
        assert!(format_event(&event).is_empty());
    }

    #[test]
    fn summary_pluralizes() {
        let site = Path::new("site");
        assert_eq!(
            format_summary(&report(SyncOutcome::Published, &["a.jpg"]), site),
            "[sync-site-assets] Generated 1 asset for site"
        );
        assert_eq!(
            format_summary(&report(SyncOutcome::Published, &["a.jpg", "b.jpg"]), site),
            "[sync-site-assets] Generated 2 assets for site"
        );
    }

    #[test]
    fn summary_for_missing_images() {
        let r = SyncReport {
            outcome: SyncOutcome::MissingImages,
            manifest: AssetManifest::empty(),
            manifest_path: PathBuf::from("m.json"),
        };
        assert_eq!(
            format_summary(&r, Path::new("site")),
            "[sync-site-assets] No images directory found for site; wrote empty manifest."
        );
    }

    #[test]
    fn failure_line() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            format_failure(&err),
            "[sync-site-assets] Failed to sync assets: denied"
        );
    }
}
