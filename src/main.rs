use clap::Parser;
use site_assets::{config, output, sync};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sync-site-assets")]
#[command(about = "Fingerprint and publish a site's images, then write the asset manifest")]
#[command(long_about = "\
Fingerprint and publish a site's images, then write the asset manifest

Every file under <SITE>/images/ is copied to <SITE>/public/assets/ with a
content hash inserted before its extension, and <SITE>/src/data/asset-manifest.json
maps each original path to its published URL:

  images/hero.jpg        →  public/assets/hero.3f91ac02db4e.jpg
  images/team/alice.png  →  public/assets/team/alice.0c4f1e9a77b2.png

  {
    \"hero.jpg\": \"/assets/hero.3f91ac02db4e.jpg\",
    \"team/alice.png\": \"/assets/team/alice.0c4f1e9a77b2.png\"
  }

public/assets/ is deleted and rebuilt on every run. A site without an images/
directory gets an empty manifest. Paths can be changed in <SITE>/site-assets.toml.

Set RUST_LOG=site_assets=debug for per-file logging.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(default_value = ".")]
    site: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli.site) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::format_failure(&*e));
            ExitCode::FAILURE
        }
    }
}

fn run(site: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let site = std::path::absolute(site)?;
    let site_config = config::load_config(&site)?;
    init_thread_pool(&site_config.processing);
    let layout = config::SiteLayout::new(&site, &site_config);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let result = sync::sync_layout(&layout, Some(tx));
    printer.join().map_err(|_| "output thread panicked")?;

    let report = result?;
    output::print_summary(&report, &site);
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("site_assets=warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
