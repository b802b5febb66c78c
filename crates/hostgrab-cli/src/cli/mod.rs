//! CLI for hostgrab.

use anyhow::Result;
use clap::Parser;
use hostgrab_core::config::{self, HostgrabConfig};
use hostgrab_core::{batch, input};
use std::path::PathBuf;

/// Fetch every URL in a list concurrently and save each body under the output
/// directory, one file per hostname.
#[derive(Debug, Parser)]
#[command(name = "hostgrab")]
#[command(about = "Concurrently fetch a list of URLs into per-host files", long_about = None)]
pub struct Cli {
    /// Text file with one URL per line.
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.run()
    }

    /// Exits cleanly once the batch completes, however many fetches failed.
    pub fn run(&self) -> Result<()> {
        // Only a missing config location falls back; a broken file is fatal.
        let cfg = match config::config_path() {
            Ok(path) => config::load_or_init_at(&path)?,
            Err(e) => {
                tracing::warn!("config location unavailable ({:#}); using defaults", e);
                HostgrabConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let options = cfg.fetch_options()?;

        let urls = input::read_url_list(&self.file)?;
        tracing::debug!("read {} line(s) from {}", urls.len(), self.file.display());

        let summary = batch::run_batch(&urls, options, &cfg.output_dir)?;
        tracing::debug!(
            "{} submitted, {} fetched, {} failed, {} written",
            summary.submitted,
            summary.succeeded,
            summary.failed,
            summary.written
        );
        Ok(())
    }
}
