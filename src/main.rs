use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sdss_harvest::config::HarvestConfig;
use sdss_harvest::data::loader::load_catalog;
use sdss_harvest::fetch::HttpFetcher;
use sdss_harvest::harvest::Harvester;

#[derive(Parser)]
#[command(name = "sdss-harvest")]
#[command(about = "Download SDSS spectra and image cutouts for a catalog of objects", long_about = None)]
struct Cli {
    /// JSON config file; missing keys use the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog CSV (overrides `input_path`).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Do not download image cutouts.
    #[arg(long)]
    no_images: bool,

    /// Do not download spectra.
    #[arg(long)]
    no_spectra: bool,
}

impl Cli {
    fn into_config(self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::load(path)?,
            None => HarvestConfig::default(),
        };
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if self.no_images {
            config.download_images = false;
        }
        if self.no_spectra {
            config.download_spectra = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;

    log::info!("Reading targets from {}...", config.input_path.display());
    let rows = load_catalog(&config.input_path, config.download_spectra)
        .with_context(|| format!("loading catalog {}", config.input_path.display()))?;
    log::info!("Found {} targets.", rows.len());

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let harvester = Harvester::new(config, fetcher);
    harvester.prepare_output()?;

    let summary = harvester.run(&rows);
    log::info!("Download complete: {summary}");

    if !harvester.config().download_spectra {
        log::info!("Spectra were not downloaded because download_spectra is off.");
    }
    Ok(())
}
