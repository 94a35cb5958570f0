use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// Retrieves one URL into one file.
///
/// Implementations report failure through the return value only; nothing
/// escapes as an error or panic.
pub trait Fetcher {
    fn fetch(&self, url: &str, destination: &Path) -> bool;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, destination: &Path) -> bool {
        (**self).fetch(url, destination)
    }
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        ensure_parent_dir(destination)?;

        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()?;

        let partial = partial_path(destination);
        let written = write_body(&mut response, &partial);
        if let Err(e) = written {
            // Never leave a truncated file behind for the next run to skip over.
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }

        if let Err(e) = std::fs::rename(&partial, destination) {
            let _ = std::fs::remove_file(&partial);
            return Err(e).with_context(|| {
                format!("moving {} to {}", partial.display(), destination.display())
            });
        }
        Ok(())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> bool {
        match self.download(url, destination) {
            Ok(()) => {
                log::debug!("saved {}", destination.display());
                true
            }
            Err(e) => {
                log::warn!("download failed: {url} - {e:#}");
                false
            }
        }
    }
}

fn ensure_parent_dir(destination: &Path) -> Result<()> {
    if let Some(dir) = destination.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
            log::info!("created directory {}", dir.display());
        }
    }
    Ok(())
}

/// Streams the response body to `path` in chunks.
fn write_body(response: &mut reqwest::blocking::Response, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::with_capacity(8192, file);
    response
        .copy_to(&mut writer)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// `spec-0266-51602-0001.fits` → `spec-0266-51602-0001.fits.part`
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    destination.with_file_name(name)
}
