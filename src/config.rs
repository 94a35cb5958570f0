use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Harvest configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_ARCHIVE_URL: &str = "https://data.sdss.org/sas";
pub const DEFAULT_CUTOUT_URL: &str = "https://skyserver.sdss.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the downloader needs to know, passed to the
/// [`Harvester`](crate::harvest::Harvester) at construction.
///
/// Every field has a default, so a JSON config file only needs to list the
/// values it changes:
///
/// ```json
/// { "input_path": "m_dwarfs.csv", "download_images": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// CSV catalog with `name`, `ra`, `dec`, `subclass` (+ `plate`, `mjd`, `fiberID`).
    pub input_path: PathBuf,
    /// Root folder for cutout JPEGs.
    pub image_root: PathBuf,
    /// Root folder for spectrum FITS files.
    pub spectrum_root: PathBuf,
    /// SDSS data release tag, e.g. `dr16`.
    pub data_release: String,
    /// Cutout width in pixels.
    pub image_width: u32,
    /// Cutout height in pixels.
    pub image_height: u32,
    /// Cutout pixel scale in arcsec/pixel.
    pub image_scale: f64,
    pub download_images: bool,
    pub download_spectra: bool,
    /// Science Archive Server root (spectra).
    pub archive_url: String,
    /// SkyServer root (image cutouts).
    pub cutout_url: String,
    pub request_timeout_secs: u64,
    /// Pause after a successful download.
    pub success_delay_ms: u64,
    /// Pause after every spectrum candidate failed.
    pub failure_delay_ms: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("objects.csv"),
            image_root: PathBuf::from("images"),
            spectrum_root: PathBuf::from("spectra"),
            data_release: "dr16".to_string(),
            image_width: 128,
            image_height: 128,
            image_scale: 0.2,
            download_images: true,
            download_spectra: true,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            cutout_url: DEFAULT_CUTOUT_URL.to_string(),
            request_timeout_secs: 30,
            success_delay_ms: 500,
            failure_delay_ms: 200,
        }
    }
}

impl HarvestConfig {
    /// Load a JSON config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_delay_ms)
    }
}
