use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::model::{ArtifactKind, Bucket, CatalogRow, DownloadTarget, Exposure, UNKNOWN_LABEL};
use crate::config::HarvestConfig;

/// Subclass codes usable as a folder name: one capital letter and one digit.
static CLASS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]$").expect("static regex"));

// ---------------------------------------------------------------------------
// Bucket resolution
// ---------------------------------------------------------------------------

/// Why a label was routed to [`Bucket::Unknown`]; its `Display` is the
/// warning text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelWarning {
    /// Blank, or already the `Unknown` sentinel.
    Missing,
    /// Present but not a one-letter, one-digit code.
    Invalid(String),
}

impl fmt::Display for LabelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelWarning::Missing => {
                write!(f, "subclass is empty or unknown, filing under '{UNKNOWN_LABEL}'")
            }
            LabelWarning::Invalid(label) => write!(
                f,
                "invalid or unexpected subclass '{label}', filing under '{UNKNOWN_LABEL}'"
            ),
        }
    }
}

/// Pure classification behind [`resolve_bucket`].
pub fn classify_label(label: &str) -> (Bucket, Option<LabelWarning>) {
    let label = label.trim();
    if CLASS_CODE.is_match(label) {
        (Bucket::Class(label.to_string()), None)
    } else if label.is_empty() || label == UNKNOWN_LABEL {
        (Bucket::Unknown, Some(LabelWarning::Missing))
    } else {
        (Bucket::Unknown, Some(LabelWarning::Invalid(label.to_string())))
    }
}

/// Map a class label to its output folder. Invalid labels are not an error:
/// they are logged and routed to [`Bucket::Unknown`].
pub fn resolve_bucket(label: &str) -> Bucket {
    let (bucket, warning) = classify_label(label);
    if let Some(warning) = warning {
        log::warn!("{warning}");
    }
    bucket
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

/// `spec-PPPP-MMMMM-FFFF.fits`; the MJD is space-padded, not zero-padded.
pub fn spectrum_filename(exposure: &Exposure) -> String {
    format!(
        "spec-{:04}-{:5}-{:04}.fits",
        exposure.plate, exposure.mjd, exposure.fiber
    )
}

pub fn image_filename(id: i64) -> String {
    format!("{id}_image.jpg")
}

// ---------------------------------------------------------------------------
// Spectrum URL templates
// ---------------------------------------------------------------------------

/// One archive location a spectrum may live under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrumSource {
    pub label: &'static str,
    pub survey: &'static str,
    pub run2d: &'static str,
}

const RUN2D_EBOSS: &str = "v5_13_0";
const RUN2D_BOSS: &str = "v5_13_2";
const RUN2D_SDSS: &str = "26";

/// Tried in this order until one download succeeds.
pub const SPECTRUM_SOURCES: [SpectrumSource; 4] = [
    SpectrumSource {
        label: "eBOSS",
        survey: "eboss",
        run2d: RUN2D_EBOSS,
    },
    SpectrumSource {
        label: "BOSS",
        survey: "boss",
        run2d: RUN2D_BOSS,
    },
    SpectrumSource {
        label: "SDSS",
        survey: "sdss",
        run2d: RUN2D_SDSS,
    },
    // Legacy layout with the eBOSS reduction tag.
    SpectrumSource {
        label: "SDSS (alt)",
        survey: "sdss",
        run2d: RUN2D_EBOSS,
    },
];

impl SpectrumSource {
    pub fn url(&self, archive_url: &str, data_release: &str, exposure: &Exposure) -> String {
        format!(
            "{}/{}/{}/spectro/redux/{}/spectra/{:04}/{}",
            archive_url.trim_end_matches('/'),
            data_release,
            self.survey,
            self.run2d,
            exposure.plate,
            spectrum_filename(exposure)
        )
    }
}

pub fn spectrum_urls(config: &HarvestConfig, exposure: &Exposure) -> Vec<String> {
    SPECTRUM_SOURCES
        .iter()
        .map(|source| source.url(&config.archive_url, &config.data_release, exposure))
        .collect()
}

/// SkyServer JPEG cutout centred on `(ra, dec)`.
pub fn image_url(config: &HarvestConfig, ra: f64, dec: f64) -> String {
    format!(
        "{}/{}/SkyServerWS/ImgCutout/getjpeg?ra={}&dec={}&scale={}&width={}&height={}&opt=",
        config.cutout_url.trim_end_matches('/'),
        config.data_release,
        ra,
        dec,
        config.image_scale,
        config.image_width,
        config.image_height
    )
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

fn destination(root: &Path, bucket: &Bucket, filename: String) -> PathBuf {
    root.join(bucket.as_str()).join(filename)
}

pub fn spectrum_target(config: &HarvestConfig, bucket: &Bucket, exposure: &Exposure) -> DownloadTarget {
    let destination = destination(&config.spectrum_root, bucket, spectrum_filename(exposure));
    DownloadTarget {
        kind: ArtifactKind::Spectrum,
        already_exists: destination.exists(),
        destination,
        candidate_urls: spectrum_urls(config, exposure),
    }
}

pub fn image_target(config: &HarvestConfig, bucket: &Bucket, row: &CatalogRow) -> DownloadTarget {
    let destination = destination(&config.image_root, bucket, image_filename(row.id));
    DownloadTarget {
        kind: ArtifactKind::Image,
        already_exists: destination.exists(),
        destination,
        candidate_urls: vec![image_url(config, row.ra, row.dec)],
    }
}
