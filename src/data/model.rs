use std::fmt;
use std::path::PathBuf;

/// Class label given to rows whose subclass is blank or not a usable code.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// CatalogRow – one object from the input CSV
// ---------------------------------------------------------------------------

/// A single object from the input catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    /// SDSS object identifier (`name` column).
    pub id: i64,
    pub ra: f64,
    pub dec: f64,
    /// Spectral subclass, trimmed. Never empty: blank becomes [`UNKNOWN_LABEL`].
    pub class_label: String,
    /// `None` when the column is absent or the cell is not an integer.
    pub plate: Option<i64>,
    pub mjd: Option<i64>,
    pub fiber: Option<i64>,
}

impl CatalogRow {
    /// The plate/MJD/fiber triple, if all three parsed as integers.
    pub fn exposure(&self) -> Option<Exposure> {
        Some(Exposure {
            plate: self.plate?,
            mjd: self.mjd?,
            fiber: self.fiber?,
        })
    }
}

// ---------------------------------------------------------------------------
// Exposure – plate / MJD / fiber
// ---------------------------------------------------------------------------

/// Identifies one spectrum in the archive's naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Exposure {
    pub plate: i64,
    pub mjd: i64,
    pub fiber: i64,
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plate={} mjd={} fiber={}", self.plate, self.mjd, self.fiber)
    }
}

// ---------------------------------------------------------------------------
// Bucket – output subdirectory
// ---------------------------------------------------------------------------

/// Output subdirectory derived from the class label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// A valid subclass code such as `M4`.
    Class(String),
    Unknown,
}

impl Bucket {
    pub fn as_str(&self) -> &str {
        match self {
            Bucket::Class(label) => label,
            Bucket::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Download targets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Spectrum,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Image => write!(f, "image"),
            ArtifactKind::Spectrum => write!(f, "spectrum"),
        }
    }
}

/// Where one artifact goes and where it may be fetched from, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTarget {
    pub kind: ArtifactKind,
    pub destination: PathBuf,
    pub candidate_urls: Vec<String>,
    pub already_exists: bool,
}
