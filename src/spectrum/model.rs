use std::path::PathBuf;

// ---------------------------------------------------------------------------
// SpectrumRecord – what the viewer needs from one spec-*.fits file
// ---------------------------------------------------------------------------

/// Flux samples plus the header values used for the x-axis and title.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRecord {
    pub flux: Vec<f64>,
    /// Best-fit model, same length as `flux` when present.
    pub model_flux: Option<Vec<f64>>,
    /// `CRVAL1`: log10 of the first wavelength.
    pub wavelength_start_log: Option<f64>,
    /// `CD1_1` (or `CDELT1`): log10 step per pixel.
    pub wavelength_step_log: Option<f64>,
    pub object_name: Option<String>,
    pub plate: Option<String>,
    pub mjd: Option<String>,
    pub fiber: Option<String>,
    pub source: PathBuf,
}

/// x values for the chart. Same length as the flux array either way.
#[derive(Debug, Clone, PartialEq)]
pub enum WavelengthAxis {
    /// Ångströms from the log-linear header solution.
    Wavelength(Vec<f64>),
    /// Header lacked a usable solution.
    PixelIndex(Vec<f64>),
}

impl WavelengthAxis {
    pub fn values(&self) -> &[f64] {
        match self {
            WavelengthAxis::Wavelength(v) | WavelengthAxis::PixelIndex(v) => v,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WavelengthAxis::Wavelength(_) => "Wavelength (Å)",
            WavelengthAxis::PixelIndex(_) => "Pixel Index",
        }
    }
}

impl SpectrumRecord {
    /// `wavelength[i] = 10^(CRVAL1 + step * i)`, or the pixel index when
    /// either coefficient is missing.
    pub fn wavelength_axis(&self) -> WavelengthAxis {
        let n = self.flux.len();
        match (self.wavelength_start_log, self.wavelength_step_log) {
            (Some(start), Some(step)) => WavelengthAxis::Wavelength(
                (0..n)
                    .map(|i| 10f64.powf(start + step * i as f64))
                    .collect(),
            ),
            _ => WavelengthAxis::PixelIndex((0..n).map(|i| i as f64).collect()),
        }
    }

    pub fn title(&self) -> String {
        let na = || "N/A".to_string();
        format!(
            "Spectrum: {} (Plate={}, MJD={}, Fiber={})",
            self.object_name.as_deref().unwrap_or("Unknown Object"),
            self.plate.clone().unwrap_or_else(na),
            self.mjd.clone().unwrap_or_else(na),
            self.fiber.clone().unwrap_or_else(na)
        )
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
