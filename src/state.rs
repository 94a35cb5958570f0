use crate::spectrum::{SpectrumRecord, WavelengthAxis};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct ViewerState {
    /// Loaded spectrum (None until a file is opened).
    pub spectrum: Option<SpectrumRecord>,

    /// x values for the loaded spectrum (cached).
    pub axis: Option<WavelengthAxis>,

    /// Operator switched the model overlay off.
    pub hide_model: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn with_spectrum(spectrum: SpectrumRecord) -> Self {
        let mut state = Self::default();
        state.set_spectrum(spectrum);
        state
    }

    /// Ingest a newly loaded spectrum and derive its x-axis.
    pub fn set_spectrum(&mut self, spectrum: SpectrumRecord) {
        self.axis = Some(spectrum.wavelength_axis());
        self.spectrum = Some(spectrum);
        self.status_message = None;
    }

    pub fn has_model(&self) -> bool {
        self.spectrum
            .as_ref()
            .is_some_and(|sp| sp.model_flux.is_some())
    }

    pub fn show_model(&self) -> bool {
        self.has_model() && !self.hide_model
    }

    /// First and last x value, for the info panel.
    pub fn axis_range(&self) -> Option<(f64, f64)> {
        let values = self.axis.as_ref()?.values();
        Some((*values.first()?, *values.last()?))
    }
}
