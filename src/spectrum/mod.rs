//! Single-spectrum reading for the viewer.
//!
//! ```text
//!   spec-*.fits ──► fits::read_spectrum ──► SpectrumRecord ──► wavelength_axis()
//! ```

pub mod fits;
pub mod model;

pub use fits::{read_spectrum, SpectrumError};
pub use model::{SpectrumRecord, WavelengthAxis};
