use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use sdss_harvest::spectrum::fits::write_spectrum;
use sdss_harvest::spectrum::SpectrumRecord;

/// Log-lambda solution typical of BOSS coadds.
const CRVAL1: f64 = 3.5523;
const CD1_1: f64 = 0.0001;
const NPIX: usize = 4600;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Smooth red continuum with TiO-like absorption bands and Hα emission,
/// roughly the shape of an M dwarf.
fn model_flux(wavelength: f64) -> f64 {
    let continuum = 2.0 + 8.0 * ((wavelength - 3600.0) / 6400.0).clamp(0.0, 1.0).powf(1.5);
    let bands: f64 = [(7050.0, 60.0, 0.35), (7600.0, 40.0, 0.25), (8430.0, 50.0, 0.2)]
        .iter()
        .map(|&(mu, sigma, depth)| gaussian(wavelength, mu, sigma, depth))
        .sum();
    let h_alpha = gaussian(wavelength, 6564.6, 2.5, 6.0);
    continuum * (1.0 - bands) + h_alpha
}

const SAMPLE_CATALOG: &str = "\
name,ra,dec,subclass,plate,mjd,fiberID
1237648720693755918,145.33471,-0.79633,M4,266,51602,1
1237648720693821449,145.46224,-0.82711,M2,266,51602,12
1237648721230364830,146.94201,-0.31005,K7,268,51633,331
1237650762388275294,171.02830,-2.92004,,328,52282,448
";

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.4).context("noise distribution")?;

    let model: Vec<f64> = (0..NPIX)
        .map(|i| model_flux(10f64.powf(CRVAL1 + CD1_1 * i as f64)))
        .collect();
    let flux: Vec<f64> = model.iter().map(|&m| m + noise.sample(&mut rng)).collect();

    let spectrum_path = PathBuf::from("spec-0266-51602-0001.fits");
    let record = SpectrumRecord {
        flux,
        model_flux: Some(model),
        wavelength_start_log: Some(CRVAL1),
        wavelength_step_log: Some(CD1_1),
        object_name: Some("synthetic M4".to_string()),
        plate: Some("266".to_string()),
        mjd: Some("51602".to_string()),
        fiber: Some("1".to_string()),
        source: spectrum_path.clone(),
    };
    write_spectrum(&spectrum_path, &record)
        .with_context(|| format!("writing {}", spectrum_path.display()))?;

    let catalog_path = PathBuf::from("objects.csv");
    std::fs::write(&catalog_path, SAMPLE_CATALOG)
        .with_context(|| format!("writing {}", catalog_path.display()))?;

    println!(
        "Wrote {} ({NPIX} pixels) and {}",
        spectrum_path.display(),
        catalog_path.display()
    );
    Ok(())
}
