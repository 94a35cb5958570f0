use std::path::{Path, PathBuf};

use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;
use thiserror::Error;

use super::model::SpectrumRecord;

pub const FLUX_COLUMN: &str = "flux";
pub const MODEL_COLUMN: &str = "model";

#[derive(Debug, Error)]
pub enum SpectrumError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("{path}: {reason}")]
    Structure { path: PathBuf, reason: String },

    #[error("'{column}' column not found in HDU 1 of {path}")]
    ColumnNotFound { path: PathBuf, column: &'static str },

    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read an SDSS-style spectrum: primary HDU plus a binary table in HDU 1
/// holding `flux` (required) and `model` (optional).
pub fn read_spectrum(path: &Path) -> Result<SpectrumRecord, SpectrumError> {
    if !path.exists() {
        return Err(SpectrumError::NotFound(path.to_path_buf()));
    }

    let mut fptr = FitsFile::open(path)?;
    let primary = fptr.primary_hdu()?;
    let table = fptr.hdu(1).map_err(|_| SpectrumError::Structure {
        path: path.to_path_buf(),
        reason: "expected at least 2 HDUs (primary + table)".to_string(),
    })?;

    let columns: Vec<String> = match &table.info {
        HduInfo::TableInfo {
            column_descriptions,
            ..
        } => column_descriptions.iter().map(|c| c.name.clone()).collect(),
        _ => {
            return Err(SpectrumError::Structure {
                path: path.to_path_buf(),
                reason: "HDU 1 is not a table".to_string(),
            })
        }
    };
    let find = |wanted: &str| columns.iter().find(|c| c.eq_ignore_ascii_case(wanted));

    let flux_name = find(FLUX_COLUMN).ok_or_else(|| SpectrumError::ColumnNotFound {
        path: path.to_path_buf(),
        column: FLUX_COLUMN,
    })?;
    let flux: Vec<f64> = table.read_col(&mut fptr, flux_name)?;

    let model_flux = match find(MODEL_COLUMN) {
        Some(name) => match table.read_col::<f64>(&mut fptr, name) {
            Ok(values) => Some(values),
            Err(e) => {
                log::warn!("ignoring unreadable '{name}' column: {e}");
                None
            }
        },
        None => None,
    };

    let hdus = [&table, &primary];
    let wavelength_start_log = header_f64(&mut fptr, &hdus, "CRVAL1");
    let wavelength_step_log = header_step(&mut fptr, &hdus);

    if wavelength_start_log.is_none() || wavelength_step_log.is_none() {
        log::warn!(
            "{}: CRVAL1 and CD1_1/CDELT1 not both present, plotting against pixel index",
            path.display()
        );
    }

    Ok(SpectrumRecord {
        flux,
        model_flux,
        wavelength_start_log,
        wavelength_step_log,
        object_name: header_text(&mut fptr, &hdus, "OBJECT"),
        plate: header_text(&mut fptr, &hdus, "PLATEID"),
        mjd: header_text(&mut fptr, &hdus, "MJD"),
        fiber: header_text(&mut fptr, &hdus, "FIBERID"),
        source: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write `record` in the layout [`read_spectrum`] expects: identification
/// keys in the primary header, a `COADD` table with `flux` (and `model`)
/// whose header carries the wavelength solution. Overwrites `path`.
pub fn write_spectrum(path: &Path, record: &SpectrumRecord) -> Result<(), SpectrumError> {
    let mut fptr = FitsFile::create(path).overwrite().open()?;

    let primary = fptr.primary_hdu()?;
    let keys = [
        ("OBJECT", &record.object_name),
        ("PLATEID", &record.plate),
        ("MJD", &record.mjd),
        ("FIBERID", &record.fiber),
    ];
    for (key, value) in keys {
        let Some(value) = value else { continue };
        match value.parse::<i64>() {
            Ok(n) => primary.write_key(&mut fptr, key, n)?,
            Err(_) => primary.write_key(&mut fptr, key, value.as_str())?,
        }
    }

    let mut columns = vec![ColumnDescription::new(FLUX_COLUMN)
        .with_type(ColumnDataType::Double)
        .create()?];
    if record.model_flux.is_some() {
        columns.push(
            ColumnDescription::new(MODEL_COLUMN)
                .with_type(ColumnDataType::Double)
                .create()?,
        );
    }

    let table = fptr.create_table("COADD", &columns)?;
    table.write_col(&mut fptr, FLUX_COLUMN, &record.flux)?;
    if let Some(model) = &record.model_flux {
        table.write_col(&mut fptr, MODEL_COLUMN, model)?;
    }
    if let Some(start) = record.wavelength_start_log {
        table.write_key(&mut fptr, "CRVAL1", start)?;
    }
    if let Some(step) = record.wavelength_step_log {
        table.write_key(&mut fptr, "CD1_1", step)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Header lookup: table header first, then primary
// ---------------------------------------------------------------------------

fn header_f64(fptr: &mut FitsFile, hdus: &[&FitsHdu], key: &str) -> Option<f64> {
    hdus.iter()
        .find_map(|hdu| hdu.read_key::<f64>(fptr, key).ok())
}

/// `CD1_1` over `CDELT1`, but only within one HDU: a table `CDELT1` wins over
/// a primary `CD1_1`.
fn header_step(fptr: &mut FitsFile, hdus: &[&FitsHdu]) -> Option<f64> {
    hdus.iter().find_map(|hdu| {
        hdu.read_key::<f64>(fptr, "CD1_1")
            .or_else(|_| hdu.read_key::<f64>(fptr, "CDELT1"))
            .ok()
    })
}

fn header_text(fptr: &mut FitsFile, hdus: &[&FitsHdu], key: &str) -> Option<String> {
    hdus.iter().find_map(|hdu| {
        hdu.read_key::<i64>(fptr, key)
            .map(|v| v.to_string())
            .or_else(|_| hdu.read_key::<String>(fptr, key))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}
