use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{CatalogRow, UNKNOWN_LABEL};

// ---------------------------------------------------------------------------
// Column names (SDSS CasJobs export)
// ---------------------------------------------------------------------------

pub const ID_COLUMN: &str = "name";
pub const RA_COLUMN: &str = "ra";
pub const DEC_COLUMN: &str = "dec";
pub const CLASS_COLUMN: &str = "subclass";
pub const PLATE_COLUMN: &str = "plate";
pub const MJD_COLUMN: &str = "mjd";
pub const FIBER_COLUMN: &str = "fiberID";

const BASE_COLUMNS: [&str; 4] = [ID_COLUMN, RA_COLUMN, DEC_COLUMN, CLASS_COLUMN];
const EXPOSURE_COLUMNS: [&str; 3] = [PLATE_COLUMN, MJD_COLUMN, FIBER_COLUMN];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    MissingFile(PathBuf),

    #[error("catalog is missing required column(s) {missing:?}; found {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("line {line}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("reading catalog: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the object catalog.
///
/// `require_exposure` adds `plate`, `mjd` and `fiberID` to the required
/// columns; it should be set whenever spectra will be downloaded. Cells in
/// those columns that are not integers load as `None` rather than failing,
/// so a single bad row does not sink the whole run.
pub fn load_catalog(path: &Path, require_exposure: bool) -> Result<Vec<CatalogRow>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::MissingFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut required: Vec<&str> = BASE_COLUMNS.to_vec();
    if require_exposure {
        required.extend(EXPOSURE_COLUMNS);
    }
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns {
            missing,
            found: headers,
        });
    }

    let index_of = |col: &str| headers.iter().position(|h| h == col);
    // Required columns were checked above.
    let id_idx = index_of(ID_COLUMN).unwrap_or_default();
    let ra_idx = index_of(RA_COLUMN).unwrap_or_default();
    let dec_idx = index_of(DEC_COLUMN).unwrap_or_default();
    let class_idx = index_of(CLASS_COLUMN).unwrap_or_default();
    let plate_idx = index_of(PLATE_COLUMN);
    let mjd_idx = index_of(MJD_COLUMN);
    let fiber_idx = index_of(FIBER_COLUMN);

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let id = parse_required(cell(id_idx), line, ID_COLUMN, parse_integer)?;
        let ra = parse_required(cell(ra_idx), line, RA_COLUMN, |s| s.parse::<f64>().ok())?;
        let dec = parse_required(cell(dec_idx), line, DEC_COLUMN, |s| s.parse::<f64>().ok())?;

        let class_label = match cell(class_idx) {
            "" => UNKNOWN_LABEL.to_string(),
            label => label.to_string(),
        };

        let optional = |idx: Option<usize>| idx.and_then(|i| parse_integer(cell(i)));

        rows.push(CatalogRow {
            id,
            ra,
            dec,
            class_label,
            plate: optional(plate_idx),
            mjd: optional(mjd_idx),
            fiber: optional(fiber_idx),
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn parse_required<T>(
    s: &str,
    line: u64,
    column: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, CatalogError> {
    parse(s).ok_or_else(|| CatalogError::InvalidValue {
        line,
        column,
        value: s.to_string(),
    })
}

/// Accepts `266` as well as spreadsheet-style `266.0`. The zero fraction is
/// stripped as text: object ids exceed 2^53 and must not pass through `f64`.
fn parse_integer(s: &str) -> Option<i64> {
    let digits = match s.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => s,
    };
    digits.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_order() {
        let file = write_csv(
            "name,ra,dec,subclass,plate,mjd,fiberID\n\
             123,10.5,20.1,M4,266,51602,1\n\
             456,11.25,-3.5,K7,1000,52000,640\n",
        );
        let rows = load_catalog(file.path(), true).unwrap();
        assert_eq!(
            rows,
            vec![
                CatalogRow {
                    id: 123,
                    ra: 10.5,
                    dec: 20.1,
                    class_label: "M4".to_string(),
                    plate: Some(266),
                    mjd: Some(51602),
                    fiber: Some(1),
                },
                CatalogRow {
                    id: 456,
                    ra: 11.25,
                    dec: -3.5,
                    class_label: "K7".to_string(),
                    plate: Some(1000),
                    mjd: Some(52000),
                    fiber: Some(640),
                },
            ]
        );
    }

    #[test]
    fn blank_subclass_becomes_unknown() {
        let file = write_csv("name,ra,dec,subclass\n1,0.0,0.0,\n2,1.0,1.0,   \n");
        let rows = load_catalog(file.path(), false).unwrap();
        assert!(rows.iter().all(|r| r.class_label == UNKNOWN_LABEL));
    }

    #[test]
    fn subclass_is_trimmed() {
        let file = write_csv("name,ra,dec,subclass\n1,0.0,0.0, M2 \n");
        let rows = load_catalog(file.path(), false).unwrap();
        assert_eq!(rows[0].class_label, "M2");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_catalog(Path::new("/no/such/objects.csv"), false).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile(_)));
    }

    #[test]
    fn missing_columns_are_named() {
        let file = write_csv("name,ra,subclass,plate\n1,0.0,M1,266\n");
        let err = load_catalog(file.path(), true).unwrap_err();
        match err {
            CatalogError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["dec", "mjd", "fiberID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exposure_columns_optional_without_spectra() {
        let file = write_csv("name,ra,dec,subclass\n7,1.5,2.5,M0\n");
        let rows = load_catalog(file.path(), false).unwrap();
        assert_eq!(rows[0].exposure(), None);
    }

    #[test]
    fn non_integer_exposure_loads_as_none() {
        let file = write_csv(
            "name,ra,dec,subclass,plate,mjd,fiberID\n\
             1,0.0,0.0,M1,abc,51602,1\n\
             2,0.0,0.0,M1,266.0,51602.0,12\n",
        );
        let rows = load_catalog(file.path(), true).unwrap();
        assert_eq!(rows[0].plate, None);
        assert_eq!(rows[0].exposure(), None);
        assert_eq!(rows[1].plate, Some(266));
        assert!(rows[1].exposure().is_some());
    }

    #[test]
    fn invalid_ra_aborts_load() {
        let file = write_csv("name,ra,dec,subclass\n1,north,0.0,M1\n");
        let err = load_catalog(file.path(), false).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidValue { column: RA_COLUMN, line: 2, .. }
        ));
    }

    #[test]
    fn parse_integer_rejects_fractions() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("42.0"), Some(42));
        assert_eq!(parse_integer("42.5"), None);
        assert_eq!(parse_integer("4.2e1"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("."), None);
    }

    #[test]
    fn large_object_ids_keep_every_digit() {
        assert_eq!(
            parse_integer("1237648720693755918.0"),
            Some(1237648720693755918)
        );
        assert_eq!(
            parse_integer("1237648720693755918"),
            Some(1237648720693755918)
        );
        assert_eq!(parse_integer("1237648720693755918.5"), None);

        let file = write_csv("name,ra,dec,subclass
1237648720693755918.00,145.3,-0.8,M4
");
        let rows = load_catalog(file.path(), false).unwrap();
        assert_eq!(rows[0].id, 1237648720693755918);
    }

    #[test]
    fn fractional_id_aborts_load() {
        let file = write_csv("name,ra,dec,subclass
1237648720693755918.5,145.3,-0.8,M4
");
        let err = load_catalog(file.path(), false).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidValue { column: ID_COLUMN, .. }
        ));
    }
}
