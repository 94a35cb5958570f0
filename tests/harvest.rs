//! End-to-end runs of the download loop against a fake fetcher.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sdss_harvest::config::HarvestConfig;
use sdss_harvest::data::loader::load_catalog;
use sdss_harvest::data::model::CatalogRow;
use sdss_harvest::fetch::Fetcher;
use sdss_harvest::harvest::{Harvester, RowOutcome, StepOutcome};

/// Records every request; writes the file when `accept` says the URL works.
struct FakeFetcher {
    accept: Box<dyn Fn(&str) -> bool>,
    calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn new(accept: impl Fn(&str) -> bool + 'static) -> Self {
        Self {
            accept: Box::new(accept),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> bool {
        self.calls.borrow_mut().push(url.to_string());
        if !(self.accept)(url) {
            return false;
        }
        std::fs::create_dir_all(destination.parent().unwrap()).unwrap();
        std::fs::write(destination, url).unwrap();
        true
    }
}

fn config(dir: &Path) -> HarvestConfig {
    HarvestConfig {
        input_path: dir.join("objects.csv"),
        image_root: dir.join("images"),
        spectrum_root: dir.join("spectra"),
        success_delay_ms: 0,
        failure_delay_ms: 0,
        ..HarvestConfig::default()
    }
}

fn row(id: i64, subclass: &str) -> CatalogRow {
    CatalogRow {
        id,
        ra: 10.5,
        dec: 20.1,
        class_label: subclass.to_string(),
        plate: Some(266),
        mjd: Some(51602),
        fiber: Some(id),
    }
}

fn is_spectrum(url: &str) -> bool {
    url.contains("/spectro/redux/")
}

#[test]
fn example_row_is_filed_under_its_subclass() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|_| true);
    let harvester = Harvester::new(config(dir.path()), &fetcher);

    let outcome = harvester.process_row(&row(1, "M4"));

    assert_eq!(
        outcome,
        RowOutcome::Done {
            spectrum: StepOutcome::Downloaded { candidate: 0 },
            image: StepOutcome::Downloaded { candidate: 0 },
        }
    );
    assert!(dir.path().join("spectra/M4/spec-0266-51602-0001.fits").is_file());
    assert!(dir.path().join("images/M4/1_image.jpg").is_file());
}

#[test]
fn spectrum_candidates_tried_in_order_until_one_works() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|url| !is_spectrum(url) || url.contains("/sdss/spectro/redux/26/"));
    let harvester = Harvester::new(
        HarvestConfig {
            download_images: false,
            ..config(dir.path())
        },
        &fetcher,
    );

    let outcome = harvester.process_row(&row(1, "M4"));

    assert_eq!(
        outcome,
        RowOutcome::Done {
            spectrum: StepOutcome::Downloaded { candidate: 2 },
            image: StepOutcome::Disabled,
        }
    );
    let surveys: Vec<String> = fetcher
        .calls()
        .iter()
        .map(|url| url.split("/spectro/").next().unwrap().rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(surveys, vec!["eboss", "boss", "sdss"]);
}

#[test]
fn failed_spectrum_suppresses_image() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|url| !is_spectrum(url));
    let harvester = Harvester::new(config(dir.path()), &fetcher);

    let outcome = harvester.process_row(&row(1, "M4"));

    assert_eq!(
        outcome,
        RowOutcome::Done {
            spectrum: StepOutcome::Failed,
            image: StepOutcome::Skipped,
        }
    );
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|url| is_spectrum(url)));
    assert!(!dir.path().join("images").join("M4").exists());
}

#[test]
fn images_fetched_unconditionally_without_spectra() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|_| true);
    let harvester = Harvester::new(
        HarvestConfig {
            download_spectra: false,
            ..config(dir.path())
        },
        &fetcher,
    );
    let mut no_exposure = row(2, "K7");
    no_exposure.plate = None;

    let summary = harvester.run(&[row(1, "M4"), no_exposure]);

    assert_eq!(summary.images_downloaded, 2);
    assert_eq!(summary.rows_skipped, 0);
    assert!(fetcher.calls().iter().all(|url| !is_spectrum(url)));
}

#[test]
fn invalid_subclass_goes_to_unknown_for_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|_| true);
    let harvester = Harvester::new(config(dir.path()), &fetcher);

    harvester.run(&[row(1, "M4V"), row(2, "Unknown")]);

    let unknown_spectra = dir.path().join("spectra/Unknown");
    let unknown_images = dir.path().join("images/Unknown");
    assert!(unknown_spectra.join("spec-0266-51602-0001.fits").is_file());
    assert!(unknown_spectra.join("spec-0266-51602-0002.fits").is_file());
    assert!(unknown_images.join("1_image.jpg").is_file());
    assert!(unknown_images.join("2_image.jpg").is_file());
    assert!(!dir.path().join("spectra/M4V").exists());
}

#[test]
fn bad_exposure_skips_only_that_row() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|_| true);
    let harvester = Harvester::new(config(dir.path()), &fetcher);
    let mut bad = row(1, "M4");
    bad.mjd = None;

    let summary = harvester.run(&[bad, row(2, "M4")]);

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.spectra_downloaded, 1);
    assert_eq!(summary.images_downloaded, 1);
    assert_eq!(fetcher.calls().len(), 2);
}

#[test]
fn second_run_makes_no_requests() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    std::fs::write(
        &cfg.input_path,
        "name,ra,dec,subclass,plate,mjd,fiberID\n\
         1,10.5,20.1,M4,266,51602,1\n\
         2,11.0,21.0,,266,51602,2\n\
         3,12.0,22.0,M1,1000,52000,640\n",
    )
    .unwrap();
    let rows = load_catalog(&cfg.input_path, true).unwrap();

    let first = FakeFetcher::new(|_| true);
    let summary = Harvester::new(cfg.clone(), &first).run(&rows);
    assert_eq!(summary.spectra_downloaded, 3);
    assert_eq!(summary.images_downloaded, 3);
    assert_eq!(first.calls().len(), 6);

    let second = FakeFetcher::new(|_| true);
    let summary = Harvester::new(cfg, &second).run(&rows);
    assert_eq!(second.calls(), Vec::<String>::new());
    assert_eq!(summary.spectra_existing, 3);
    assert_eq!(summary.images_existing, 3);
}

#[test]
fn failed_image_leaves_spectrum_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(is_spectrum);
    let harvester = Harvester::new(config(dir.path()), &fetcher);

    let outcome = harvester.process_row(&row(5, "M0"));

    assert_eq!(
        outcome,
        RowOutcome::Done {
            spectrum: StepOutcome::Downloaded { candidate: 0 },
            image: StepOutcome::Failed,
        }
    );
    let spectrum: PathBuf = dir.path().join("spectra/M0/spec-0266-51602-0005.fits");
    assert!(spectrum.is_file());
}

#[test]
fn prepare_output_creates_enabled_roots_only() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::new(|_| true);
    let harvester = Harvester::new(
        HarvestConfig {
            download_images: false,
            ..config(dir.path())
        },
        &fetcher,
    );

    harvester.prepare_output().unwrap();

    assert!(dir.path().join("spectra").is_dir());
    assert!(!dir.path().join("images").exists());
}
