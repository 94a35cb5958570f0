use std::fmt;
use std::thread;

use anyhow::{Context, Result};

use crate::config::HarvestConfig;
use crate::data::model::{ArtifactKind, CatalogRow, DownloadTarget};
use crate::data::target::{image_target, resolve_bucket, spectrum_target, SPECTRUM_SOURCES};
use crate::fetch::Fetcher;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one artifact of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Downloads of this kind are switched off.
    Disabled,
    /// Destination was already on disk; no request made.
    Existing,
    /// Saved from the candidate URL at this index.
    Downloaded { candidate: usize },
    /// Every candidate URL failed.
    Failed,
    /// Not attempted because the spectrum step did not succeed.
    Skipped,
}

impl StepOutcome {
    fn succeeded(&self) -> bool {
        matches!(self, StepOutcome::Existing | StepOutcome::Downloaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Plate/MJD/fiber could not be read as integers.
    InvalidExposure,
    Done {
        spectrum: StepOutcome,
        image: StepOutcome,
    },
}

/// Tallies for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub rows: usize,
    pub rows_skipped: usize,
    pub spectra_downloaded: usize,
    pub spectra_existing: usize,
    pub spectra_failed: usize,
    pub images_downloaded: usize,
    pub images_existing: usize,
    pub images_failed: usize,
    pub images_skipped: usize,
}

impl HarvestSummary {
    fn record(&mut self, outcome: &RowOutcome) {
        self.rows += 1;
        let (spectrum, image) = match outcome {
            RowOutcome::InvalidExposure => {
                self.rows_skipped += 1;
                return;
            }
            RowOutcome::Done { spectrum, image } => (spectrum, image),
        };
        match spectrum {
            StepOutcome::Downloaded { .. } => self.spectra_downloaded += 1,
            StepOutcome::Existing => self.spectra_existing += 1,
            StepOutcome::Failed => self.spectra_failed += 1,
            StepOutcome::Disabled | StepOutcome::Skipped => {}
        }
        match image {
            StepOutcome::Downloaded { .. } => self.images_downloaded += 1,
            StepOutcome::Existing => self.images_existing += 1,
            StepOutcome::Failed => self.images_failed += 1,
            StepOutcome::Skipped => self.images_skipped += 1,
            StepOutcome::Disabled => {}
        }
    }
}

impl fmt::Display for HarvestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows ({} skipped); spectra: {} downloaded, {} existing, {} failed; \
             images: {} downloaded, {} existing, {} failed, {} skipped",
            self.rows,
            self.rows_skipped,
            self.spectra_downloaded,
            self.spectra_existing,
            self.spectra_failed,
            self.images_downloaded,
            self.images_existing,
            self.images_failed,
            self.images_skipped
        )
    }
}

// ---------------------------------------------------------------------------
// Harvester
// ---------------------------------------------------------------------------

/// Walks the catalog, spectrum first, then the image if the spectrum is
/// available (or spectra are switched off).
pub struct Harvester<F> {
    config: HarvestConfig,
    fetcher: F,
}

impl<F: Fetcher> Harvester<F> {
    pub fn new(config: HarvestConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Create the output roots for the enabled artifact kinds.
    pub fn prepare_output(&self) -> Result<()> {
        let roots = [
            (self.config.download_images, &self.config.image_root),
            (self.config.download_spectra, &self.config.spectrum_root),
        ];
        for (enabled, root) in roots {
            if enabled {
                std::fs::create_dir_all(root)
                    .with_context(|| format!("creating output folder {}", root.display()))?;
            }
        }
        Ok(())
    }

    pub fn run(&self, rows: &[CatalogRow]) -> HarvestSummary {
        let mut summary = HarvestSummary::default();
        for (i, row) in rows.iter().enumerate() {
            log::info!(
                "Processing {}/{}: name={}, ra={}, dec={}, subclass={}",
                i + 1,
                rows.len(),
                row.id,
                row.ra,
                row.dec,
                row.class_label
            );
            let outcome = self.process_row(row);
            summary.record(&outcome);
        }
        summary
    }

    pub fn process_row(&self, row: &CatalogRow) -> RowOutcome {
        let bucket = resolve_bucket(&row.class_label);

        let spectrum = if self.config.download_spectra {
            let Some(exposure) = row.exposure() else {
                log::error!(
                    "plate/mjd/fiberID of {} are not integers, skipping this object",
                    row.id
                );
                return RowOutcome::InvalidExposure;
            };
            let target = spectrum_target(&self.config, &bucket, &exposure);
            let outcome = self.acquire(&target);
            match outcome {
                StepOutcome::Downloaded { .. } => thread::sleep(self.config.success_delay()),
                StepOutcome::Failed => {
                    log::warn!(
                        "no archive location had spectrum {} ({exposure})",
                        target.destination.display()
                    );
                    thread::sleep(self.config.failure_delay());
                }
                _ => {}
            }
            outcome
        } else {
            StepOutcome::Disabled
        };

        let image = if !self.config.download_images {
            StepOutcome::Disabled
        } else if self.config.download_spectra && !spectrum.succeeded() {
            log::warn!("spectrum unavailable for {}, skipping image", row.id);
            StepOutcome::Skipped
        } else {
            let target = image_target(&self.config, &bucket, row);
            let outcome = self.acquire(&target);
            if let StepOutcome::Downloaded { .. } = outcome {
                thread::sleep(self.config.success_delay());
            }
            outcome
        };

        RowOutcome::Done { spectrum, image }
    }

    /// Skip if present, otherwise try each candidate until one succeeds.
    fn acquire(&self, target: &DownloadTarget) -> StepOutcome {
        if target.already_exists {
            log::info!(
                "{} already exists, skipping: {}",
                target.kind,
                target.destination.display()
            );
            return StepOutcome::Existing;
        }

        for (candidate, url) in target.candidate_urls.iter().enumerate() {
            match target.kind {
                ArtifactKind::Spectrum => {
                    let source = SPECTRUM_SOURCES.get(candidate).map_or("?", |s| s.label);
                    log::info!("trying spectrum ({source} path): {url}");
                }
                ArtifactKind::Image => log::info!("trying image: {url}"),
            }
            if self.fetcher.fetch(url, &target.destination) {
                return StepOutcome::Downloaded { candidate };
            }
        }
        StepOutcome::Failed
    }
}
