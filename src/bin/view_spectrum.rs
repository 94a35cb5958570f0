use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use sdss_harvest::app::SpectrumViewerApp;
use sdss_harvest::spectrum::read_spectrum;
use sdss_harvest::state::ViewerState;
use sdss_harvest::ui::panels::pick_spectrum_file;

#[derive(Parser)]
#[command(name = "view-spectrum")]
#[command(about = "Plot flux against wavelength for one SDSS spectrum file", long_about = None)]
struct Cli {
    /// FITS file to open; a file dialog is shown when omitted.
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let path = match cli.path {
        Some(path) => path,
        None => {
            log::info!("Please select a .fits spectrum file to visualize...");
            match pick_spectrum_file() {
                Some(path) => path,
                None => {
                    log::info!("No file selected.");
                    return Ok(());
                }
            }
        }
    };

    let spectrum = match read_spectrum(&path) {
        Ok(spectrum) => spectrum,
        Err(e) => {
            log::error!("{e}");
            return Ok(());
        }
    };
    log::info!("Successfully opened FITS file: {}", path.display());

    let window_title = format!("{} – {}", spectrum.title(), spectrum.file_name());
    let state = ViewerState::with_spectrum(spectrum);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // Blocks until the window is closed.
    eframe::run_native(
        &window_title,
        options,
        Box::new(|_cc| Ok(Box::new(SpectrumViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))
}
