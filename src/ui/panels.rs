use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::spectrum::read_spectrum;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – header summary
// ---------------------------------------------------------------------------

/// Render the left info panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Spectrum");
    ui.separator();

    let Some(sp) = &state.spectrum else {
        ui.label("No spectrum loaded.");
        return;
    };

    let na = "N/A";
    egui::Grid::new("header_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            let mut row = |key: &str, value: &str| {
                ui.strong(key);
                ui.label(value);
                ui.end_row();
            };
            row("Object", sp.object_name.as_deref().unwrap_or("Unknown Object"));
            row("Plate", sp.plate.as_deref().unwrap_or(na));
            row("MJD", sp.mjd.as_deref().unwrap_or(na));
            row("Fiber", sp.fiber.as_deref().unwrap_or(na));
            row("Pixels", &sp.flux.len().to_string());
            row("Model", if sp.model_flux.is_some() { "yes" } else { "no" });
            if let Some((lo, hi)) = state.axis_range() {
                row("Range", &format!("{lo:.1} – {hi:.1}"));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.has_model()
            && ui
                .selectable_label(state.show_model(), "Model Fit")
                .clicked()
        {
            state.hide_model = !state.hide_model;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask the operator for a spectrum file. `None` if the dialog was cancelled.
pub fn pick_spectrum_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select FITS Spectrum File")
        .add_filter("FITS Files", &["fits", "fit"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

pub fn open_file_dialog(state: &mut ViewerState) {
    if let Some(path) = pick_spectrum_file() {
        match read_spectrum(&path) {
            Ok(spectrum) => {
                log::info!(
                    "Loaded {} ({} pixels)",
                    path.display(),
                    spectrum.flux.len()
                );
                state.set_spectrum(spectrum);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
