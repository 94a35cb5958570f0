use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};

use crate::state::ViewerState;

const FLUX_COLOR: Color32 = Color32::from_rgb(65, 105, 225);
const MODEL_COLOR: Color32 = Color32::from_rgb(220, 40, 40);

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render flux (and the model fit, if shown) against the x-axis.
pub fn spectrum_plot(ui: &mut Ui, state: &ViewerState) {
    let (spectrum, axis) = match (&state.spectrum, &state.axis) {
        (Some(sp), Some(axis)) => (sp, axis),
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a FITS spectrum to view it  (File → Open…)");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(spectrum.title());
        ui.label(spectrum.file_name());
    });

    let x = axis.values();

    Plot::new("spectrum_plot")
        .legend(Legend::default())
        .x_axis_label(axis.label())
        .y_axis_label("Flux")
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let flux_points: PlotPoints = x
                .iter()
                .zip(&spectrum.flux)
                .map(|(&xi, &yi)| [xi, yi])
                .collect();
            plot_ui.line(
                Line::new(flux_points)
                    .name("Flux")
                    .color(FLUX_COLOR)
                    .width(1.0),
            );

            if state.show_model() {
                if let Some(model) = &spectrum.model_flux {
                    let model_points: PlotPoints =
                        x.iter().zip(model).map(|(&xi, &yi)| [xi, yi]).collect();
                    plot_ui.line(
                        Line::new(model_points)
                            .name("Model Fit")
                            .color(MODEL_COLOR)
                            .style(LineStyle::dashed_loose())
                            .width(1.0),
                    );
                }
            }
        });
}
