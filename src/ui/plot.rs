use eframe::egui::{TextureHandle, Ui, Vec2};
use egui_plot::{Plot, PlotImage, PlotPoint};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Image plot (central panel)
// ---------------------------------------------------------------------------

/// Render the display grid in the central panel.
///
/// The image spans `[0, width] x [0, height]` in plot units, one unit per
/// sample, with row 0 at the top.
pub fn grid_plot(ui: &mut Ui, state: &mut ViewerState, texture: Option<&TextureHandle>) {
    let (Some(display), Some(texture)) = (&state.display, texture) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view it  (File → Open…)");
        });
        return;
    };

    let height = display.shape()[0] as f64;
    let width = display.shape()[1] as f64;

    if !state.options.title.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(&state.options.title);
        });
    }

    let response = Plot::new("grid_plot")
        .data_aspect(1.0)
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(
                texture.id(),
                PlotPoint::new(width / 2.0, height / 2.0),
                Vec2::new(width as f32, height as f32),
            ));
            plot_ui.pointer_coordinate()
        });

    let label = response.inner.and_then(|point| {
        let col = point.x.floor();
        let row = (height - point.y).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        state.sample_label(row as usize, col as usize)
    });
    state.hover_label = label;
}
