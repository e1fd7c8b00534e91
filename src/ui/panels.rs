use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::{Colormap, COLORMAP_NAMES};
use crate::state::ViewerState;

/// Clip percentile offered when clipping is first switched on.
const DEFAULT_CLIP: f64 = 2.0;

// ---------------------------------------------------------------------------
// Left side panel – display controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Display");
    ui.separator();

    let (shape, dtype) = match &state.display {
        Some(grid) => (grid.shape().to_vec(), grid.dtype()),
        None => {
            ui.label("No grid loaded.");
            return;
        }
    };

    if let Some(source) = &state.source {
        ui.label(format!("input  {} {:?}", source.dtype(), source.shape()));
    }
    ui.label(format!("shown  {dtype} {shape:?}"));
    ui.separator();

    // ---- Colormap selector (single channel only) ----
    ui.strong("Colormap");
    if shape.len() == 2 {
        let current = state.options.colormap.clone();
        let mut chosen = None;
        egui::ComboBox::from_id_salt("colormap")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for name in COLORMAP_NAMES {
                    if ui.selectable_label(current == *name, *name).clicked() {
                        chosen = Some(*name);
                    }
                }
            });
        if let Some(name) = chosen {
            state.set_colormap(name);
        }
        if let Some(cmap) = &state.colormap {
            colorbar(ui, cmap);
        }
    } else {
        ui.label("Colour image, colormap not used.");
    }
    ui.separator();

    // ---- Percentile clip ----
    ui.strong("Percentile clip");
    if state.source.is_none() {
        ui.label("Grid is already normalized, nothing to re-clip.");
        return;
    }
    let mut enabled = state.options.clip_percentile.is_some_and(|p| p > 0.0);
    let mut percentile = state
        .options
        .clip_percentile
        .filter(|p| *p > 0.0 && *p < 50.0)
        .unwrap_or(DEFAULT_CLIP);

    let mut changed = ui.checkbox(&mut enabled, "Clip outliers").changed();
    ui.add_enabled_ui(enabled, |ui: &mut Ui| {
        changed |= ui
            .add(egui::Slider::new(&mut percentile, 0.1..=49.9).suffix(" %"))
            .changed();
    });
    if changed {
        state.set_clip(enabled.then_some(percentile));
    }
}

/// Horizontal strip of the colormap from 0 to 255.
fn colorbar(ui: &mut Ui, cmap: &Colormap) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 14.0),
        egui::Sense::hover(),
    );
    let entries = cmap.entries();
    let step = rect.width() / entries.len() as f32;
    for (i, color) in entries.iter().enumerate() {
        let min = egui::pos2(rect.left() + i as f32 * step, rect.top());
        // overlap by half a pixel so no seams show between strips
        let strip = egui::Rect::from_min_size(min, egui::vec2(step + 0.5, rect.height()));
        ui.painter().rect_filled(strip, 0.0, *color);
    }
    ui.horizontal(|ui: &mut Ui| {
        ui.small("0");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.small("255");
        });
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

        if !state.options.title.is_empty() {
            ui.label(&state.options.title);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom bar
// ---------------------------------------------------------------------------

pub fn readout_bar(ui: &mut Ui, state: &ViewerState) {
    match &state.hover_label {
        Some(label) => ui.monospace(label),
        None => ui.weak("Hover over the image to read values"),
    };
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open array or image")
        .add_filter(
            "Supported files",
            &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "npy", "json", "csv"],
        )
        .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"])
        .add_filter("NumPy", &["npy"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
