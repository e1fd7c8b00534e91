use eframe::egui::{self, Color32, ColorImage};

use crate::app::QuicklookApp;
use crate::color::{to_byte, Colormap};
use crate::data::model::NumericGrid;
use crate::error::{Error, Result};
use crate::options::DisplayOptions;
use crate::state::ViewerState;

/// Extra window width for the controls next to the image.
const SIDE_PANEL_WIDTH: f32 = 220.0;

const DEFAULT_WINDOW_TITLE: &str = "quicklook";

/// Draws a display-ready grid: 2D, or 3D with three channels last, values in
/// `0..=255`.
pub trait Renderer {
    fn render(&mut self, grid: &NumericGrid, options: &DisplayOptions) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Grid → pixels
// ---------------------------------------------------------------------------

/// Convert a display-ready grid to an RGBA image.
///
/// Single-channel grids go through `colormap`; three-channel grids are drawn
/// as RGB and the colormap is not consulted.
pub fn grid_to_color_image(grid: &NumericGrid, colormap: Option<&Colormap>) -> Result<ColorImage> {
    let pixels: Vec<Color32> = match *grid.shape() {
        [_, _] => {
            let cmap = colormap.ok_or_else(|| {
                Error::Shape("a single-channel grid needs a colormap".to_string())
            })?;
            grid.values().iter().map(|&v| cmap.color_for(v)).collect()
        }
        [_, _, 3] => {
            let bytes: Vec<u8> = grid.values().iter().map(|&v| to_byte(v)).collect();
            bytes
                .chunks_exact(3)
                .map(|px| Color32::from_rgb(px[0], px[1], px[2]))
                .collect()
        }
        ref other => {
            return Err(Error::Shape(format!(
                "cannot draw shape {other:?}: expected (H, W) or (H, W, 3)"
            )))
        }
    };

    let size = [grid.shape()[1], grid.shape()[0]];
    let rgba: Vec<u8> = pixels.iter().flat_map(|c| c.to_array()).collect();
    Ok(ColorImage::from_rgba_unmultiplied(size, &rgba))
}

/// Colormap the grid will be drawn with; `None` for colour grids.
pub fn colormap_for(grid: &NumericGrid, options: &DisplayOptions) -> Result<Option<Colormap>> {
    if grid.ndim() == 2 {
        Colormap::from_name(&options.colormap).map(Some)
    } else {
        Ok(None)
    }
}

pub fn window_title(options: &DisplayOptions) -> String {
    if options.title.is_empty() {
        DEFAULT_WINDOW_TITLE.to_string()
    } else {
        options.title.clone()
    }
}

// ---------------------------------------------------------------------------
// Window renderer
// ---------------------------------------------------------------------------

/// Shows a display-ready grid in a native window and blocks until it is
/// closed.
///
/// Only the normalized grid reaches a renderer, so the window's clip control
/// has nothing to re-run; [`crate::show`] opens the window on the raw grid
/// instead.
#[derive(Debug, Default)]
pub struct WindowRenderer;

impl Renderer for WindowRenderer {
    fn render(&mut self, grid: &NumericGrid, options: &DisplayOptions) -> Result<()> {
        let mut state = ViewerState::new(options.clone());
        // Validates the colormap before any window exists.
        state.set_display(grid.clone())?;
        run_window(state)
    }
}

/// Open the viewer window on a prepared state.
pub fn run_window(state: ViewerState) -> Result<()> {
    let title = window_title(&state.options);
    let [width, height] = state.options.window_size();

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([width + SIDE_PANEL_WIDTH, height])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    log::debug!("Opening {width}x{height} window '{title}'");
    eframe::run_native(
        &title,
        native,
        Box::new(move |_cc| Ok(Box::new(QuicklookApp::new(state)))),
    )
    .map_err(|e| {
        log::error!("Display failed: {e}");
        Error::Display(e.to_string())
    })
}
