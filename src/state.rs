use std::path::Path;

use eframe::egui::ColorImage;

use crate::color::Colormap;
use crate::data::loader::load_file;
use crate::data::model::NumericGrid;
use crate::error::Result;
use crate::options::DisplayOptions;
use crate::pipeline::normalize_grid;
use crate::render::{colormap_for, grid_to_color_image};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Grid as handed to the viewer, re-normalized when options change.
    pub source: Option<NumericGrid>,

    /// Display-ready grid currently shown.
    pub display: Option<NumericGrid>,

    pub options: DisplayOptions,

    /// Active colormap (`None` for colour grids).
    pub colormap: Option<Colormap>,

    /// Image waiting to be uploaded as a texture.
    pub pending_image: Option<ColorImage>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Sample under the pointer, if any.
    pub hover_label: Option<String>,
}

impl ViewerState {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            source: None,
            display: None,
            options,
            colormap: None,
            pending_image: None,
            status_message: None,
            hover_label: None,
        }
    }

    /// State for a raw grid, normalized with `options`.
    ///
    /// The raw grid is kept as the source, so clip changes start from the
    /// original samples. Pipeline and colormap errors are returned, not
    /// shown in the status line.
    pub fn with_source(grid: NumericGrid, options: DisplayOptions) -> Result<Self> {
        let mut state = Self::new(options);
        let display = normalize_grid(grid.clone(), &state.options)?;
        state.rebuild_image(&display)?;
        state.source = Some(grid);
        state.display = Some(display);
        Ok(state)
    }

    /// Show an already display-ready grid.
    ///
    /// There is no source behind it, so clip changes do nothing until a file
    /// is loaded; the colormap can still be changed.
    pub fn set_display(&mut self, grid: NumericGrid) -> Result<()> {
        self.rebuild_image(&grid)?;
        self.source = None;
        self.display = Some(grid);
        self.status_message = None;
        Ok(())
    }

    /// Replace the source grid and normalize it with the current options.
    pub fn set_source(&mut self, grid: NumericGrid) {
        self.source = Some(grid);
        self.renormalize();
    }

    /// Load a file into the viewer; the title follows the file name.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(grid) => {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    self.options.title = stem.to_string();
                }
                self.set_source(grid);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_colormap(&mut self, name: &str) {
        self.options.colormap = name.to_string();
        if let Some(display) = self.display.take() {
            if let Err(e) = self.rebuild_image(&display) {
                self.status_message = Some(format!("Error: {e}"));
            }
            self.display = Some(display);
        }
    }

    pub fn set_clip(&mut self, clip: Option<f64>) {
        self.options.clip_percentile = clip;
        self.renormalize();
    }

    /// Run the pipeline on the source with the current options.
    pub fn renormalize(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let result = normalize_grid(source, &self.options).and_then(|grid| {
            self.rebuild_image(&grid)?;
            Ok(grid)
        });
        match result {
            Ok(grid) => {
                self.display = Some(grid);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot display grid: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Rebuild colormap and pixels for `grid`.
    fn rebuild_image(&mut self, grid: &NumericGrid) -> Result<()> {
        let colormap = colormap_for(grid, &self.options)?;
        self.pending_image = Some(grid_to_color_image(grid, colormap.as_ref())?);
        self.colormap = colormap;
        Ok(())
    }

    /// Readout for the sample under `(row, col)` of the display grid.
    pub fn sample_label(&self, row: usize, col: usize) -> Option<String> {
        let grid = self.display.as_ref()?;
        let shape = grid.shape();
        if row >= shape[0] || col >= shape[1] {
            return None;
        }
        let values = grid.values();
        Some(match shape.len() {
            2 => format!("row {row}, col {col}: {:.1}", values[[row, col]]),
            _ => format!(
                "row {row}, col {col}: ({:.0}, {:.0}, {:.0})",
                values[[row, col, 0]],
                values[[row, col, 1]],
                values[[row, col, 2]]
            ),
        })
    }
}
