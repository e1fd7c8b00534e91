//! quicklook: a simple way to look at numeric arrays.
//!
//! ```no_run
//! use quicklook::{show, DisplayOptions};
//!
//! let arr = quicklook::data::generate::pretty_pattern(201);
//! show(&arr, &DisplayOptions::default().with_title("pattern"))?;
//! # Ok::<(), quicklook::Error>(())
//! ```

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod state;
pub mod ui;

use std::path::Path;

pub use data::model::{DType, IntoGrid, NumericGrid};
pub use error::{Error, Result};
pub use options::DisplayOptions;
pub use render::{Renderer, WindowRenderer};

/// Prepare any grid for display: NaN replacement, optional percentile clip,
/// byte scaling, then shape canonicalization.
pub fn normalize(input: impl IntoGrid, options: &DisplayOptions) -> Result<NumericGrid> {
    pipeline::normalize_grid(input.into_grid()?, options)
}

/// Normalize the input and show it in a window. Blocks until the window is
/// closed.
///
/// The window keeps the raw input, so changing the clip percentile there
/// re-runs the pipeline from the original samples. Errors surface before a
/// window opens.
pub fn show(input: impl IntoGrid, options: &DisplayOptions) -> Result<()> {
    let state = state::ViewerState::with_source(input.into_grid()?, options.clone())?;
    render::run_window(state)
}

/// Normalize the input and hand it to `renderer`.
///
/// Input and options are validated before the renderer is touched.
pub fn show_with<R: Renderer + ?Sized>(
    input: impl IntoGrid,
    options: &DisplayOptions,
    renderer: &mut R,
) -> Result<()> {
    let grid = normalize(input, options)?;
    renderer.render(&grid, options)
}

/// Load an image or array file.
pub fn load(path: impl AsRef<Path>) -> Result<NumericGrid> {
    data::loader::load_file(path.as_ref())
}
