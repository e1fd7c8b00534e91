//! Normalization pipeline: arbitrary grid → display-ready grid.
//!
//! ```text
//!   NumericGrid (any shape, any dtype, NaN allowed)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ sanitize  │  NaN → smallest finite value
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   clip    │  optional percentile clamp
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   scale   │  [min, max] → [0, 255], uint8
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ canonical │  2D, or 3D with ≤ 3 channels last
//!   └──────────┘
//! ```
//!
//! Every stage takes the previous stage's grid by value and returns a new
//! one; nothing is shared between calls.

pub mod canonical;
pub mod clip;
pub mod sanitize;
pub mod scale;

use crate::data::model::NumericGrid;
use crate::error::Result;
use crate::options::DisplayOptions;

use self::scale::ScaleTarget;

/// Run all four stages with the default byte target.
pub fn normalize_grid(grid: NumericGrid, options: &DisplayOptions) -> Result<NumericGrid> {
    normalize_grid_to(grid, options, &ScaleTarget::default())
}

/// Run all four stages, scaling onto `target`.
pub fn normalize_grid_to(
    grid: NumericGrid,
    options: &DisplayOptions,
    target: &ScaleTarget,
) -> Result<NumericGrid> {
    log::debug!("Normalizing {} grid of shape {:?}", grid.dtype(), grid.shape());

    let grid = sanitize::replace_nan(grid)?;
    let grid = clip::percentile_clip(grid, options.clip_percentile)?;
    let grid = scale::rescale(grid, target)?;
    let grid = canonical::canonicalize(grid)?;

    log::debug!("Display grid: {} {:?}", grid.dtype(), grid.shape());
    Ok(grid)
}
