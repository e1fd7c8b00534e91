use ndarray::{ArrayD, Axis, Slice};

use crate::data::model::{DType, NumericGrid};
use crate::error::{Error, Result};

/// Most channels a colour image can have once canonical (RGB).
pub const MAX_CHANNELS: usize = 3;

/// Pick the axis holding colour channels: the shortest one.
///
/// When several axes share the shortest length the last axis wins if it is
/// one of them, otherwise the first in axis order. Preferring the last axis
/// means an already channel-last grid is never reordered.
pub fn channel_axis(shape: &[usize]) -> Option<usize> {
    let min = *shape.iter().min()?;
    let last = shape.len() - 1;
    if shape[last] == min {
        Some(last)
    } else {
        shape.iter().position(|&n| n == min)
    }
}

/// Reshape a grid (if needed) for display.
///
/// Output is 2D (single channel) or 3D with at most three channels on the
/// last axis:
///
/// 1. move the channel axis last,
/// 2. keep only the first three channels,
/// 3. average two channels into one,
/// 4. drop axes of length one.
pub fn canonicalize(grid: NumericGrid) -> Result<NumericGrid> {
    match grid.ndim() {
        2 => Ok(grid),
        3 => canonicalize_3d(grid),
        n => Err(Error::Shape(format!(
            "array needs to have 2 or 3 dimensions but has {n} (shape {:?})",
            grid.shape()
        ))),
    }
}

fn canonicalize_3d(grid: NumericGrid) -> Result<NumericGrid> {
    let shape = grid.shape().to_vec();
    if shape.contains(&0) {
        return Err(Error::Shape(format!("cannot display an empty array of shape {shape:?}")));
    }
    let axis = channel_axis(&shape)
        .ok_or_else(|| Error::Shape(format!("no channel axis in shape {shape:?}")))?;

    let mut dtype = grid.dtype();
    let mut values = grid.into_values();

    if axis != 2 {
        let mut order: Vec<usize> = (0..3).filter(|&a| a != axis).collect();
        order.push(axis);
        values = values.permuted_axes(order);
    }

    let channels = values.len_of(Axis(2));
    if channels > MAX_CHANNELS {
        log::debug!("Keeping the first {MAX_CHANNELS} of {channels} channels");
        values = values
            .slice_axis(Axis(2), Slice::from(0..MAX_CHANNELS))
            .to_owned();
    }

    if channels == 2 {
        values = values
            .mean_axis(Axis(2))
            .ok_or_else(|| Error::Shape("cannot average an empty channel axis".to_string()))?;
        dtype = DType::F64;
    }

    let values = squeeze(values);
    if values.ndim() < 2 {
        return Err(Error::Shape(format!(
            "array of shape {shape:?} has fewer than 2 dimensions longer than one"
        )));
    }

    Ok(NumericGrid::new(values.as_standard_layout().into_owned(), dtype))
}

/// Remove every axis of length one.
fn squeeze(mut values: ArrayD<f64>) -> ArrayD<f64> {
    for ax in (0..values.ndim()).rev() {
        if values.len_of(Axis(ax)) == 1 {
            values = values.index_axis_move(Axis(ax), 0);
        }
    }
    values
}
