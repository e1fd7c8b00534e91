use crate::data::model::NumericGrid;
use crate::error::{Error, Result};

/// Smallest and largest finite sample.
pub fn finite_min_max(grid: &NumericGrid) -> Option<(f64, f64)> {
    grid.values()
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Replace "not a number" samples with the smallest finite sample.
///
/// Infinities are pulled in to the finite extremes as well (`-inf` to the
/// minimum, `+inf` to the maximum) so that later stages see a finite range.
/// Fails with [`Error::Domain`] when the grid holds no finite sample at all.
pub fn replace_nan(grid: NumericGrid) -> Result<NumericGrid> {
    let (min, max) = finite_min_max(&grid).ok_or_else(|| {
        Error::Domain(format!(
            "cannot replace NaN: grid of shape {:?} has no finite values",
            grid.shape()
        ))
    })?;

    let values = grid.values().mapv(|v| {
        if v.is_nan() || v == f64::NEG_INFINITY {
            min
        } else if v == f64::INFINITY {
            max
        } else {
            v
        }
    });
    Ok(grid.with_values(values))
}
