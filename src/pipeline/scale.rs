use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::data::model::{DType, NumericGrid};
use crate::error::{Error, Result};

/// Output range and element type of the scaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTarget {
    pub low: f64,
    pub high: f64,
    pub dtype: DType,
}

impl Default for ScaleTarget {
    /// Bytes: `[0, 255]` as `uint8`, what screens expect per channel.
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 255.0,
            dtype: DType::U8,
        }
    }
}

/// Scale samples to `0..=255` with byte depth.
pub fn bytescale(grid: NumericGrid) -> Result<NumericGrid> {
    rescale(grid, &ScaleTarget::default())
}

/// Linearly map `[min, max]` of the grid onto `[target.low, target.high]`,
/// then cast to `target.dtype`.
///
/// Arithmetic happens in `f64`; the cast comes last so nothing is truncated
/// early. A constant grid (including all zeros) has no range to stretch:
/// every sample becomes `low + (high - low) * clamp(value / high, 0, 1)`.
pub fn rescale(grid: NumericGrid, target: &ScaleTarget) -> Result<NumericGrid> {
    let ScaleTarget { low, high, dtype } = *target;
    if !(low < high) {
        return Err(Error::Domain(format!(
            "scale range must be increasing but was [{low}, {high}]"
        )));
    }

    let (lo, hi) = grid.nan_min_max().ok_or_else(|| {
        Error::Domain(format!(
            "cannot scale grid of shape {:?}: no values",
            grid.shape()
        ))
    })?;
    if !lo.is_finite() || !hi.is_finite() {
        return Err(Error::Domain(format!(
            "cannot scale grid with non-finite range [{lo}, {hi}]"
        )));
    }

    let values = if lo == hi {
        // multiply first: with low = 0 a constant in [0, high] maps to itself
        let fill = if high > 0.0 {
            low + (high - low) * lo.clamp(0.0, high) / high
        } else if high < 0.0 {
            low + (high - low) * (lo / high).clamp(0.0, 1.0)
        } else {
            low
        };
        let fill = dtype.cast(fill);
        log::debug!("Constant grid ({lo}), filling with {fill}");
        ArrayD::from_elem(grid.shape(), fill)
    } else {
        let span = hi - lo;
        grid.values()
            .mapv(|v| dtype.cast((high - low) * (v - lo) / span + low))
    };
    Ok(NumericGrid::new(values, dtype))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn range_maps_onto_bytes() {
        let grid = NumericGrid::from_array(&array![[-1.0, 0.0], [1.0, 3.0]]);
        let out = bytescale(grid).unwrap();
        assert_eq!(out.dtype(), DType::U8);
        assert_eq!(out.values(), &array![[0.0, 63.0], [127.0, 255.0]].into_dyn());
    }

    #[test]
    fn constant_grid_does_not_divide_by_zero() {
        // clamp(c, 0, 255), truncated to a byte
        for (c, expected) in [
            (0.0, 0.0),
            (1.0, 1.0),
            (200.0, 200.0),
            (1.0e9, 255.0),
            (-4.0, 0.0),
            (127.9, 127.0),
        ] {
            let grid = NumericGrid::from_array(&Array3::from_elem((4, 5, 3), c));
            let out = bytescale(grid).unwrap();
            assert_eq!(out.shape(), &[4, 5, 3]);
            assert!(
                out.values().iter().all(|&v| v == expected),
                "constant {c} should fill with {expected}"
            );
        }
    }

    #[test]
    fn constant_grid_fills_relative_to_target_range() {
        let target = ScaleTarget {
            low: 10.0,
            high: 20.0,
            dtype: DType::F64,
        };
        // 10 + (20 - 10) * clamp(c / 20, 0, 1)
        for (c, expected) in [(5.0, 12.5), (40.0, 20.0), (-1.0, 10.0)] {
            let grid = NumericGrid::from_array(&array![[c, c], [c, c]]);
            let out = rescale(grid, &target).unwrap();
            assert!(out.values().iter().all(|&v| v == expected));
        }
    }

    #[test]
    fn all_zeros_stay_zero() {
        let grid = NumericGrid::from_array(&Array3::<f64>::zeros((2, 2, 2)));
        let out = bytescale(grid).unwrap();
        assert!(out.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn custom_float_target() {
        let target = ScaleTarget {
            low: -1.0,
            high: 1.0,
            dtype: DType::F64,
        };
        let grid = NumericGrid::from_array(&array![10u8, 20, 30]);
        let out = rescale(grid, &target).unwrap();
        assert_eq!(out.values(), &array![-1.0, 0.0, 1.0].into_dyn());
        assert_eq!(out.dtype(), DType::F64);
    }

    #[test]
    fn empty_and_inverted_ranges_are_domain_errors() {
        let empty = NumericGrid::from_array(&ndarray::Array2::<f64>::zeros((0, 3)));
        assert!(matches!(bytescale(empty), Err(Error::Domain(_))));

        let grid = NumericGrid::from_array(&array![1.0, 2.0]);
        let inverted = ScaleTarget {
            low: 255.0,
            high: 0.0,
            dtype: DType::U8,
        };
        assert!(matches!(rescale(grid, &inverted), Err(Error::Domain(_))));
    }
}
