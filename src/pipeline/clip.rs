use crate::data::model::NumericGrid;
use crate::error::{Error, Result};

/// Clip extreme samples to the `p`-th and `(100 - p)`-th percentiles.
///
/// A single outlier can squash everything else into a few grey levels once
/// the grid is scaled linearly. Clamping the tails first keeps the bulk of
/// the distribution visible.
///
/// * `None` or `0` – no clipping.
/// * NaN – [`Error::Type`], the percentile is not a number.
/// * outside `(0, 50)` – logged as a warning, grid returned unchanged.
pub fn percentile_clip(grid: NumericGrid, clip: Option<f64>) -> Result<NumericGrid> {
    let p = match clip {
        None => return Ok(grid),
        Some(p) if p.is_nan() => {
            return Err(Error::Type(
                "percentile clip needs to be a number but was given NaN".to_string(),
            ))
        }
        Some(p) if p == 0.0 => return Ok(grid),
        Some(p) => p,
    };

    if !(p > 0.0 && p < 50.0) {
        log::warn!("Image not clipped. Clip percentile must be between 0 and 50, got {p}");
        return Ok(grid);
    }

    let sorted = sorted_samples(&grid);
    if sorted.is_empty() {
        return Ok(grid);
    }
    let low = percentile_of_sorted(&sorted, p);
    let high = percentile_of_sorted(&sorted, 100.0 - p);
    log::debug!("Clipping to [{low}, {high}] ({p}th percentile)");

    let values = grid.values().mapv(|v| {
        if v < low {
            low
        } else if v > high {
            high
        } else {
            v
        }
    });
    Ok(grid.with_values(values))
}

/// The `p`-th percentile (`0..=100`) of all non-NaN samples.
pub fn percentile(grid: &NumericGrid, p: f64) -> Option<f64> {
    let sorted = sorted_samples(grid);
    (!sorted.is_empty()).then(|| percentile_of_sorted(&sorted, p.clamp(0.0, 100.0)))
}

fn sorted_samples(grid: &NumericGrid) -> Vec<f64> {
    let mut samples: Vec<f64> = grid.values().iter().copied().filter(|v| !v.is_nan()).collect();
    samples.sort_by(f64::total_cmp);
    samples
}

/// Linear interpolation between closest ranks, as NumPy does by default.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2};
    use std::sync::Mutex;

    fn ramp(n: usize) -> NumericGrid {
        NumericGrid::from_array(&Array1::from_iter((0..n).map(|v| v as f64)))
    }

    #[test]
    fn unset_or_zero_is_a_no_op() {
        let grid = ramp(10);
        assert_eq!(percentile_clip(grid.clone(), None).unwrap(), grid);
        assert_eq!(percentile_clip(grid.clone(), Some(0.0)).unwrap(), grid);
    }

    #[test]
    fn nan_percentile_is_a_type_error() {
        assert!(matches!(
            percentile_clip(ramp(10), Some(f64::NAN)),
            Err(Error::Type(_))
        ));
    }

    #[test]
    fn out_of_range_percentile_leaves_grid_unchanged() {
        let grid = ramp(10);
        for p in [50.0, 75.0, -1.0, 100.0] {
            assert_eq!(percentile_clip(grid.clone(), Some(p)).unwrap(), grid);
        }
    }

    /// Keeps every warning logged while the tests run.
    struct WarningLog(Mutex<Vec<String>>);

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.0.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: WarningLog = WarningLog(Mutex::new(Vec::new()));

    fn warnings_mentioning(needle: &str) -> usize {
        let lines = WARNINGS.0.lock().unwrap();
        lines.iter().filter(|line| line.contains(needle)).count()
    }

    #[test]
    fn out_of_range_percentile_is_warned_about() {
        // Fails only if another logger got there first, which no test does.
        let _ = log::set_logger(&WARNINGS);
        log::set_max_level(log::LevelFilter::Warn);

        // Unusual values so parallel tests cannot produce the same lines.
        let grid = ramp(10);
        assert_eq!(percentile_clip(grid.clone(), Some(73.25)).unwrap(), grid);
        assert_eq!(percentile_clip(grid.clone(), Some(-8.125)).unwrap(), grid);
        assert_eq!(warnings_mentioning("got 73.25"), 1);
        assert_eq!(warnings_mentioning("got -8.125"), 1);

        // In-range clipping is silent.
        percentile_clip(grid, Some(12.375)).unwrap();
        assert_eq!(warnings_mentioning("12.375"), 0);
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        // 0..=100, so the p-th percentile is p
        let grid = ramp(101);
        assert_abs_diff_eq!(percentile(&grid, 10.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(percentile(&grid, 50.0).unwrap(), 50.0, epsilon = 1e-9);

        let grid = ramp(4); // 0 1 2 3
        assert_abs_diff_eq!(percentile(&grid, 50.0).unwrap(), 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(percentile(&grid, 10.0).unwrap(), 0.3, epsilon = 1e-9);
    }

    #[test]
    fn outliers_are_clamped_to_percentiles() {
        let mut values = Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f64);
        values[[9, 9]] = 1.0e6;
        let grid = NumericGrid::from_array(&values);
        let low = percentile(&grid, 5.0).unwrap();
        let high = percentile(&grid, 95.0).unwrap();

        let out = percentile_clip(grid, Some(5.0)).unwrap();
        assert!(out.values().iter().all(|&v| v >= low && v <= high));
        assert_abs_diff_eq!(out.values()[[9, 9]], high, epsilon = 1e-9);
        assert_abs_diff_eq!(out.values()[[0, 0]], low, epsilon = 1e-9);
    }
}
