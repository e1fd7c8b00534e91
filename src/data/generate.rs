//! Example arrays for trying the viewer without a file at hand.

use ndarray::{stack, Array2, Array3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// A random `(height, width)` grid of samples in `[0, 1)`.
///
/// Called "static" because it looks like the noise an analogue TV shows when
/// there is no broadcast signal.
pub fn static_grid(width: usize, height: usize) -> Array2<f64> {
    random_grid(width, height, &mut rand::thread_rng())
}

/// Same as [`static_grid`], reproducible for a given seed.
pub fn static_grid_seeded(width: usize, height: usize, seed: u64) -> Array2<f64> {
    random_grid(width, height, &mut StdRng::seed_from_u64(seed))
}

fn random_grid<R: Rng>(width: usize, height: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((height, width), || rng.gen::<f64>())
}

/// Parse a width/height/size argument given as text.
pub fn parse_dimension(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Type(format!(
            "width and height must be positive integers but was given '{text}'"
        ))),
    }
}

/// X and Y offsets of every cell from the centre cell `floor(size / 2)`.
pub fn distances_from_centre(size: usize) -> (Array2<f64>, Array2<f64>) {
    let centre = (size / 2) as f64;
    let x = Array2::from_shape_fn((size, size), |(_, col)| col as f64 - centre);
    let y = Array2::from_shape_fn((size, size), |(row, _)| row as f64 - centre);
    (x, y)
}

/// A three channel interference pattern with minimum value zero.
pub fn pretty_pattern(size: usize) -> Array3<f64> {
    let (x, y) = distances_from_centre(size);
    pattern_from_offsets(&x, &y, size)
}

fn pattern_from_offsets(x: &Array2<f64>, y: &Array2<f64>, size: usize) -> Array3<f64> {
    let hsq = x.mapv(|v| v * v) + y.mapv(|v| v * v);
    let red = hsq.mapv(f64::sin);
    let green = hsq.mapv(f64::cos);
    let blue = hsq.mapv(|v| (v.sqrt() / size as f64).sin());

    let mut pattern = stack(Axis(2), &[red.view(), green.view(), blue.view()])
        .unwrap_or_else(|_| Array3::zeros((size, size, 3)));
    let min = pattern.iter().copied().fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        pattern.mapv_inplace(|v| v - min);
    }
    pattern
}

/// A boolean mask with an egg shape in it.
///
/// Egg equation from John D. Cook,
/// <https://www.johndcook.com/blog/2018/04/18/equation-to-fit-an-egg/>.
pub fn egg_array(size: usize) -> Array2<bool> {
    let (x, y) = distances_from_centre(size);
    egg_from_offsets(&x, &y, size)
}

fn egg_from_offsets(x: &Array2<f64>, y: &Array2<f64>, size: usize) -> Array2<bool> {
    let h = size as f64 * 0.67;
    let w = size as f64 * 0.5;
    // asymmetry factor, zero gives an ellipse
    let k = 1.0 / size as f64;

    let egg = Array2::from_shape_fn((size, size), |idx| {
        let (xv, yv) = (x[idx], y[idx]);
        let a = xv * xv / (h / 2.0).powi(2);
        let b = yv * yv / (w / 2.0).powi(2);
        a + b * (1.0 + k * xv) < 1.0
    });
    rot90(&egg)
}

/// Rotate by 90 degrees counter-clockwise, like `numpy.rot90`.
fn rot90<T: Copy>(a: &Array2<T>) -> Array2<T> {
    let (rows, cols) = a.dim();
    Array2::from_shape_fn((cols, rows), |(i, j)| a[[j, cols - 1 - i]])
}

/// The pretty pattern, only inside the egg.
pub fn easter_egg(size: usize) -> Array3<f64> {
    let (x, y) = distances_from_centre(size);
    let mut pattern = pattern_from_offsets(&x, &y, size);
    let egg = egg_from_offsets(&x, &y, size);

    for ((row, col, _), v) in pattern.indexed_iter_mut() {
        if !egg[[row, col]] {
            *v = 0.0;
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn static_grid_has_height_by_width_shape() {
        for (w, h) in [(10, 10), (7, 3), (1, 20)] {
            let grid = static_grid(w, h);
            assert_eq!(grid.dim(), (h, w));
            assert!(grid.iter().all(|&v| (0.0..1.0).contains(&v)));
        }
    }

    #[test]
    fn seeded_static_grid_is_reproducible() {
        assert_eq!(static_grid_seeded(5, 4, 42), static_grid_seeded(5, 4, 42));
    }

    #[test]
    fn non_integer_dimensions_are_type_errors() {
        assert!(matches!(parse_dimension("not an integer"), Err(Error::Type(_))));
        assert!(matches!(parse_dimension("3.14159"), Err(Error::Type(_))));
        assert!(matches!(parse_dimension("0"), Err(Error::Type(_))));
        assert_eq!(parse_dimension(" 12 ").unwrap(), 12);
    }

    #[test]
    fn distances_are_centred() {
        let (x, y) = distances_from_centre(5);
        assert_eq!(x[[2, 2]], 0.0);
        assert_eq!(y[[2, 2]], 0.0);
        assert_eq!(x[[0, 0]], -2.0);
        assert_eq!(y[[4, 0]], 2.0);
    }

    #[test]
    fn pattern_has_three_channels_and_zero_minimum() {
        let pattern = pretty_pattern(21);
        assert_eq!(pattern.dim(), (21, 21, 3));
        let min = pattern.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn egg_contains_centre_but_not_corners() {
        let egg = egg_array(51);
        assert!(egg[[25, 25]]);
        assert!(!egg[[0, 0]]);
        assert!(!egg[[50, 50]]);
    }

    #[test]
    fn easter_egg_is_black_outside_the_egg() {
        let arr = easter_egg(31);
        assert_eq!(arr.dim(), (31, 31, 3));
        assert!(arr.slice(ndarray::s![0, 0, ..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rot90_turns_counter_clockwise() {
        let a = array![[1, 2], [3, 4]];
        assert_eq!(rot90(&a), array![[2, 4], [1, 3]]);
    }
}
