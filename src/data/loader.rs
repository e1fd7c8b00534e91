use std::fs::File;
use std::path::Path;

use image::DynamicImage;
use ndarray::ArrayD;
use ndarray_npy::{read_npy, ReadNpyError};
use serde_json::Value as JsonValue;

use super::model::{grid_from_json, DType, GridElement, NumericGrid};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a grid from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.png` `.jpg` `.jpeg` `.tif` `.tiff` `.bmp` `.gif` – raster images,
///   `(H, W)` for gray and `(H, W, C)` otherwise
/// * `.npy`  – NumPy arrays of any numeric or bool element type
/// * `.json` – nested arrays of numbers, `null` for missing samples
/// * `.csv`  – headerless matrix of numbers, empty or `nan` cells are NaN
pub fn load_file(path: &Path) -> Result<NumericGrid> {
    std::fs::metadata(path).map_err(|source| io_error(path, source))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let grid = match ext.as_str() {
        "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" => load_image(path),
        "npy" => load_npy(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(Error::format(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }?;

    log::info!(
        "Loaded {} grid of shape {:?} from {}",
        grid.dtype(),
        grid.shape(),
        path.display()
    );
    Ok(grid)
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Raster images
// ---------------------------------------------------------------------------

fn load_image(path: &Path) -> Result<NumericGrid> {
    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(source) => io_error(path, source),
        other => Error::format(path, other),
    })?;

    let height = img.height() as usize;
    let width = img.width() as usize;

    let (samples, channels, dtype) = match img {
        DynamicImage::ImageLuma8(b) => (widen(b.into_raw()), 1, DType::U8),
        DynamicImage::ImageLumaA8(b) => (widen(b.into_raw()), 2, DType::U8),
        DynamicImage::ImageRgb8(b) => (widen(b.into_raw()), 3, DType::U8),
        DynamicImage::ImageRgba8(b) => (widen(b.into_raw()), 4, DType::U8),
        DynamicImage::ImageLuma16(b) => (widen(b.into_raw()), 1, DType::U16),
        DynamicImage::ImageLumaA16(b) => (widen(b.into_raw()), 2, DType::U16),
        DynamicImage::ImageRgb16(b) => (widen(b.into_raw()), 3, DType::U16),
        DynamicImage::ImageRgba16(b) => (widen(b.into_raw()), 4, DType::U16),
        DynamicImage::ImageRgb32F(b) => (widen(b.into_raw()), 3, DType::F32),
        DynamicImage::ImageRgba32F(b) => (widen(b.into_raw()), 4, DType::F32),
        other => (widen(other.into_rgba8().into_raw()), 4, DType::U8),
    };

    let shape: Vec<usize> = if channels == 1 {
        vec![height, width]
    } else {
        vec![height, width, channels]
    };
    NumericGrid::from_shape_vec(&shape, samples, dtype).map_err(|e| Error::format(path, e))
}

fn widen<T: GridElement>(raw: Vec<T>) -> Vec<f64> {
    raw.into_iter().map(T::to_f64).collect()
}

// ---------------------------------------------------------------------------
// NumPy .npy
// ---------------------------------------------------------------------------

/// `.npy` headers carry the element type, so try each supported type until
/// the descriptor matches.
fn load_npy(path: &Path) -> Result<NumericGrid> {
    macro_rules! try_elements {
        ($($ty:ty),*) => {
            $(
                match read_npy::<_, ArrayD<$ty>>(path) {
                    Ok(array) => return Ok(NumericGrid::from_array(&array)),
                    Err(ReadNpyError::WrongDescriptor(_)) => {}
                    Err(ReadNpyError::Io(source)) => return Err(io_error(path, source)),
                    Err(other) => return Err(Error::format(path, other)),
                }
            )*
        };
    }

    try_elements!(f64, f32, i64, i32, i16, i8, u64, u32, u16, u8, bool);
    Err(Error::format(path, "unsupported .npy element type"))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected layout: nested arrays, one level per dimension.
///
/// ```json
/// [[0.1, 0.2, null],
///  [0.4, 0.5, 0.6]]
/// ```
fn load_json(path: &Path) -> Result<NumericGrid> {
    let text = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| Error::format(path, e))?;
    grid_from_json(&root).map_err(|e| Error::format(path, e))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// One row per line, no header. Every row must have the same number of cells.
fn load_csv(path: &Path) -> Result<NumericGrid> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut samples = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut n_rows = 0;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::format(path, format!("row {row_no}: {e}")))?;

        match n_cols {
            None => n_cols = Some(record.len()),
            Some(n) if n != record.len() => {
                return Err(Error::format(
                    path,
                    format!("row {row_no} has {} cells but row 0 has {n}", record.len()),
                ));
            }
            Some(_) => {}
        }

        for (col_no, cell) in record.iter().enumerate() {
            samples.push(parse_cell(cell).ok_or_else(|| {
                Error::format(path, format!("row {row_no}, column {col_no}: '{cell}' is not a number"))
            })?);
        }
        n_rows += 1;
    }

    let shape = [n_rows, n_cols.unwrap_or(0)];
    NumericGrid::from_shape_vec(&shape, samples, DType::F64).map_err(|e| Error::format(path, e))
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_parse_with_nan_markers() {
        assert_eq!(parse_cell("1.5"), Some(1.5));
        assert!(parse_cell("").unwrap().is_nan());
        assert!(parse_cell("NaN").unwrap().is_nan());
        assert_eq!(parse_cell("abc"), None);
    }
}
