use std::fmt;

use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DType – the element type a grid was produced with
// ---------------------------------------------------------------------------

/// Element type of a grid, named after the NumPy dtypes users already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && self != DType::Bool
    }

    /// Inclusive value range of an integer dtype.
    fn integer_bounds(self) -> Option<(f64, f64)> {
        match self {
            DType::U8 => Some((0.0, u8::MAX as f64)),
            DType::U16 => Some((0.0, u16::MAX as f64)),
            DType::U32 => Some((0.0, u32::MAX as f64)),
            DType::U64 => Some((0.0, u64::MAX as f64)),
            DType::I8 => Some((i8::MIN as f64, i8::MAX as f64)),
            DType::I16 => Some((i16::MIN as f64, i16::MAX as f64)),
            DType::I32 => Some((i32::MIN as f64, i32::MAX as f64)),
            DType::I64 => Some((i64::MIN as f64, i64::MAX as f64)),
            DType::Bool | DType::F32 | DType::F64 => None,
        }
    }

    /// Convert a value into this dtype's value set.
    ///
    /// Integer targets truncate toward zero and saturate at the type bounds,
    /// `f32` rounds to single precision, `bool` maps non-zero to one.
    pub fn cast(self, value: f64) -> f64 {
        match self {
            DType::F64 => value,
            DType::F32 => value as f32 as f64,
            DType::Bool => {
                if value != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            _ => {
                let (lo, hi) = self.integer_bounds().unwrap_or((f64::MIN, f64::MAX));
                if value.is_nan() {
                    0.0
                } else {
                    value.trunc().clamp(lo, hi)
                }
            }
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// GridElement – array element types a grid can be built from
// ---------------------------------------------------------------------------

pub trait GridElement: Copy {
    const DTYPE: DType;
    fn to_f64(self) -> f64;
}

macro_rules! impl_grid_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl GridElement for $ty {
                const DTYPE: DType = DType::$dtype;
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_grid_element!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

impl GridElement for bool {
    const DTYPE: DType = DType::Bool;
    #[inline]
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// NumericGrid – an N-dimensional array of samples plus its dtype
// ---------------------------------------------------------------------------

/// An N-dimensional array of real samples (NaN allowed).
///
/// Samples are held as `f64` whatever the source type; `dtype` records the
/// value set the samples belong to. Pipeline stages consume a grid and
/// return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericGrid {
    values: ArrayD<f64>,
    dtype: DType,
}

impl NumericGrid {
    pub fn new(values: ArrayD<f64>, dtype: DType) -> Self {
        NumericGrid { values, dtype }
    }

    /// Build a grid from any ndarray of a supported element type.
    pub fn from_array<A, S, D>(array: &ArrayBase<S, D>) -> Self
    where
        A: GridElement,
        S: Data<Elem = A>,
        D: Dimension,
    {
        NumericGrid {
            values: array.mapv(A::to_f64).into_dyn(),
            dtype: A::DTYPE,
        }
    }

    /// Build a grid from row-major samples.
    pub fn from_shape_vec(shape: &[usize], samples: Vec<f64>, dtype: DType) -> Result<Self> {
        let n = samples.len();
        let values = ArrayD::from_shape_vec(IxDyn(shape), samples).map_err(|_| {
            Error::Shape(format!("{n} samples do not fill an array of shape {shape:?}"))
        })?;
        Ok(NumericGrid { values, dtype })
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }

    /// Replace the samples while keeping the dtype.
    pub fn with_values(&self, values: ArrayD<f64>) -> Self {
        NumericGrid {
            values,
            dtype: self.dtype,
        }
    }

    /// Minimum and maximum, ignoring NaN. `None` if there is no such sample.
    pub fn nan_min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ---------------------------------------------------------------------------
// IntoGrid – the runtime validation contract at the API boundary
// ---------------------------------------------------------------------------

/// Values accepted by [`crate::normalize`] and [`crate::show`].
///
/// Arrays convert infallibly. Dynamic JSON values are checked at runtime and
/// anything that is not a (rectangular) array is rejected with
/// [`Error::Type`].
pub trait IntoGrid {
    fn into_grid(self) -> Result<NumericGrid>;
}

impl IntoGrid for NumericGrid {
    fn into_grid(self) -> Result<NumericGrid> {
        Ok(self)
    }
}

impl IntoGrid for &NumericGrid {
    fn into_grid(self) -> Result<NumericGrid> {
        Ok(self.clone())
    }
}

impl<A, S, D> IntoGrid for ArrayBase<S, D>
where
    A: GridElement,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn into_grid(self) -> Result<NumericGrid> {
        Ok(NumericGrid::from_array(&self))
    }
}

impl<A, S, D> IntoGrid for &ArrayBase<S, D>
where
    A: GridElement,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn into_grid(self) -> Result<NumericGrid> {
        Ok(NumericGrid::from_array(self))
    }
}

impl IntoGrid for JsonValue {
    fn into_grid(self) -> Result<NumericGrid> {
        grid_from_json(&self)
    }
}

impl IntoGrid for &JsonValue {
    fn into_grid(self) -> Result<NumericGrid> {
        grid_from_json(self)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Convert nested JSON arrays into a grid.
///
/// The shape is read off the first element at each depth; every other
/// sub-array must match it. `null` leaves become NaN. The dtype is `int64`
/// when every leaf is an integer, `bool` when every leaf is a bool, and
/// `float64` otherwise.
pub fn grid_from_json(value: &JsonValue) -> Result<NumericGrid> {
    if !value.is_array() {
        return Err(Error::Type(format!(
            "input must be an array but was given a {}",
            json_kind(value)
        )));
    }

    let mut shape = Vec::new();
    let mut cursor = value;
    while let JsonValue::Array(items) = cursor {
        shape.push(items.len());
        match items.first() {
            Some(first) => cursor = first,
            None => break,
        }
    }

    let mut flat = FlatJson {
        samples: Vec::with_capacity(shape.iter().product()),
        all_integer: true,
        all_bool: true,
    };
    flatten_json(value, &shape, 0, &mut flat)?;

    let dtype = if flat.samples.is_empty() {
        DType::F64
    } else if flat.all_bool {
        DType::Bool
    } else if flat.all_integer {
        DType::I64
    } else {
        DType::F64
    };
    NumericGrid::from_shape_vec(&shape, flat.samples, dtype)
}

struct FlatJson {
    samples: Vec<f64>,
    all_integer: bool,
    all_bool: bool,
}

fn flatten_json(value: &JsonValue, shape: &[usize], depth: usize, out: &mut FlatJson) -> Result<()> {
    match value {
        JsonValue::Array(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err(Error::Shape(format!(
                    "nested arrays are ragged at depth {depth}, expected shape {shape:?}"
                )));
            }
            for item in items {
                flatten_json(item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        _ if depth != shape.len() => Err(Error::Shape(format!(
            "found a {} where an array was expected at depth {depth}",
            json_kind(value)
        ))),
        JsonValue::Number(n) => {
            out.all_bool = false;
            if !(n.is_i64() || n.is_u64()) {
                out.all_integer = false;
            }
            out.samples.push(n.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        JsonValue::Bool(b) => {
            out.all_integer = false;
            out.samples.push(GridElement::to_f64(*b));
            Ok(())
        }
        JsonValue::Null => {
            out.all_bool = false;
            out.all_integer = false;
            out.samples.push(f64::NAN);
            Ok(())
        }
        other => Err(Error::Type(format!(
            "array elements must be numbers but found a {}",
            json_kind(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use serde_json::json;

    #[test]
    fn arrays_keep_their_dtype() {
        let grid = array![[1u8, 2], [3, 4]].into_grid().unwrap();
        assert_eq!(grid.dtype(), DType::U8);
        assert_eq!(grid.shape(), &[2, 2]);

        let grid = Array3::<f32>::zeros((2, 3, 4)).into_grid().unwrap();
        assert_eq!(grid.dtype(), DType::F32);
        assert_eq!(grid.ndim(), 3);
    }

    #[test]
    fn json_scalars_and_strings_are_type_errors() {
        for value in [json!("not_an_array"), json!(1), json!(true), json!(null), json!({"a": 1})] {
            assert!(matches!(value.into_grid(), Err(Error::Type(_))));
        }
    }

    #[test]
    fn json_nested_arrays_become_grids() {
        let grid = json!([[1, 2, 3], [4, 5, 6]]).into_grid().unwrap();
        assert_eq!(grid.shape(), &[2, 3]);
        assert_eq!(grid.dtype(), DType::I64);

        let grid = json!([[1.5, null], [0, 2]]).into_grid().unwrap();
        assert_eq!(grid.dtype(), DType::F64);
        assert!(grid.values()[[0, 1]].is_nan());
    }

    #[test]
    fn ragged_json_is_rejected() {
        let err = json!([[1, 2], [3]]).into_grid().unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
        let err = json!([[1, 2], 3]).into_grid().unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn integer_casts_truncate_and_saturate() {
        assert_eq!(DType::U8.cast(254.9), 254.0);
        assert_eq!(DType::U8.cast(300.0), 255.0);
        assert_eq!(DType::U8.cast(-3.0), 0.0);
        assert_eq!(DType::I8.cast(-200.0), -128.0);
        assert_eq!(DType::F64.cast(0.25), 0.25);
    }

    #[test]
    fn nan_min_max_skips_nan() {
        let grid = NumericGrid::from_array(&array![[f64::NAN, 2.0], [-1.0, 7.0]]);
        assert_eq!(grid.nan_min_max(), Some((-1.0, 7.0)));
        let grid = NumericGrid::from_array(&array![f64::NAN]);
        assert_eq!(grid.nan_min_max(), None);
    }
}
